//! Export summary and reporting
//!
//! This module defines the structure returned by a completed export run.

use crate::domain::manifest::Revalidate;
use crate::domain::task::AmpPageResult;
use std::collections::BTreeMap;
use std::time::Duration;

/// Summary of an export operation
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Build identifier the export ran against
    pub build_id: String,

    /// Number of paths in the final export plan
    pub total_paths: usize,

    /// Number of paths rendered successfully
    pub rendered: usize,

    /// Paths whose render failed
    pub failed_paths: Vec<String>,

    /// API routes left out of the export
    pub skipped_api_routes: Vec<String>,

    /// Merged AMP findings per page
    pub amp_validations: BTreeMap<String, AmpPageResult>,

    /// Revalidation hints per path (build-export mode)
    pub revalidations: BTreeMap<String, Revalidate>,

    /// Prerendered routes copied into the output
    pub prerendered_copied: usize,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(build_id: impl Into<String>) -> Self {
        Self {
            build_id: build_id.into(),
            ..Self::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Check if the export was successful (no failures)
    pub fn is_successful(&self) -> bool {
        self.failed_paths.is_empty() && !self.amp_validations.values().any(AmpPageResult::has_errors)
    }

    /// Number of AMP warnings across all pages
    pub fn amp_warning_count(&self) -> usize {
        self.amp_validations.values().map(|r| r.warnings.len()).sum()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            build_id = %self.build_id,
            total_paths = self.total_paths,
            rendered = self.rendered,
            failed = self.failed_paths.len(),
            prerendered_copied = self.prerendered_copied,
            amp_pages = self.amp_validations.len(),
            amp_warnings = self.amp_warning_count(),
            duration_ms = self.duration.as_millis() as u64,
            "Export completed"
        );

        if !self.skipped_api_routes.is_empty() {
            tracing::debug!(
                routes = ?self.skipped_api_routes,
                "API routes were not exported"
            );
        }
    }
}
