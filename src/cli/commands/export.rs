//! Export command implementation
//!
//! This module implements the `export` command, which renders every path of
//! a compiled build into a static output directory.

use crate::config::load_config;
use crate::core::export::ExportCoordinator;
use crate::domain::errors::PagexError;
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override the output directory (relative to the project root)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Override the worker pool size
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Write `<path>/index.html` instead of `<path>.html`
    #[arg(long)]
    pub subfolders: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Some(out_dir) = &self.out_dir {
            tracing::info!(out_dir = %out_dir, "Overriding output directory from CLI");
            config.export.out_dir = out_dir.clone();
        }

        if let Some(threads) = self.threads {
            tracing::info!(threads, "Overriding worker pool size from CLI");
            config.export.threads = Some(threads);
        }

        if self.subfolders {
            config.export.subfolders = true;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let coordinator = ExportCoordinator::new(config);
        let summary = match coordinator.execute_export().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if !summary.skipped_api_routes.is_empty() {
            eprintln!(
                "Warning: skipped {} path(s) mapped to API routes: {}",
                summary.skipped_api_routes.len(),
                summary.skipped_api_routes.join(", ")
            );
        }

        println!();
        println!("Export Summary:");
        println!("  Build ID: {}", summary.build_id);
        println!("  Paths: {}", summary.total_paths);
        println!("  Rendered: {}", summary.rendered);
        println!("  Prerendered Copied: {}", summary.prerendered_copied);
        if summary.amp_warning_count() > 0 {
            println!("  AMP Warnings: {}", summary.amp_warning_count());
        }
        if !summary.revalidations.is_empty() {
            println!("  Revalidation Hints: {}", summary.revalidations.len());
        }
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();
        println!("Export successful");

        Ok(0)
    }
}

/// Process exit code for a failed export
pub fn exit_code_for(error: &PagexError) -> i32 {
    match error {
        PagexError::Configuration(_) => 2,
        PagexError::Render { .. } | PagexError::AmpValidation { .. } => 1,
        _ => 5,
    }
}
