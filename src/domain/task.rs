//! Render tasks and results
//!
//! A [`RenderTask`] is one unit of work handed to a renderer; a
//! [`RenderResult`] is its outcome, correlated back to the task by output
//! path only.

use crate::domain::manifest::Revalidate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Options forwarded to the renderer for every page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Build identifier
    pub build_id: String,

    /// Prefix prepended to asset URLs
    #[serde(default)]
    pub asset_prefix: String,

    /// Canonical base used for AMP pages
    #[serde(default)]
    pub canonical_base: String,

    /// Custom AMP validator location
    #[serde(default)]
    pub amp_validator_path: Option<String>,

    /// Skip AMP validation entirely
    #[serde(default)]
    pub amp_skip_validation: bool,

    /// Always false for exports
    #[serde(default)]
    pub dev: bool,

    /// Tells the renderer it runs inside a static export
    #[serde(default = "default_export_mode")]
    pub export_mode: bool,
}

fn default_export_mode() -> bool {
    true
}

impl RenderOptions {
    /// Export-mode options for `build_id`
    pub fn new(build_id: impl Into<String>) -> Self {
        Self {
            build_id: build_id.into(),
            asset_prefix: String::new(),
            canonical_base: String::new(),
            amp_validator_path: None,
            amp_skip_validation: false,
            dev: false,
            export_mode: true,
        }
    }
}

/// Run-wide context shared by every task
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    /// Build identifier
    pub build_id: String,

    /// Root of the export output tree
    pub out_dir: PathBuf,

    /// Where per-page JSON payloads go
    pub pages_data_dir: PathBuf,

    /// Renderer options
    pub render_opts: RenderOptions,

    /// Public runtime configuration, forwarded verbatim
    pub runtime_config: serde_json::Value,

    /// Write `<path>/index.html` instead of `<path>.html`
    pub subfolders: bool,

    /// Running as part of the build (producing the prerender manifest)
    pub build_export: bool,

    /// Serverless build output
    pub serverless: bool,
}

/// One unit of render work
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTask {
    /// Output path (the task's only identity)
    pub path: String,

    /// Route rendering this path
    pub page: String,

    /// Query the route is rendered with
    pub query: BTreeMap<String, String>,

    /// Shared run context
    pub context: Arc<RenderContext>,
}

/// A single AMP diagnostic
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmpMessage {
    /// Source line
    #[serde(default)]
    pub line: u32,

    /// Source column
    #[serde(default)]
    pub col: u32,

    /// Human-readable message
    pub message: String,

    /// Link to the relevant AMP spec section
    #[serde(default)]
    pub spec_url: Option<String>,

    /// Validator error code
    #[serde(default)]
    pub code: Option<String>,
}

impl AmpMessage {
    /// Message at `line:col`
    pub fn new(line: u32, col: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            col,
            message: message.into(),
            spec_url: None,
            code: None,
        }
    }
}

/// Validation findings for one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmpPageResult {
    /// Errors (fail the export)
    #[serde(default)]
    pub errors: Vec<AmpMessage>,

    /// Warnings (reported only)
    #[serde(default)]
    pub warnings: Vec<AmpMessage>,
}

impl AmpPageResult {
    /// Whether the page carries at least one error
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Validation findings reported by a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmpValidation {
    /// Page path the findings belong to
    pub page: String,

    /// Findings
    pub result: AmpPageResult,
}

/// Outcome of one render task
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    /// Output path of the task this result belongs to
    pub path: String,

    /// Set when the render failed
    pub error: Option<String>,

    /// AMP findings for pages rendered by this task
    pub amp_validations: Vec<AmpValidation>,

    /// Revalidation hint reported in build-export mode
    pub from_build_export_revalidate: Option<Revalidate>,
}

impl RenderResult {
    /// Successful result with no findings
    pub fn success(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            error: None,
            amp_validations: Vec::new(),
            from_build_export_revalidate: None,
        }
    }

    /// Errored result
    pub fn failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::success(path)
        }
    }

    /// Attach an AMP finding
    pub fn with_amp_validation(mut self, validation: AmpValidation) -> Self {
        self.amp_validations.push(validation);
        self
    }

    /// Attach a revalidation hint
    pub fn with_revalidate(mut self, revalidate: Revalidate) -> Self {
        self.from_build_export_revalidate = Some(revalidate);
        self
    }

    /// Whether the render failed
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
