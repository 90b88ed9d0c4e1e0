//! Worker wire protocol
//!
//! Newline-delimited JSON over the worker's stdin/stdout. The orchestrator
//! writes one [`WorkerRequest`] per line and waits for exactly one
//! [`WorkerMessage`] line in return. Any stdout line that does not decode as
//! a [`WorkerMessage`] is worker logging and is forwarded, not interpreted.

use crate::domain::manifest::Revalidate;
use crate::domain::task::{AmpValidation, RenderContext, RenderOptions, RenderResult, RenderTask};
use crate::domain::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Render request sent to a worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    /// Output path
    pub path: String,
    /// Route rendering the path
    pub page: String,
    /// Query parameters
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    /// Build identifier
    pub build_id: String,
    /// Export output root
    pub out_dir: PathBuf,
    /// Per-page JSON payload directory
    pub pages_data_dir: PathBuf,
    /// Renderer options
    pub render_opts: RenderOptions,
    /// Public runtime configuration
    #[serde(default)]
    pub runtime_config: serde_json::Value,
    /// Sub-folders output convention
    #[serde(default)]
    pub subfolders: bool,
    /// Build-export mode
    #[serde(default)]
    pub build_export: bool,
    /// Serverless build
    #[serde(default)]
    pub serverless: bool,
}

impl WorkerRequest {
    /// Request for `task`
    pub fn from_task(task: &RenderTask) -> Self {
        let ctx = &task.context;
        Self {
            path: task.path.clone(),
            page: task.page.clone(),
            query: task.query.clone(),
            build_id: ctx.build_id.clone(),
            out_dir: ctx.out_dir.clone(),
            pages_data_dir: ctx.pages_data_dir.clone(),
            render_opts: ctx.render_opts.clone(),
            runtime_config: ctx.runtime_config.clone(),
            subfolders: ctx.subfolders,
            build_export: ctx.build_export,
            serverless: ctx.serverless,
        }
    }

    /// Rebuild the task on the worker side
    pub fn into_task(self) -> RenderTask {
        let context = RenderContext {
            build_id: self.build_id,
            out_dir: self.out_dir,
            pages_data_dir: self.pages_data_dir,
            render_opts: self.render_opts,
            runtime_config: self.runtime_config,
            subfolders: self.subfolders,
            build_export: self.build_export,
            serverless: self.serverless,
        };
        RenderTask {
            path: self.path,
            page: self.page,
            query: self.query,
            context: Arc::new(context),
        }
    }
}

/// Error indicator: a flag or a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorSignal {
    /// `true` when the render failed
    Flag(bool),
    /// Failure description
    Message(String),
}

/// Outcome reported by a worker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerResponse {
    /// Set when the render failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorSignal>,

    /// AMP findings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amp_validations: Vec<AmpValidation>,

    /// Revalidation hint (build-export mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_build_export_revalidate: Option<Revalidate>,
}

impl WorkerResponse {
    /// Response describing `result`
    pub fn from_result(result: RenderResult) -> Self {
        Self {
            error: result.error.map(ErrorSignal::Message),
            amp_validations: result.amp_validations,
            from_build_export_revalidate: result.from_build_export_revalidate,
        }
    }

    /// Correlate the response with the task's output path
    pub fn into_result(self, path: impl Into<String>) -> RenderResult {
        let error = match self.error {
            None | Some(ErrorSignal::Flag(false)) => None,
            Some(ErrorSignal::Flag(true)) => Some("render failed".to_string()),
            Some(ErrorSignal::Message(message)) => Some(message),
        };
        RenderResult {
            path: path.into(),
            error,
            amp_validations: self.amp_validations,
            from_build_export_revalidate: self.from_build_export_revalidate,
        }
    }
}

/// Protocol message emitted by a worker on stdout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerMessage {
    /// Outcome of the current task
    Result(WorkerResponse),
}

/// Encode a value as one protocol line (including the trailing newline)
pub fn encode_line<T: Serialize>(value: &T) -> Result<String> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    Ok(line)
}

/// Decode a worker stdout line; `None` for non-protocol output
pub fn decode_message(line: &str) -> Option<WorkerMessage> {
    let trimmed = line.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}
