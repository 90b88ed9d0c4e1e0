//! Render workers
//!
//! This module defines the [`Renderer`] trait the export pipeline dispatches
//! tasks to, and the process-backed [`WorkerPool`] implementation that runs
//! each task inside a long-lived child process over a line protocol.

pub mod pool;
pub mod protocol;
pub mod serve;

use crate::domain::task::{RenderResult, RenderTask};
use async_trait::async_trait;

pub use pool::{WorkerCommand, WorkerPool};
pub use protocol::{WorkerMessage, WorkerRequest, WorkerResponse};
pub use serve::serve;

/// Something that can render one export task
///
/// Implementations must never hang on a task: every failure mode, including
/// a crashed worker process, is reported as an errored [`RenderResult`].
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render `task` and report its outcome
    async fn render(&self, task: &RenderTask) -> RenderResult;

    /// Release any resources held by the renderer
    ///
    /// Called once after all tasks are resolved. The default does nothing.
    async fn shutdown(&self) {}
}
