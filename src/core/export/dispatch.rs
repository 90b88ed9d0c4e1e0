//! Task dispatch
//!
//! Runs every render task through a [`Renderer`] with bounded concurrency and
//! hands each result to the caller as soon as it arrives. Completion order is
//! unspecified.

use crate::domain::task::{RenderResult, RenderTask};
use crate::worker::Renderer;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Bounded-concurrency task dispatcher
pub struct Dispatcher {
    renderer: Arc<dyn Renderer>,
    concurrency: usize,
}

impl Dispatcher {
    /// Dispatcher running at most `concurrency` tasks at once (at least one)
    pub fn new(renderer: Arc<dyn Renderer>, concurrency: usize) -> Self {
        Self {
            renderer,
            concurrency: concurrency.max(1),
        }
    }

    /// Maximum number of in-flight tasks
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Render all `tasks`, calling `on_result` once per task
    ///
    /// Returns the number of results delivered, which always equals the
    /// number of tasks. A task whose render panics is reported as errored.
    pub async fn dispatch<F>(&self, tasks: Vec<RenderTask>, mut on_result: F) -> usize
    where
        F: FnMut(RenderResult),
    {
        let total = tasks.len();
        tracing::info!(
            tasks = total,
            concurrency = self.concurrency,
            "Dispatching render tasks"
        );

        let mut results = stream::iter(tasks)
            .map(|task| {
                let renderer = Arc::clone(&self.renderer);
                async move {
                    let path = task.path.clone();
                    let handle = tokio::spawn(async move { renderer.render(&task).await });
                    match handle.await {
                        Ok(mut result) => {
                            if result.path != path {
                                tracing::warn!(
                                    expected = %path,
                                    reported = %result.path,
                                    "Renderer reported a result for another path"
                                );
                                result.path = path;
                            }
                            result
                        }
                        Err(e) => RenderResult::failed(path, format!("Render task aborted: {}", e)),
                    }
                }
            })
            .buffer_unordered(self.concurrency);

        let mut delivered = 0;
        while let Some(result) = results.next().await {
            delivered += 1;
            tracing::debug!(
                path = %result.path,
                failed = result.is_error(),
                progress = format!("{}/{}", delivered, total),
                "Render task finished"
            );
            on_result(result);
        }
        delivered
    }
}
