//! Worker-side protocol loop
//!
//! Reads [`WorkerRequest`] lines, renders each with a local [`Renderer`] and
//! answers with one result line per request until the input closes.

use crate::domain::task::RenderResult;
use crate::domain::Result;
use crate::worker::protocol::{encode_line, WorkerMessage, WorkerRequest, WorkerResponse};
use crate::worker::Renderer;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Serve requests from `reader` until EOF, returning how many were answered
///
/// A request line that cannot be decoded is answered with an errored result
/// so the orchestrator never waits on it.
///
/// # Errors
///
/// Returns an error if reading requests or writing results fails.
pub async fn serve<R, W>(renderer: &dyn Renderer, reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut served = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let result = match serde_json::from_str::<WorkerRequest>(&line) {
            Ok(request) => {
                let task = request.into_task();
                renderer.render(&task).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Received malformed render request");
                RenderResult::failed("", format!("Malformed render request: {}", e))
            }
        };

        let message = WorkerMessage::Result(WorkerResponse::from_result(result));
        writer.write_all(encode_line(&message)?.as_bytes()).await?;
        writer.flush().await?;
        served += 1;
    }

    tracing::debug!(served, "Render request stream closed");
    Ok(served)
}
