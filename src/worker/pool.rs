//! Process-backed worker pool
//!
//! Keeps a fixed number of long-lived worker processes. Each task borrows an
//! idle slot, writes one request line to the worker's stdin and reads its
//! stdout until the result line arrives. A worker that dies mid-task yields
//! an errored result for that task and is restarted lazily on next use.

use crate::config::WorkerConfig;
use crate::domain::errors::PagexError;
use crate::domain::task::{RenderResult, RenderTask};
use crate::domain::Result;
use crate::worker::protocol::{
    decode_message, encode_line, WorkerMessage, WorkerRequest, WorkerResponse,
};
use crate::worker::Renderer;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{mpsc, Mutex};

/// Environment variable carrying the worker's slot number
pub const WORKER_ID_ENV: &str = "PAGEX_WORKER_ID";

const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// How to start a worker process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    /// Executable
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Extra environment
    pub env: BTreeMap<String, String>,
}

impl WorkerCommand {
    /// Command running `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Command described by the `[worker]` config section
    pub fn from_config(config: &WorkerConfig) -> Self {
        Self {
            program: config.command.clone(),
            args: config.args.clone(),
            env: config.env.clone(),
        }
    }

    fn spawn(&self, id: usize) -> Result<WorkerProcess> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(&self.env)
            .env(WORKER_ID_ENV, id.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PagexError::Worker(format!("Failed to start worker `{}`: {}", self.program, e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PagexError::Worker(format!("Worker {} has no stdin", id)))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PagexError::Worker(format!("Worker {} has no stdout", id)))?;

        tracing::debug!(worker = id, program = %self.program, "Worker process started");

        Ok(WorkerProcess {
            id,
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
        })
    }
}

struct WorkerProcess {
    id: usize,
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl WorkerProcess {
    async fn call(&mut self, request: &WorkerRequest) -> Result<WorkerResponse> {
        let line = encode_line(request)?;
        self.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error("send request", e))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| self.io_error("send request", e))?;

        loop {
            match self.stdout.next_line().await {
                Ok(Some(line)) => match decode_message(&line) {
                    Some(WorkerMessage::Result(response)) => return Ok(response),
                    None => forward_output(&line).await,
                },
                Ok(None) => {
                    let status = match self.child.try_wait() {
                        Ok(Some(status)) => format!(" ({})", status),
                        _ => String::new(),
                    };
                    return Err(PagexError::Worker(format!(
                        "Worker {} exited before reporting a result{}",
                        self.id, status
                    )));
                }
                Err(e) => return Err(self.io_error("read result", e)),
            }
        }
    }

    fn io_error(&self, action: &str, err: std::io::Error) -> PagexError {
        PagexError::Worker(format!("Worker {} failed to {}: {}", self.id, action, err))
    }

    async fn kill(mut self) {
        if let Err(e) = self.child.kill().await {
            tracing::debug!(worker = self.id, error = %e, "Failed to kill worker process");
        }
    }

    /// Close stdin and wait for the worker to exit, killing it after `grace`
    async fn shutdown(mut self, grace: Duration) {
        drop(self.stdin);
        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => {
                tracing::debug!(worker = self.id, %status, "Worker process exited");
            }
            Ok(Err(e)) => {
                tracing::warn!(worker = self.id, error = %e, "Failed to wait for worker process");
            }
            Err(_) => {
                tracing::warn!(worker = self.id, "Worker did not exit in time, killing it");
                if let Err(e) = self.child.kill().await {
                    tracing::debug!(worker = self.id, error = %e, "Failed to kill worker process");
                }
            }
        }
    }
}

// Worker output that is not part of the protocol goes to our stdout as-is
async fn forward_output(line: &str) {
    let mut stdout = tokio::io::stdout();
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    if stdout.write_all(buf.as_bytes()).await.is_ok() {
        let _ = stdout.flush().await;
    }
}

struct Slot {
    id: usize,
    process: Option<WorkerProcess>,
}

/// Fixed-size pool of worker processes
pub struct WorkerPool {
    command: WorkerCommand,
    size: usize,
    shutdown_grace: Duration,
    idle_tx: mpsc::UnboundedSender<Slot>,
    idle_rx: Mutex<mpsc::UnboundedReceiver<Slot>>,
}

impl WorkerPool {
    /// Start `size` workers (at least one)
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `PagexError::Worker` if any worker process cannot be started.
    pub fn start(command: WorkerCommand, size: usize) -> Result<Self> {
        let size = size.max(1);
        let (idle_tx, idle_rx) = mpsc::unbounded_channel();

        for id in 0..size {
            let process = command.spawn(id)?;
            idle_tx
                .send(Slot {
                    id,
                    process: Some(process),
                })
                .map_err(|_| PagexError::Worker("Worker pool closed during startup".to_string()))?;
        }

        tracing::info!(workers = size, program = %command.program, "Worker pool started");

        Ok(Self {
            command,
            size,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            idle_tx,
            idle_rx: Mutex::new(idle_rx),
        })
    }

    /// Override how long shutdown waits before killing a worker
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Number of worker slots
    pub fn size(&self) -> usize {
        self.size
    }

    async fn acquire(&self) -> Option<Slot> {
        self.idle_rx.lock().await.recv().await
    }

    async fn render_on(&self, slot: &mut Slot, task: &RenderTask) -> RenderResult {
        let mut process = match slot.process.take() {
            Some(process) => process,
            None => match self.command.spawn(slot.id) {
                Ok(process) => {
                    tracing::info!(worker = slot.id, "Worker process restarted");
                    process
                }
                Err(e) => return RenderResult::failed(&task.path, e.to_string()),
            },
        };

        let request = WorkerRequest::from_task(task);
        match process.call(&request).await {
            Ok(response) => {
                slot.process = Some(process);
                response.into_result(&task.path)
            }
            Err(e) => {
                tracing::warn!(
                    worker = slot.id,
                    path = %task.path,
                    error = %e,
                    "Worker failed during task"
                );
                process.kill().await;
                RenderResult::failed(&task.path, e.to_string())
            }
        }
    }
}

#[async_trait]
impl Renderer for WorkerPool {
    async fn render(&self, task: &RenderTask) -> RenderResult {
        let Some(mut slot) = self.acquire().await else {
            return RenderResult::failed(&task.path, "Worker pool is shut down");
        };

        let result = self.render_on(&mut slot, task).await;

        // Fails only after shutdown; the dropped slot kills its process
        let _ = self.idle_tx.send(slot);
        result
    }

    async fn shutdown(&self) {
        let mut idle = self.idle_rx.lock().await;
        idle.close();

        let mut stopping = Vec::new();
        while let Ok(slot) = idle.try_recv() {
            if let Some(process) = slot.process {
                stopping.push(process.shutdown(self.shutdown_grace));
            }
        }

        let stopped = stopping.len();
        futures::future::join_all(stopping).await;
        tracing::info!(workers = stopped, "Worker pool shut down");
    }
}
