// src/exec/process.rs

//! A launched tool process and its captured output.
//!
//! stdout and stderr of the child share one anonymous temporary file, so the
//! captured text keeps the order in which the tool wrote it. The child itself
//! is owned by a small waiter task which publishes the exit code through a
//! `watch` channel; the handle only ever reads that value, which keeps
//! [`ProcessHandle::poll`] non-blocking.

use std::fs::File;
use std::io::SeekFrom;
use std::process::Stdio;

use anyhow::anyhow;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::process::Command;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::errors::{Result, RunnerError};
use crate::exec::exit_code::exit_code_of;
use crate::exec::invocation::Invocation;

/// Pinged by a waiter task after its process has terminated.
pub type CompletionSender = mpsc::UnboundedSender<()>;

#[derive(Debug)]
enum CaptureState {
    /// Process may still be writing; the file is rewound and read on demand.
    Capturing(File),
    /// Output has been read once and the capture file released.
    Cached(String),
}

impl CaptureState {
    fn cached(&self) -> Option<&str> {
        match self {
            CaptureState::Cached(text) => Some(text),
            CaptureState::Capturing(_) => None,
        }
    }
}

/// One in-flight or completed tool process.
#[derive(Debug)]
pub struct ProcessHandle {
    command: String,
    status_rx: watch::Receiver<Option<i32>>,
    state: CaptureState,
}

impl ProcessHandle {
    /// Spawn `invocation` with stdout+stderr redirected into a fresh
    /// temporary file.
    ///
    /// `completions`, when given, receives one message after the process has
    /// exited. Launch failures are returned as [`RunnerError::Launch`].
    pub fn start(invocation: &Invocation, completions: Option<CompletionSender>) -> Result<Self> {
        let command = invocation.to_string();
        let program = invocation.program().ok_or_else(|| RunnerError::Launch {
            command: command.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;

        let capture = tempfile::tempfile()?;
        let stdout = capture.try_clone()?;
        let stderr = capture.try_clone()?;

        let mut cmd = Command::new(program);
        cmd.args(invocation.args())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| RunnerError::Launch {
            command: command.clone(),
            source,
        })?;
        let pid = child.id();

        // Fast path for tools that are already done by now.
        let initial = match child.try_wait() {
            Ok(Some(status)) => Some(exit_code_of(status)),
            Ok(None) => None,
            Err(e) => {
                debug!(command = %command, error = %e, "initial try_wait failed");
                None
            }
        };

        let (status_tx, status_rx) = watch::channel(initial);

        if initial.is_none() {
            let waiter_command = command.clone();
            tokio::spawn(async move {
                let code = match child.wait().await {
                    Ok(status) => exit_code_of(status),
                    Err(e) => {
                        warn!(
                            command = %waiter_command,
                            error = %e,
                            "waiting for tool process failed; recording exit code -1"
                        );
                        -1
                    }
                };
                let _ = status_tx.send(Some(code));
                if let Some(tx) = completions {
                    let _ = tx.send(());
                }
            });
        } else if let Some(tx) = completions {
            let _ = tx.send(());
        }

        debug!(command = %command, pid, "tool process started");

        Ok(Self {
            command,
            status_rx,
            state: CaptureState::Capturing(capture),
        })
    }

    /// Exit code if the process has terminated, `None` otherwise. Never blocks.
    pub fn poll(&self) -> Option<i32> {
        *self.status_rx.borrow()
    }

    /// Terminal exit code of the process; `None` while it is still running.
    pub fn exit_status(&self) -> Option<i32> {
        self.poll()
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_output_cached(&self) -> bool {
        self.state.cached().is_some()
    }

    /// Wait for the process to terminate and return its exit code.
    pub async fn wait(&self) -> Result<i32> {
        wait_for_exit(self.status_rx.clone(), &self.command).await
    }

    /// Combined stdout+stderr of the process.
    ///
    /// The first call waits for termination, reads the whole capture file and
    /// releases it; every later call returns the cached text.
    pub async fn get_output(&mut self) -> Result<&str> {
        if let CaptureState::Capturing(file) = &self.state {
            let file = file.try_clone()?;
            wait_for_exit(self.status_rx.clone(), &self.command).await?;
            let text = read_capture(file, &self.command).await?;
            // Dropping the previous state closes the last descriptor of the
            // temporary file.
            self.state = CaptureState::Cached(text);
        }

        self.state.cached().ok_or_else(|| {
            RunnerError::Other(anyhow!("output of `{}` was not captured", self.command))
        })
    }
}

async fn wait_for_exit(mut rx: watch::Receiver<Option<i32>>, command: &str) -> Result<i32> {
    let status = rx.wait_for(Option::is_some).await.map_err(|_| {
        RunnerError::Other(anyhow!(
            "process watcher for `{command}` stopped before reporting an exit status"
        ))
    })?;
    Ok((*status).unwrap_or(-1))
}

async fn read_capture(file: File, command: &str) -> Result<String> {
    let mut file = tokio::fs::File::from_std(file);
    file.seek(SeekFrom::Start(0)).await?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).await?;

    String::from_utf8(bytes).map_err(|source| RunnerError::OutputDecode {
        command: command.to_string(),
        source,
    })
}
