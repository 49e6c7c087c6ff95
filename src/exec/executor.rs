// src/exec/executor.rs

//! Bounded-concurrency scheduler for tool invocations.
//!
//! With `jobs == 1` invocations run strictly one after another. Otherwise the
//! executor keeps up to `jobs` processes in a pending set and loops over three
//! steps until the worklist and the pending set are both empty:
//!
//! 1. drain: every pending process that has exited is removed, its output is
//!    printed and its exit code folded into the run verdict,
//! 2. refill: free slots are filled from the front of the worklist,
//! 3. yield: if neither step made progress, wait for the next process exit
//!    (or, while load-throttled, for a short recheck interval).
//!
//! Drain order follows the pending set, so with `jobs > 1` the printed order
//! is neither launch order nor strict completion order. Every invocation is
//! still printed exactly once.

use std::collections::VecDeque;
use std::io::Write;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::errors::{Result, RunnerError};
use crate::exec::exit_code::worst_exit_code;
use crate::exec::invocation::Invocation;
use crate::exec::load::{LOAD_RECHECK_INTERVAL, LoadSource, SystemLoad, clamp_capacity};
use crate::exec::process::ProcessHandle;

/// Knobs for one [`Executor::execute`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecuteOptions {
    /// Echo `# <command>` to the diagnostic stream before each launch.
    pub verbose: bool,
    /// Maximum number of concurrently running processes (>= 1).
    pub jobs: usize,
    /// One-minute load average ceiling; `0.0` disables throttling.
    pub max_load_average: f64,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            jobs: 1,
            max_load_average: 0.0,
        }
    }
}

/// Result of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionSummary {
    /// Folded worst exit code over all processes.
    pub exit_code: i32,
    /// Number of processes started.
    pub launched: usize,
    /// Largest number of processes that were started but not yet drained.
    pub peak_running: usize,
}

pub struct Executor<L: LoadSource = SystemLoad> {
    options: ExecuteOptions,
    load: L,
}

impl Executor<SystemLoad> {
    pub fn new(options: ExecuteOptions) -> Self {
        Self::with_load_source(options, SystemLoad)
    }
}

impl<L: LoadSource> Executor<L> {
    pub fn with_load_source(options: ExecuteOptions, load: L) -> Self {
        Self { options, load }
    }

    /// Run all `invocations`, writing each process's output to `out` and
    /// verbose command echoes to `diag`.
    ///
    /// A launch failure stops further launches; processes that are already
    /// running are still drained and printed before the error is returned.
    pub async fn execute(
        &mut self,
        invocations: Vec<Invocation>,
        out: &mut (dyn Write + Send),
        diag: &mut (dyn Write + Send),
    ) -> Result<ExecutionSummary> {
        if self.options.jobs == 0 {
            return Err(RunnerError::ConfigError(
                "jobs must be >= 1 (got 0)".to_string(),
            ));
        }

        info!(
            invocations = invocations.len(),
            jobs = self.options.jobs,
            "starting tool runs"
        );

        let summary = if self.options.jobs == 1 {
            self.execute_sequential(invocations, out, diag).await?
        } else {
            self.execute_bounded(invocations, out, diag).await?
        };

        info!(
            exit_code = summary.exit_code,
            launched = summary.launched,
            peak_running = summary.peak_running,
            "all tool runs finished"
        );
        Ok(summary)
    }

    async fn execute_sequential(
        &mut self,
        invocations: Vec<Invocation>,
        out: &mut (dyn Write + Send),
        diag: &mut (dyn Write + Send),
    ) -> Result<ExecutionSummary> {
        let mut summary = ExecutionSummary::default();

        for invocation in invocations {
            let mut handle = invocation.start(self.options.verbose, &mut *diag, None)?;
            summary.launched += 1;
            summary.peak_running = 1;

            let code = drain(&mut handle, out).await?;
            summary.exit_code = worst_exit_code(summary.exit_code, code);
        }

        Ok(summary)
    }

    async fn execute_bounded(
        &mut self,
        invocations: Vec<Invocation>,
        out: &mut (dyn Write + Send),
        diag: &mut (dyn Write + Send),
    ) -> Result<ExecutionSummary> {
        let jobs = self.options.jobs;
        let (completion_tx, mut completion_rx) = mpsc::unbounded_channel();

        let mut summary = ExecutionSummary::default();
        let mut worklist: VecDeque<Invocation> = invocations.into();
        let mut pending: Vec<ProcessHandle> = Vec::with_capacity(jobs);
        let mut fatal: Option<RunnerError> = None;

        while !pending.is_empty() || (fatal.is_none() && !worklist.is_empty()) {
            let mut progressed = false;
            let mut throttled = false;

            // Drain completed processes.
            let (done, running): (Vec<_>, Vec<_>) =
                pending.into_iter().partition(|h| h.poll().is_some());
            pending = running;

            for mut handle in done {
                progressed = true;
                match drain(&mut handle, out).await {
                    Ok(code) => summary.exit_code = worst_exit_code(summary.exit_code, code),
                    Err(e @ RunnerError::OutputDecode { .. }) => {
                        error!(command = %handle.command(), error = %e, "cannot read tool output");
                        if let Some(code) = handle.exit_status() {
                            summary.exit_code = worst_exit_code(summary.exit_code, code);
                        }
                        if fatal.is_none() {
                            fatal = Some(e);
                        }
                    }
                    Err(e) => return Err(e),
                }
            }

            // Refill free slots from the front of the worklist.
            if fatal.is_none() && !worklist.is_empty() {
                let free = jobs - pending.len();
                let capacity = if self.options.max_load_average > 0.0 {
                    let load = self.load.one_minute();
                    let clamped =
                        clamp_capacity(free, self.options.max_load_average, load, pending.len());
                    if clamped < free {
                        throttled = true;
                        debug!(?load, free, clamped, "load average limits new launches");
                    }
                    clamped
                } else {
                    free
                };

                for _ in 0..capacity {
                    let Some(invocation) = worklist.pop_front() else {
                        break;
                    };
                    match invocation.start(
                        self.options.verbose,
                        &mut *diag,
                        Some(completion_tx.clone()),
                    ) {
                        Ok(handle) => {
                            pending.push(handle);
                            summary.launched += 1;
                            progressed = true;
                        }
                        Err(e) => {
                            error!(
                                command = %invocation,
                                error = %e,
                                pending = pending.len(),
                                "launch failed; draining running processes before aborting"
                            );
                            fatal = Some(e);
                            break;
                        }
                    }
                }

                summary.peak_running = summary.peak_running.max(pending.len());
            }

            // Yield until something changes.
            if !progressed && !pending.is_empty() {
                if throttled {
                    let _ = tokio::time::timeout(LOAD_RECHECK_INTERVAL, completion_rx.recv()).await;
                } else {
                    completion_rx.recv().await;
                }
            }
        }

        match fatal {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }
}

/// Print one finished process's output and return its exit code.
async fn drain(handle: &mut ProcessHandle, out: &mut (dyn Write + Send)) -> Result<i32> {
    let output = handle.get_output().await?;
    writeln!(out, "{output}")?;
    out.flush()?;

    let code = handle.wait().await?;
    debug!(command = %handle.command(), exit_code = code, "tool process drained");
    Ok(code)
}

/// Convenience wrapper around [`Executor::new`] + [`Executor::execute`].
pub async fn execute(
    invocations: Vec<Invocation>,
    options: ExecuteOptions,
    out: &mut (dyn Write + Send),
    diag: &mut (dyn Write + Send),
) -> Result<ExecutionSummary> {
    Executor::new(options).execute(invocations, out, diag).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_jobs_is_rejected() {
        let options = ExecuteOptions {
            jobs: 0,
            ..ExecuteOptions::default()
        };
        let mut out = Vec::new();
        let mut diag = Vec::new();

        let err = execute(Vec::new(), options, &mut out, &mut diag)
            .await
            .expect_err("jobs = 0 must fail");
        assert!(matches!(err, RunnerError::ConfigError(_)));
    }

    #[tokio::test]
    async fn empty_worklist_succeeds_in_both_regimes() {
        for jobs in [1, 4] {
            let options = ExecuteOptions {
                jobs,
                ..ExecuteOptions::default()
            };
            let mut out = Vec::new();
            let mut diag = Vec::new();

            let summary = execute(Vec::new(), options, &mut out, &mut diag)
                .await
                .expect("empty run");
            assert_eq!(summary, ExecutionSummary::default());
            assert!(out.is_empty());
        }
    }
}
