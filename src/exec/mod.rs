// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`invocation`] describes one tool command (`[tool, file, args...]`).
//! - [`process`] launches a command and captures its combined stdout/stderr.
//! - [`executor`] runs a worklist of invocations under a parallelism cap.
//! - [`exit_code`] folds per-process exit codes into one verdict.
//! - [`load`] optionally throttles launches by system load average.

pub mod executor;
pub mod exit_code;
pub mod invocation;
pub mod load;
pub mod process;

pub use executor::{ExecuteOptions, ExecutionSummary, Executor, execute};
pub use exit_code::{exit_code_of, fold_exit_codes, worst_exit_code};
pub use invocation::Invocation;
pub use load::{LoadSource, SystemLoad};
pub use process::ProcessHandle;
