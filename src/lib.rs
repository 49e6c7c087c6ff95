// src/lib.rs

pub mod cli;
pub mod config;
pub mod discover;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;

use std::io::Write;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{RunSettings, load_settings_with};
use crate::discover::discover_sources;
use crate::errors::{Result, RunnerError};
use crate::exec::{Executor, Invocation};
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// Runs [`run_cli`] against the real filesystem, with stdout for tool output
/// and stderr for diagnostics. Returns the folded exit code of all tool runs.
pub async fn run(args: CliArgs) -> Result<i32> {
    let mut out = std::io::stdout();
    let mut diag = std::io::stderr();
    run_cli(&args, &RealFileSystem, &mut out, &mut diag).await
}

/// Resolve settings from `args`, then [`run_with`].
///
/// Settings are resolved before anything is discovered or launched, so a
/// missing tool fails without touching `out` or `diag`.
pub async fn run_cli(
    args: &CliArgs,
    fs: &dyn FileSystem,
    out: &mut (dyn Write + Send),
    diag: &mut (dyn Write + Send),
) -> Result<i32> {
    let settings = load_settings_with(fs, args)?;
    debug!(?settings, "resolved run settings");
    run_with(&settings, fs, out, diag).await
}

/// Write the user-facing message for a fatal error and return the process
/// exit status for it.
pub fn report_error(err: &RunnerError, diag: &mut dyn Write) -> i32 {
    let _ = writeln!(diag, "error: {err}");
    1
}

/// Discover sources under `settings.root`, build one invocation per file and
/// execute them.
pub async fn run_with(
    settings: &RunSettings,
    fs: &dyn FileSystem,
    out: &mut (dyn Write + Send),
    diag: &mut (dyn Write + Send),
) -> Result<i32> {
    let invocations = build_invocations(settings, fs)?;
    info!(
        root = ?settings.root,
        files = invocations.len(),
        "discovered source files"
    );

    if settings.dry_run {
        print_dry_run(settings, &invocations, out)?;
        return Ok(0);
    }

    let mut executor = Executor::new(settings.execute);
    let summary = executor.execute(invocations, out, diag).await?;
    Ok(summary.exit_code)
}

/// One `[tool, file, extra_args...]` invocation per discovered source file.
pub fn build_invocations(settings: &RunSettings, fs: &dyn FileSystem) -> Result<Vec<Invocation>> {
    let files = discover_sources(fs, &settings.root, &settings.discover)?;
    Ok(files
        .iter()
        .map(|file| Invocation::for_file_with_args(&settings.tool, file, &settings.extra_args))
        .collect())
}

fn print_dry_run(
    settings: &RunSettings,
    invocations: &[Invocation],
    out: &mut (dyn Write + Send),
) -> Result<()> {
    writeln!(out, "tidyrun dry-run")?;
    writeln!(out, "  jobs = {}", settings.execute.jobs)?;
    if settings.execute.max_load_average > 0.0 {
        writeln!(out, "  load = {}", settings.execute.max_load_average)?;
    }
    writeln!(out)?;
    writeln!(out, "commands ({}):", invocations.len())?;
    for invocation in invocations {
        writeln!(out, "  {invocation}")?;
    }
    Ok(())
}
