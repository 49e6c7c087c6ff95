// src/config/validate.rs

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RunSettings};
use crate::discover::DiscoverOptions;
use crate::errors::{Result, RunnerError};
use crate::exec::ExecuteOptions;

/// Merge CLI flags over the `[run]` section and check the result.
///
/// A missing tool is reported as [`RunnerError::MissingTool`] so the binary
/// can fail before anything is discovered or launched.
pub fn resolve_settings(args: &CliArgs, file: ConfigFile) -> Result<RunSettings> {
    let run = file.run;

    let tool = args
        .binary
        .clone()
        .or(run.binary)
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(RunnerError::MissingTool)?;

    let jobs = args.jobs.or(run.jobs).unwrap_or(1);
    let max_load_average = args.load.or(run.load).unwrap_or(0.0);

    let extensions = if !args.extensions.is_empty() {
        args.extensions.clone()
    } else {
        run.extensions.unwrap_or_else(|| DiscoverOptions::default().extensions)
    };

    let mut exclude = args.exclude.clone();
    exclude.extend(run.exclude);

    let extra_args = if !args.extra_args.is_empty() {
        args.extra_args.clone()
    } else {
        run.extra_args
    };

    let settings = RunSettings {
        tool,
        root: args.root.clone(),
        execute: ExecuteOptions {
            verbose: args.verbose,
            jobs,
            max_load_average,
        },
        discover: DiscoverOptions {
            extensions,
            exclude,
        },
        extra_args,
        dry_run: args.dry_run,
    };

    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings(settings: &RunSettings) -> Result<()> {
    if settings.root.as_os_str().is_empty() {
        return Err(RunnerError::ConfigError(
            "search root (-p) must not be empty".to_string(),
        ));
    }

    if settings.execute.jobs == 0 {
        return Err(RunnerError::ConfigError(
            "jobs must be >= 1 (got 0)".to_string(),
        ));
    }

    let load = settings.execute.max_load_average;
    if !load.is_finite() || load < 0.0 {
        return Err(RunnerError::ConfigError(format!(
            "load must be a non-negative number (got {load})"
        )));
    }

    if settings.discover.extensions.is_empty()
        || settings
            .discover
            .extensions
            .iter()
            .any(|e| e.trim_start_matches('.').is_empty())
    {
        return Err(RunnerError::ConfigError(
            "extensions must be a non-empty list of non-empty suffixes".to_string(),
        ));
    }

    Ok(())
}
