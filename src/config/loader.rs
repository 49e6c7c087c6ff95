// src/config/loader.rs

use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RunSettings};
use crate::config::validate::resolve_settings;
use crate::errors::{Result, RunnerError};
use crate::fs::{FileSystem, RealFileSystem};

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; merging with CLI flags and
/// validation happen in [`resolve_settings`].
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs
        .read_to_string(path)
        .map_err(|e| RunnerError::ConfigError(format!("cannot read config file: {e:#}")))?;

    let config: ConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Build the effective [`RunSettings`] for a command line.
///
/// Reads `--config` when given, then lets CLI flags override file values.
pub fn load_settings(args: &CliArgs) -> Result<RunSettings> {
    load_settings_with(&RealFileSystem, args)
}

/// [`load_settings`] reading the config file through `fs`.
pub fn load_settings_with(fs: &dyn FileSystem, args: &CliArgs) -> Result<RunSettings> {
    let file = match args.config.as_deref() {
        Some(path) => load_from_path(fs, path)?,
        None => ConfigFile::default(),
    };
    resolve_settings(args, file)
}
