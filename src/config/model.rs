// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::discover::DiscoverOptions;
use crate::exec::ExecuteOptions;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [run]
/// binary = "clang-tidy"
/// jobs = 4
/// load = 0.0
/// extensions = ["c", "cc", "cpp"]
/// exclude = ["third_party/**"]
/// extra_args = ["--quiet"]
/// ```
///
/// All keys are optional; command-line flags take precedence.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub run: RunSection,
}

/// `[run]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RunSection {
    /// Tool executable.
    #[serde(default)]
    pub binary: Option<PathBuf>,

    /// Parallelism; `1` runs files one after another.
    #[serde(default)]
    pub jobs: Option<usize>,

    /// One-minute load average ceiling (`0` = off).
    #[serde(default)]
    pub load: Option<f64>,

    /// Replaces the default extension list when set.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    /// Added to any `--exclude` flags.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Used when no `-- ARGS` are given on the command line.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub tool: PathBuf,
    pub root: PathBuf,
    pub execute: ExecuteOptions,
    pub discover: DiscoverOptions,
    pub extra_args: Vec<String>,
    pub dry_run: bool,
}
