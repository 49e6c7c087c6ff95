// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No tool executable was given on the command line or in the config file.
    #[error("tool executable not configured (pass --binary or set [run].binary)")]
    MissingTool,

    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("output of `{command}` is not valid UTF-8: {source}")]
    OutputDecode {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("source discovery failed: {0}")]
    Discovery(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
