// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `tidyrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tidyrun",
    version,
    about = "Run a checker tool over every source file under a directory, in parallel.",
    long_about = None
)]
pub struct CliArgs {
    /// Print each tool command to stderr before it is launched.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to the tool executable (e.g. clang-tidy).
    ///
    /// Falls back to `[run].binary` from `--config`. Running without either
    /// is an error.
    #[arg(short = 'b', long = "binary", value_name = "PATH")]
    pub binary: Option<PathBuf>,

    /// Number of tool processes to run at once.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Do not start new jobs while the 1-minute load average is at or above
    /// this value. `0` disables the check.
    #[arg(short, long, value_name = "LOAD")]
    pub load: Option<f64>,

    /// Root directory to search for source files.
    #[arg(short = 'p', value_name = "PATH")]
    pub root: PathBuf,

    /// Source file extension to include (repeatable). Default: c, cc, cpp.
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Glob (relative to the root) of files or directories to skip (repeatable).
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Optional TOML config file with a `[run]` section.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TIDYRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Discover files and print the commands, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Extra arguments appended to every tool command (after `--`).
    #[arg(last = true, value_name = "ARGS")]
    pub extra_args: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_match_the_classic_runner() {
        let args = CliArgs::try_parse_from([
            "tidyrun", "-v", "-b", "/usr/bin/clang-tidy", "-j", "8", "-l", "4.5", "-p", "src",
        ])
        .unwrap();

        assert!(args.verbose);
        assert_eq!(args.binary, Some(PathBuf::from("/usr/bin/clang-tidy")));
        assert_eq!(args.jobs, Some(8));
        assert_eq!(args.load, Some(4.5));
        assert_eq!(args.root, PathBuf::from("src"));
        assert!(args.extra_args.is_empty());
    }

    #[test]
    fn binary_is_optional_at_parse_time() {
        let args = CliArgs::try_parse_from(["tidyrun", "-p", "."]).unwrap();
        assert_eq!(args.binary, None);
        assert_eq!(args.jobs, None);
    }

    #[test]
    fn root_is_required() {
        assert!(CliArgs::try_parse_from(["tidyrun", "-b", "tidy"]).is_err());
    }

    #[test]
    fn trailing_args_are_collected() {
        let args = CliArgs::try_parse_from([
            "tidyrun", "-b", "tidy", "-p", ".", "--ext", "cxx", "--", "--quiet", "-x",
        ])
        .unwrap();
        assert_eq!(args.extensions, vec!["cxx"]);
        assert_eq!(args.extra_args, vec!["--quiet", "-x"]);
    }
}
