// tests/config_errors.rs

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tempfile::NamedTempFile;
use tidyrun::cli::CliArgs;
use tidyrun::config::{load_settings, load_settings_with};
use tidyrun::fs::mock::MockFileSystem;
use tidyrun::errors::RunnerError;

fn args_with_config(config: &std::path::Path, extra: &[&str]) -> CliArgs {
    let config = config.to_string_lossy().into_owned();
    let mut argv = vec!["tidyrun", "-p", ".", "--config", config.as_str()];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).unwrap()
}

#[test]
fn run_section_fills_in_missing_flags() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[run]
binary = "/opt/llvm/bin/clang-tidy"
jobs = 6
extensions = ["cxx", "c"]
exclude = ["build/**"]
extra_args = ["--quiet"]
"#
    )
    .unwrap();

    let settings = load_settings(&args_with_config(file.path(), &[])).unwrap();

    assert_eq!(settings.tool, PathBuf::from("/opt/llvm/bin/clang-tidy"));
    assert_eq!(settings.execute.jobs, 6);
    assert_eq!(settings.discover.extensions, vec!["cxx", "c"]);
    assert_eq!(settings.discover.exclude, vec!["build/**"]);
    assert_eq!(settings.extra_args, vec!["--quiet"]);
}

#[test]
fn config_without_binary_is_missing_tool() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[run]\njobs = 2\n").unwrap();

    match load_settings(&args_with_config(file.path(), &[])) {
        Err(RunnerError::MissingTool) => {}
        Err(e) => panic!("Expected MissingTool, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn malformed_toml_returns_structured_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[run\nbinary = ").unwrap();

    match load_settings(&args_with_config(file.path(), &["-b", "tidy"])) {
        Err(RunnerError::TomlError(_)) => {}
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn config_is_read_through_the_filesystem_layer() {
    let fs = MockFileSystem::new();
    fs.add_file("./ci/tidyrun.toml", "[run]\nbinary = \"tidy\"\njobs = 3\n");

    let args = CliArgs::try_parse_from(["tidyrun", "-p", ".", "--config", "./ci/tidyrun.toml"])
        .unwrap();
    let settings = load_settings_with(&fs, &args).unwrap();

    assert_eq!(settings.tool, PathBuf::from("tidy"));
    assert_eq!(settings.execute.jobs, 3);
}

#[test]
fn unreadable_config_is_config_error() {
    let args = CliArgs::try_parse_from([
        "tidyrun",
        "-b",
        "tidy",
        "-p",
        ".",
        "--config",
        "/nonexistent/tidyrun.toml",
    ])
    .unwrap();

    match load_settings(&args) {
        Err(RunnerError::ConfigError(msg)) => assert!(msg.contains("cannot read config file")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}
