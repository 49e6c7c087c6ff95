//! Throwaway shell scripts standing in for the real checker tool.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Write an executable `/bin/sh` script named `name` into `dir`.
///
/// `body` is everything after the shebang; `$1` is the source file path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n"))
        .with_context(|| format!("writing stub tool {:?}", path))?;

    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms)
        .with_context(|| format!("making stub tool {:?} executable", path))?;
    Ok(path)
}

/// Tool that echoes its file argument and exits with a per-file code.
///
/// Each `(suffix, code)` pair makes files ending in `suffix` exit with
/// `code`; everything else exits 0.
#[cfg(unix)]
pub fn echo_tool(dir: &Path, exit_codes: &[(&str, i32)]) -> Result<PathBuf> {
    let mut body = String::from("echo \"checked $1\"\ncase \"$1\" in\n");
    for (suffix, code) in exit_codes {
        body.push_str(&format!("  *{suffix}) exit {code} ;;\n"));
    }
    body.push_str("esac\nexit 0");
    write_script(dir, "echo-tool", &body)
}

/// Tool that records concurrency in `dir/running`, sleeps a bit, then exits.
///
/// Each run appends `+` on start and `-` on exit; the log can be replayed
/// with [`max_overlap`] to find the largest number of overlapping runs.
#[cfg(unix)]
pub fn tracking_tool(dir: &Path, sleep_secs: &str) -> Result<PathBuf> {
    let log = dir.join("running");
    let body = format!(
        "echo + >> '{log}'\nsleep {sleep_secs}\necho \"done $1\"\necho - >> '{log}'",
        log = log.display()
    );
    write_script(dir, "tracking-tool", &body)
}

/// Largest number of `+` entries not yet matched by a `-` in a tracking log.
pub fn max_overlap(log: &str) -> usize {
    let mut running = 0usize;
    let mut peak = 0usize;
    for line in log.lines() {
        match line.trim() {
            "+" => {
                running += 1;
                peak = peak.max(running);
            }
            "-" => running = running.saturating_sub(1),
            _ => {}
        }
    }
    peak
}
