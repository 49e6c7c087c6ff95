// src/exec/invocation.rs

//! Description of one external tool run.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::errors::Result;
use crate::exec::process::{CompletionSender, ProcessHandle};

/// One external command: program path followed by its arguments.
///
/// Built once per discovered source file and never mutated afterwards.
/// Arguments are kept as OS strings so paths reach the tool byte-for-byte;
/// only [`Display`](fmt::Display) is lossy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    command: Vec<OsString>,
}

impl Invocation {
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
        }
    }

    /// `[tool, file]`, the plain per-file command.
    pub fn for_file(tool: impl AsRef<Path>, file: impl AsRef<Path>) -> Self {
        Self::for_file_with_args(tool, file, &[])
    }

    /// `[tool, file, extra_args...]`.
    pub fn for_file_with_args(
        tool: impl AsRef<Path>,
        file: impl AsRef<Path>,
        extra_args: &[String],
    ) -> Self {
        let mut command = Vec::with_capacity(2 + extra_args.len());
        command.push(tool.as_ref().as_os_str().to_os_string());
        command.push(file.as_ref().as_os_str().to_os_string());
        command.extend(extra_args.iter().map(OsString::from));
        Self { command }
    }

    pub fn command(&self) -> &[OsString] {
        &self.command
    }

    pub fn program(&self) -> Option<&OsStr> {
        self.command.first().map(OsString::as_os_str)
    }

    pub fn args(&self) -> &[OsString] {
        self.command.get(1..).unwrap_or(&[])
    }

    /// Launch this invocation.
    ///
    /// When `verbose`, the rendered command is echoed to `diag` as
    /// `# <command>` right before the process is spawned.
    pub fn start(
        &self,
        verbose: bool,
        diag: &mut (dyn Write + Send),
        completions: Option<CompletionSender>,
    ) -> Result<ProcessHandle> {
        if verbose {
            writeln!(diag, "# {self}")?;
        }
        ProcessHandle::start(self, completions)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.command.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&part.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(parts: &[OsString]) -> Vec<&str> {
        parts.iter().map(|p| p.to_str().unwrap()).collect()
    }

    #[test]
    fn for_file_builds_tool_then_path() {
        let inv = Invocation::for_file("/usr/bin/clang-tidy", "src/a.c");
        assert_eq!(strs(inv.command()), ["/usr/bin/clang-tidy", "src/a.c"]);
        assert_eq!(inv.program(), Some(OsStr::new("/usr/bin/clang-tidy")));
        assert_eq!(strs(inv.args()), ["src/a.c"]);
    }

    #[test]
    fn extra_args_follow_the_file() {
        let extra = vec!["--quiet".to_string(), "-p=build".to_string()];
        let inv = Invocation::for_file_with_args("tidy", "b.cpp", &extra);
        assert_eq!(strs(inv.command()), ["tidy", "b.cpp", "--quiet", "-p=build"]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_are_kept_verbatim() {
        use std::os::unix::ffi::OsStrExt;

        let file = OsStr::from_bytes(b"src/\xffbad.c");
        let inv = Invocation::for_file("tidy", Path::new(file));

        assert_eq!(inv.args()[0].as_bytes(), b"src/\xffbad.c");
        assert_eq!(inv.to_string(), "tidy src/\u{FFFD}bad.c");
    }

    #[test]
    fn display_joins_with_spaces() {
        let inv = Invocation::for_file("tidy", "dir/x.cc");
        assert_eq!(inv.to_string(), "tidy dir/x.cc");
    }

    #[test]
    fn empty_command_has_no_program() {
        let inv = Invocation::new(Vec::<OsString>::new());
        assert_eq!(inv.program(), None);
        assert!(inv.args().is_empty());
        assert_eq!(inv.to_string(), "");
    }
}
