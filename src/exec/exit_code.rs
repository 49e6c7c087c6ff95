// src/exec/exit_code.rs

//! Folding of per-process exit codes into one run verdict.
//!
//! Priority, highest first:
//! 1. abnormal termination (negative code, e.g. `-11` for SIGSEGV); the
//!    most negative code wins among several,
//! 2. ordinary failure (positive code); the largest code wins,
//! 3. success (`0`).

use std::process::ExitStatus;

/// Return the more severe of two exit codes.
///
/// A negative `cur` always wins over `worst` unless `worst` is even more
/// negative. A non-negative `cur` never overrides a negative `worst`.
pub fn worst_exit_code(worst: i32, cur: i32) -> i32 {
    if cur < 0 {
        worst.min(cur)
    } else if worst < 0 {
        worst
    } else {
        worst.max(cur)
    }
}

/// Left fold of [`worst_exit_code`] starting from `0`.
pub fn fold_exit_codes<I>(codes: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    codes.into_iter().fold(0, worst_exit_code)
}

/// Map an OS exit status onto the signed code space used by the fold.
///
/// Processes killed by a signal report `-signal`.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
