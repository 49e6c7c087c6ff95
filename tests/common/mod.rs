#![allow(dead_code)]

pub use tidyrun_test_utils::builders;
pub use tidyrun_test_utils::stub_tool;
pub use tidyrun_test_utils::{init_tracing, with_timeout};

use tidyrun::exec::Invocation;

/// `sh -c <script>` as an invocation, for driving the executor directly.
pub fn sh(script: &str) -> Invocation {
    Invocation::new(vec!["sh".to_string(), "-c".to_string(), script.to_string()])
}

/// Captured stdout of a run, as text.
pub fn text(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf).into_owned()
}
