#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tidyrun::config::RunSettings;
use tidyrun::discover::DiscoverOptions;
use tidyrun::exec::ExecuteOptions;

/// Builder for a temporary source tree.
pub struct SourceTreeBuilder {
    files: Vec<(PathBuf, String)>,
}

impl SourceTreeBuilder {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn file(mut self, rel: &str, contents: &str) -> Self {
        self.files.push((PathBuf::from(rel), contents.to_string()));
        self
    }

    pub fn build(self) -> TempDir {
        let dir = tempfile::tempdir().expect("creating temp source tree");
        for (rel, contents) in self.files {
            let path = dir.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("creating parent dirs");
            }
            fs::write(&path, contents).expect("writing source file");
        }
        dir
    }
}

impl Default for SourceTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `RunSettings` to simplify test setup.
pub struct RunSettingsBuilder {
    settings: RunSettings,
}

impl RunSettingsBuilder {
    pub fn new(tool: &Path, root: &Path) -> Self {
        Self {
            settings: RunSettings {
                tool: tool.to_path_buf(),
                root: root.to_path_buf(),
                execute: ExecuteOptions::default(),
                discover: DiscoverOptions::default(),
                extra_args: Vec::new(),
                dry_run: false,
            },
        }
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.settings.execute.jobs = jobs;
        self
    }

    pub fn verbose(mut self, val: bool) -> Self {
        self.settings.execute.verbose = val;
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.settings.discover.exclude.push(pattern.to_string());
        self
    }

    pub fn extra_arg(mut self, arg: &str) -> Self {
        self.settings.extra_args.push(arg.to_string());
        self
    }

    pub fn dry_run(mut self, val: bool) -> Self {
        self.settings.dry_run = val;
        self
    }

    pub fn build(self) -> RunSettings {
        self.settings
    }
}
