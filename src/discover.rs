// src/discover.rs

//! Recursive discovery of the source files to run the tool on.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::errors::{Result, RunnerError};
use crate::fs::FileSystem;

/// Extensions picked up when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["c", "cc", "cpp"];

/// What counts as a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverOptions {
    /// File name suffixes without the leading dot (`"cpp"`, not `".cpp"`).
    pub extensions: Vec<String>,
    /// Glob patterns, relative to the root, for files and directories to skip.
    pub exclude: Vec<String>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude: Vec::new(),
        }
    }
}

/// Walk `root` and return every file whose name ends in one of the
/// configured extensions.
///
/// Directory entries are visited in sorted order, files of a directory before
/// its subdirectories, so the result is stable across runs. Symlinked
/// directories are not descended into; symlinked files are included.
pub fn discover_sources(
    fs: &dyn FileSystem,
    root: &Path,
    options: &DiscoverOptions,
) -> Result<Vec<PathBuf>> {
    if !fs.is_dir(root) {
        return Err(RunnerError::Discovery(format!(
            "search root {:?} is not a directory",
            root
        )));
    }

    let suffixes: Vec<String> = options
        .extensions
        .iter()
        .map(|ext| format!(".{}", ext.trim_start_matches('.')))
        .collect();
    let exclude = build_globset(&options.exclude)?;

    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let mut entries = fs
            .read_dir(&dir)
            .map_err(|e| RunnerError::Discovery(format!("{e:#}")))?;
        entries.sort();

        let mut subdirs = Vec::new();
        for path in entries {
            if is_excluded(exclude.as_ref(), root, &path) {
                debug!(path = ?path, "excluded from discovery");
                continue;
            }
            if fs.is_dir(&path) {
                if fs.is_symlink(&path) {
                    debug!(path = ?path, "not following directory symlink");
                    continue;
                }
                subdirs.push(path);
            } else if fs.is_file(&path) && has_source_suffix(&path, &suffixes) {
                files.push(path);
            }
        }

        // Reverse so the stack pops subdirectories in sorted order.
        stack.extend(subdirs.into_iter().rev());
    }

    debug!(root = ?root, count = files.len(), "source discovery finished");
    Ok(files)
}

fn has_source_suffix(path: &Path, suffixes: &[String]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
}

fn is_excluded(exclude: Option<&GlobSet>, root: &Path, path: &Path) -> bool {
    let Some(set) = exclude else {
        return false;
    };
    match path.strip_prefix(root) {
        Ok(rel) => set.is_match(rel.to_string_lossy().replace('\\', "/")),
        Err(_) => false,
    }
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(Some(builder.build()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn tree() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_file("./a.c", b"".to_vec());
        fs.add_file("./b.cpp", b"".to_vec());
        fs.add_file("./notes.txt", b"".to_vec());
        fs.add_file("./lib/z.cc", b"".to_vec());
        fs.add_file("./lib/inner/y.c", b"".to_vec());
        fs.add_file("./lib/header.h", b"".to_vec());
        fs.add_file("./third_party/x.c", b"".to_vec());
        fs
    }

    #[test]
    fn finds_default_extensions_in_stable_order() {
        let files = discover_sources(&tree(), Path::new("."), &DiscoverOptions::default()).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("./a.c"),
                PathBuf::from("./b.cpp"),
                PathBuf::from("./lib/z.cc"),
                PathBuf::from("./lib/inner/y.c"),
                PathBuf::from("./third_party/x.c"),
            ]
        );
    }

    #[test]
    fn exclude_prunes_directories() {
        let options = DiscoverOptions {
            exclude: vec!["third_party".to_string(), "lib/inner/**".to_string()],
            ..DiscoverOptions::default()
        };
        let files = discover_sources(&tree(), Path::new("."), &options).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("./a.c"),
                PathBuf::from("./b.cpp"),
                PathBuf::from("./lib/z.cc"),
            ]
        );
    }

    #[test]
    fn custom_extensions_accept_leading_dot() {
        let options = DiscoverOptions {
            extensions: vec![".h".to_string()],
            exclude: Vec::new(),
        };
        let files = discover_sources(&tree(), Path::new("."), &options).unwrap();
        assert_eq!(files, vec![PathBuf::from("./lib/header.h")]);
    }

    #[test]
    fn directory_symlinks_are_not_followed() {
        let fs = tree();
        fs.add_symlink("./lib/loop", ".");
        fs.add_symlink("./alias.c", "./a.c");

        let options = DiscoverOptions {
            exclude: vec!["third_party".to_string()],
            ..DiscoverOptions::default()
        };
        let files = discover_sources(&fs, Path::new("."), &options).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("./a.c"),
                PathBuf::from("./alias.c"),
                PathBuf::from("./b.cpp"),
                PathBuf::from("./lib/z.cc"),
                PathBuf::from("./lib/inner/y.c"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycle_on_disk_yields_each_file_once() {
        use crate::fs::RealFileSystem;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.c"), "int a;").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let files =
            discover_sources(&RealFileSystem, dir.path(), &DiscoverOptions::default()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.c")]);
    }

    #[test]
    fn missing_root_is_a_discovery_error() {
        let err = discover_sources(&tree(), Path::new("./nope"), &DiscoverOptions::default())
            .unwrap_err();
        assert!(matches!(err, RunnerError::Discovery(_)));
    }

    #[test]
    fn bad_exclude_pattern_is_reported() {
        let options = DiscoverOptions {
            exclude: vec!["[".to_string()],
            ..DiscoverOptions::default()
        };
        let err = discover_sources(&tree(), Path::new("."), &options).unwrap_err();
        assert!(matches!(err, RunnerError::Pattern(_)));
    }
}
