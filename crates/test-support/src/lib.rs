#![deny(unsafe_code)]

//! Shared helpers for tests that need ignore files on disk.
//!
//! [`IgnoreTree`] owns a temporary directory that is removed on drop and
//! offers small helpers to lay out files, directories, and ignore files
//! relative to it. Helpers panic on I/O failure since they only run inside
//! tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory tree populated by a test.
pub struct IgnoreTree {
    dir: TempDir,
}

impl IgnoreTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temporary directory"),
        }
    }

    /// Returns the root of the tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Joins `relative` onto the root.
    #[must_use]
    pub fn path(&self, relative: &str) -> PathBuf {
        if relative.is_empty() {
            self.root().to_path_buf()
        } else {
            self.root().join(relative)
        }
    }

    /// Returns `relative` below the root as a `/`-separated string, the form
    /// exclusion queries take.
    #[must_use]
    pub fn query(&self, relative: &str) -> String {
        self.path(relative).to_string_lossy().replace('\\', "/")
    }

    /// Creates a directory and its parents.
    pub fn dir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).expect("create directory");
        path
    }

    /// Writes a file, creating parent directories as needed.
    pub fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    /// Writes an ignore file called `file_name` into `directory`, one
    /// pattern per line.
    pub fn ignore_file(&self, directory: &str, file_name: &str, lines: &[&str]) -> PathBuf {
        let relative = if directory.is_empty() {
            file_name.to_owned()
        } else {
            format!("{}/{file_name}", directory.trim_end_matches('/'))
        };
        let mut contents = lines.join("\n");
        contents.push('\n');
        self.file(&relative, &contents)
    }

    /// Writes a `.gitignore` into `directory`.
    pub fn gitignore(&self, directory: &str, lines: &[&str]) -> PathBuf {
        self.ignore_file(directory, ".gitignore", lines)
    }
}

impl Default for IgnoreTree {
    fn default() -> Self {
        Self::new()
    }
}
