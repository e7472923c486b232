//! File-system adapters that feed ignore files into the engine.
//!
//! The matching core never touches the file system. These helpers read
//! pattern lines from disk or any [`BufRead`] source and locate ignore files
//! below a directory with [`walkdir`]. Every loaded [`RuleSet`] is scoped to
//! the directory containing its file and labelled with the file path.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::debug_exclude::trace_ignore_file_loaded;
use crate::{IgnoreOptions, LoadError, LoadReport, RuleSet};

/// File name searched for by [`discover_ignore_files`] when callers have no
/// preference.
pub const DEFAULT_IGNORE_FILE_NAME: &str = ".gitignore";

/// Reads pattern lines from `reader` into a new set scoped to `base`.
///
/// # Errors
///
/// Returns [`LoadError::Config`] for an empty base and
/// [`LoadError::Stream`] when reading fails. Lines that do not compile are
/// collected in the returned [`LoadReport`] instead.
pub fn read_rules<R: BufRead>(
    base: &str,
    reader: R,
    options: IgnoreOptions,
) -> Result<LoadReport<RuleSet>, LoadError> {
    let mut set = RuleSet::new(base, options)?;
    let lines = reader
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(LoadError::Stream)?;
    let errors = set.add_lines(lines);
    Ok(LoadReport::new(set, errors))
}

/// Reads an ignore file into a set scoped to the file's parent directory.
///
/// # Errors
///
/// Returns [`LoadError::Read`] when the file cannot be opened or read, and
/// [`LoadError::Config`] when the path has no parent directory.
///
/// # Examples
///
/// ```no_run
/// use exclusions::{IgnoreOptions, read_ignore_file};
/// use std::path::Path;
///
/// let report = read_ignore_file(Path::new("/repo/.gitignore"), IgnoreOptions::default())?;
/// for error in report.errors() {
///     eprintln!("{error}");
/// }
/// let set = report.into_value();
/// assert_eq!(set.base().as_str(), "/repo/");
/// # Ok::<(), exclusions::LoadError>(())
/// ```
pub fn read_ignore_file(
    path: &Path,
    options: IgnoreOptions,
) -> Result<LoadReport<RuleSet>, LoadError> {
    let base = path
        .parent()
        .map(|parent| parent.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = File::open(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let report = read_rules(&base, BufReader::new(file), options).map_err(|error| match error {
        LoadError::Stream(source) => LoadError::Read {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    let (set, errors) = report.into_parts();
    trace_ignore_file_loaded(path, set.len(), errors.len());
    Ok(LoadReport::new(set.with_source(path), errors))
}

/// Lists every regular file named `file_name` below `root`, sorted by path.
///
/// Symlinks are not followed.
///
/// # Errors
///
/// Returns [`LoadError::Walk`] on the first directory that cannot be read.
pub fn discover_ignore_files(root: &Path, file_name: &str) -> Result<Vec<PathBuf>, LoadError> {
    let wanted = OsStr::new(file_name);
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|source| LoadError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && entry.file_name() == wanted {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
