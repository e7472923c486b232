use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error produced when a single pattern line cannot be compiled.
///
/// Pattern errors are per line: the remaining lines of the same source are
/// still compiled and the errors are reported alongside the resulting set.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// The pattern contains the reserved marker sequence.
    #[error(
        "pattern '{pattern}'{} contains the reserved sequence '#$~'",
        line_suffix(.line)
    )]
    IllegalSequence {
        /// The offending pattern text.
        pattern: String,
        /// 1-based line number, when the pattern came from a file.
        line: Option<usize>,
    },

    /// The pattern uses glob syntax that cannot be translated into a matcher.
    #[error("unsupported pattern '{pattern}'{}: {source}", line_suffix(.line))]
    Unsupported {
        /// The offending pattern text.
        pattern: String,
        /// 1-based line number, when the pattern came from a file.
        line: Option<usize>,
        /// The underlying glob compilation error.
        #[source]
        source: globset::Error,
    },
}

impl PatternError {
    /// Returns the offending pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::IllegalSequence { pattern, .. } | Self::Unsupported { pattern, .. } => pattern,
        }
    }

    /// Returns the 1-based line number of the offending pattern, if known.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::IllegalSequence { line, .. } | Self::Unsupported { line, .. } => *line,
        }
    }

    /// Attaches a line number to the error.
    #[must_use]
    pub fn with_line(mut self, number: Option<usize>) -> Self {
        match &mut self {
            Self::IllegalSequence { line, .. } | Self::Unsupported { line, .. } => *line = number,
        }
        self
    }
}

/// Error produced when the engine is configured with invalid scope data.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A rule set or registration was given an empty base directory.
    #[error("base path must not be empty")]
    MissingBasePath,
}

/// Error produced by the file-system adapters in [`crate::load`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// An ignore file could not be read.
    #[error("cannot read ignore file '{}': {source}", .path.display())]
    Read {
        /// Path of the ignore file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading pattern lines from a stream failed.
    #[error("cannot read ignore rules: {0}")]
    Stream(#[source] io::Error),

    /// A directory could not be traversed while discovering ignore files.
    #[error("cannot walk '{}': {source}", .root.display())]
    Walk {
        /// Root of the traversal.
        root: PathBuf,
        /// The underlying traversal error.
        #[source]
        source: walkdir::Error,
    },

    /// The ignore file resolved to an invalid base directory.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A successfully built value together with the pattern errors met on the way.
#[derive(Clone, Debug)]
pub struct LoadReport<T> {
    value: T,
    errors: Vec<PatternError>,
}

impl<T> LoadReport<T> {
    pub(crate) const fn new(value: T, errors: Vec<PatternError>) -> Self {
        Self { value, errors }
    }

    /// Returns the built value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Returns the per-line pattern errors.
    #[must_use]
    pub fn errors(&self) -> &[PatternError] {
        &self.errors
    }

    /// Returns `true` when every line compiled.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Discards the errors and returns the built value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns the value when every line compiled, or the errors otherwise.
    ///
    /// # Errors
    ///
    /// Returns the collected [`PatternError`]s when at least one line failed.
    pub fn into_result(self) -> Result<T, Vec<PatternError>> {
        if self.errors.is_empty() {
            Ok(self.value)
        } else {
            Err(self.errors)
        }
    }

    /// Splits the report into the value and its errors.
    #[must_use]
    pub fn into_parts(self) -> (T, Vec<PatternError>) {
        (self.value, self.errors)
    }
}

struct LineSuffix(Option<usize>);

#[allow(clippy::ref_option)]
const fn line_suffix(line: &Option<usize>) -> LineSuffix {
    LineSuffix(*line)
}

impl fmt::Display for LineSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(line) => write!(f, " at line {line}"),
            None => Ok(()),
        }
    }
}
