use std::fmt;

use crate::compiled::CompiledMatcher;
use crate::options::IgnoreOptions;
use crate::path::NormalizedPath;
use crate::pattern::{ParsedPattern, PatternFlags};

/// What the caller knows about the file-system entry behind a path.
///
/// Directory-only rules (trailing `/`) can only be enforced when the caller
/// says the path is a file. With [`EntryKind::Unknown`] the path string alone
/// decides and such rules match files too.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum EntryKind {
    /// No file-type information is available.
    #[default]
    Unknown,
    /// The path names a regular file, symlink, or other non-directory.
    File,
    /// The path names a directory.
    Directory,
}

impl EntryKind {
    /// Builds an entry kind from an `is_dir` flag.
    #[must_use]
    pub const fn from_is_dir(is_dir: bool) -> Self {
        if is_dir { Self::Directory } else { Self::File }
    }

    pub(crate) const fn may_be_directory(self) -> bool {
        !matches!(self, Self::File)
    }
}

/// A compiled, immutable ignore rule scoped to one base directory.
#[derive(Clone, Debug)]
pub struct Rule {
    pattern: ParsedPattern,
    matcher: CompiledMatcher,
    base: NormalizedPath,
    line: Option<usize>,
    options: IgnoreOptions,
}

impl Rule {
    pub(crate) const fn new(
        pattern: ParsedPattern,
        matcher: CompiledMatcher,
        base: NormalizedPath,
        line: Option<usize>,
        options: IgnoreOptions,
    ) -> Self {
        Self {
            pattern,
            matcher,
            base,
            line,
            options,
        }
    }

    /// Returns the pattern text as it appeared in the source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.original()
    }

    /// Returns the parsed form of the pattern.
    #[must_use]
    pub const fn parsed(&self) -> &ParsedPattern {
        &self.pattern
    }

    /// Returns the flags derived from the pattern.
    #[must_use]
    pub const fn flags(&self) -> PatternFlags {
        self.pattern.flags()
    }

    /// Returns `true` for `!` rules that re-include paths.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.pattern.flags().negated
    }

    /// Returns the base directory the rule is scoped to.
    #[must_use]
    pub const fn base(&self) -> &NormalizedPath {
        &self.base
    }

    /// Returns the 1-based source line, when the rule was read from lines.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        self.line
    }

    /// Returns the options the rule was compiled with.
    #[must_use]
    pub const fn options(&self) -> IgnoreOptions {
        self.options
    }

    /// Tests a path that is already relative to [`Rule::base`].
    ///
    /// Leading and trailing slashes are ignored; an empty path never matches.
    #[must_use]
    pub fn matches(&self, relative: &str, kind: EntryKind) -> bool {
        let relative = relative.trim_matches('/');
        if relative.is_empty() {
            return false;
        }
        self.matcher
            .is_match(relative, kind, self.pattern.flags().directory_only)
    }

    /// Tests a full path, returning `false` when it lies outside the base.
    #[must_use]
    pub fn matches_path(&self, path: &str, kind: EntryKind) -> bool {
        let path = NormalizedPath::new(path);
        path.strip_base(&self.base)
            .is_some_and(|relative| self.matches(relative, kind))
    }

    /// Returns the same rule scoped to another base directory.
    pub(crate) fn rebased(&self, base: NormalizedPath) -> Self {
        Self {
            base,
            ..self.clone()
        }
    }

    pub(crate) fn same_identity(&self, other: &Self) -> bool {
        self.pattern() == other.pattern() && self.options == other.options
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.pattern())?;
        if let Some(line) = self.line {
            write!(f, " #{line}")?;
        }
        Ok(())
    }
}
