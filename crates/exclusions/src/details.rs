use std::fmt;
use std::path::{Path, PathBuf};

use crate::rule::Rule;
use crate::set::RuleSet;

/// Read-only snapshot describing which rule decided a query.
///
/// Produced by [`crate::ExclusionResolver::explain`] and friends. The snapshot
/// owns its data, so it can outlive the resolver and be handed to loggers.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MatchDetails {
    matched_path: String,
    base: String,
    source: Option<PathBuf>,
    pattern: String,
    line: Option<usize>,
    negated: bool,
}

impl MatchDetails {
    pub(crate) fn new(path: &str, set: &RuleSet, rule: &Rule) -> Self {
        Self {
            matched_path: path.to_owned(),
            base: set.base().as_str().to_owned(),
            source: set.source().map(Path::to_path_buf),
            pattern: rule.pattern().to_owned(),
            line: rule.line(),
            negated: rule.is_negated(),
        }
    }

    /// Returns the normalised path that was queried.
    #[must_use]
    pub fn matched_path(&self) -> &str {
        &self.matched_path
    }

    /// Returns the base directory of the deciding rule set.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns the ignore file the deciding rule came from, if known.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Returns the deciding pattern as written.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the 1-based line of the deciding pattern, if known.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        self.line
    }

    /// Returns `true` when the deciding rule was a `!` re-inclusion.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.negated
    }

    /// Returns the verdict the deciding rule produced.
    #[must_use]
    pub const fn is_excluded(&self) -> bool {
        !self.negated
    }
}

impl fmt::Display for MatchDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.is_excluded() {
            "Ignored"
        } else {
            "Included"
        };
        write!(f, "[{verdict}] {}: [{}]", self.matched_path, self.pattern)?;
        if let Some(line) = self.line {
            write!(f, " #{line}")?;
        }
        match &self.source {
            Some(source) => write!(f, " ({})", source.display()),
            None => write!(f, " ({})", self.base),
        }
    }
}
