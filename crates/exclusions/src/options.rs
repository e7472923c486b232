/// Matching options applied when compiling patterns.
///
/// Options participate in rule identity: the same pattern text compiled with
/// different options yields two distinct rules inside a [`RuleSet`].
///
/// [`RuleSet`]: crate::RuleSet
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IgnoreOptions {
    case_sensitive: bool,
}

impl IgnoreOptions {
    /// Returns the default options: case-sensitive matching.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            case_sensitive: true,
        }
    }

    /// Returns options that match without regard to ASCII or Unicode case.
    #[must_use]
    pub const fn case_insensitive() -> Self {
        Self {
            case_sensitive: false,
        }
    }

    /// Sets whether pattern matching is case-sensitive.
    #[must_use]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Returns whether pattern matching is case-sensitive.
    #[must_use]
    pub const fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl Default for IgnoreOptions {
    fn default() -> Self {
        Self::new()
    }
}
