use std::borrow::Borrow;
use std::fmt;

/// Slash-normalised path string used for every prefix comparison.
///
/// Backslashes are converted to `/` and surrounding whitespace is trimmed.
/// Directory values produced by [`NormalizedPath::directory`] always end with
/// a single `/`, which turns "is `path` below `base`" into a plain string
/// prefix test that cannot confuse `/repo/build` with `/repo/builder`.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    /// Normalises a path as supplied by a caller.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().replace('\\', "/"))
    }

    /// Normalises a directory path and terminates it with `/`.
    ///
    /// An empty or whitespace-only input stays empty so callers can reject
    /// it.
    #[must_use]
    pub fn directory(raw: &str) -> Self {
        let mut path = Self::new(raw);
        if !path.0.is_empty() && !path.0.ends_with('/') {
            path.0.push('/');
        }
        path
    }

    /// Returns the normalised text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the path is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when `self` lies strictly below the directory `base`.
    #[must_use]
    pub fn is_within(&self, base: &Self) -> bool {
        self.strip_base(base).is_some_and(|rest| !rest.is_empty())
    }

    /// Strips the directory `base` from the front of the path.
    ///
    /// Returns `None` when the path does not start with `base`.
    #[must_use]
    pub fn strip_base<'a>(&'a self, base: &Self) -> Option<&'a str> {
        self.0.strip_prefix(base.as_str())
    }

    /// Iterates over the directory prefixes of the path, deepest first.
    ///
    /// Every yielded prefix ends with `/`. For `/a/b/c.txt` this yields
    /// `/a/b/`, `/a/`, and `/`.
    pub fn ancestors(&self) -> impl Iterator<Item = &str> + '_ {
        self.0
            .char_indices()
            .rev()
            .filter(|&(_, c)| c == '/')
            .map(|(index, _)| &self.0[..=index])
    }

    /// Consumes the path and returns the owned string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NormalizedPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
