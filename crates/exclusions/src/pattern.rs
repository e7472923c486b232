//! Parsing of individual ignore-pattern lines.
//!
//! A line goes through these steps, in order:
//!
//! 1. A trailing `\r` is removed. Lines starting with `#` are comments.
//! 2. Surrounding spaces are trimmed, except a trailing space escaped as `\ `.
//!    Blank lines are skipped.
//! 3. A leading `!` negates the rule. `\!` and `\#` at the start lose their
//!    backslash and stand for the literal character.
//! 4. Leading `/` anchors the rule to the base directory, trailing `/` limits
//!    it to directories.
//! 5. Patterns shaped like `dir/*.ext` are anchored even without a leading
//!    `/`. This is not standard gitignore syntax; it only changes the
//!    [`PatternFlags::anchored`] flag because patterns containing a `/` are
//!    matched from the base directory anyway.

use crate::compiled::CompiledMatcher;
use crate::error::{ConfigError, PatternError};
use crate::options::IgnoreOptions;
use crate::path::NormalizedPath;
use crate::rule::Rule;

/// Marker sequence that is never accepted inside a pattern.
///
/// Lines containing it are rejected with [`PatternError::IllegalSequence`];
/// the rest of the source keeps compiling.
pub const RESERVED_SEQUENCE: &str = "#$~";

/// Flags derived from a pattern's surface syntax.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PatternFlags {
    /// The rule re-includes matching paths (`!` prefix).
    pub negated: bool,
    /// The rule matches from the base directory only.
    pub anchored: bool,
    /// The rule only applies to directories (trailing `/`).
    pub directory_only: bool,
    /// The glob body still contains a `/` after anchors were removed.
    pub contains_separator: bool,
}

/// A pattern line split into its flags and glob body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedPattern {
    original: String,
    body: String,
    flags: PatternFlags,
}

impl ParsedPattern {
    /// Returns the pattern text as written, minus line terminators and padding.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Returns the glob body with negation, anchors, and escapes processed.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the derived flags.
    #[must_use]
    pub const fn flags(&self) -> PatternFlags {
        self.flags
    }

    /// Returns `true` when the rule is matched against individual path
    /// segments rather than the whole relative path.
    #[must_use]
    pub const fn is_segment_pattern(&self) -> bool {
        !self.flags.anchored && !self.flags.contains_separator
    }

    /// Returns the literal text every match must start with, if the pattern
    /// is anchored.
    ///
    /// The prefix ends before the first wildcard, class, or escape character.
    #[must_use]
    pub fn literal_prefix(&self) -> Option<&str> {
        if !self.flags.anchored {
            return None;
        }
        let end = self
            .body
            .find(['*', '?', '[', '\\'])
            .unwrap_or(self.body.len());
        Some(&self.body[..end])
    }
}

/// Parses one raw line of ignore syntax.
///
/// Returns `Ok(None)` for comments, blank lines, and lines that reduce to an
/// empty pattern.
pub fn parse_pattern(raw: &str) -> Result<Option<ParsedPattern>, PatternError> {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    let line = line.trim_end_matches('\r');
    if line.starts_with('#') {
        return Ok(None);
    }

    let line = trim_pattern(line);
    if line.is_empty() {
        return Ok(None);
    }

    if line.contains(RESERVED_SEQUENCE) {
        return Err(PatternError::IllegalSequence {
            pattern: line.to_owned(),
            line: None,
        });
    }

    let mut flags = PatternFlags::default();
    let mut rest = line;

    if let Some(stripped) = rest.strip_prefix('!') {
        flags.negated = true;
        rest = stripped;
    }

    if rest.starts_with("\\#") || rest.starts_with("\\!") {
        rest = &rest[1..];
    }

    if rest.starts_with('/') {
        flags.anchored = true;
        rest = rest.trim_start_matches('/');
    }

    if rest.ends_with('/') && !rest.ends_with("\\/") {
        flags.directory_only = true;
        rest = rest.trim_end_matches('/');
    }

    if rest.is_empty() {
        return Ok(None);
    }

    flags.contains_separator = rest.contains('/');
    if !flags.anchored && is_directory_extension_glob(rest) {
        flags.anchored = true;
    }

    Ok(Some(ParsedPattern {
        original: line.to_owned(),
        body: rest.to_owned(),
        flags,
    }))
}

/// Trims surrounding spaces, keeping a trailing space escaped with `\`.
fn trim_pattern(line: &str) -> &str {
    let line = line.trim_start_matches([' ', '\t']);
    let mut end = line.len();
    while end > 0 && line.as_bytes()[end - 1] == b' ' {
        if end >= 2 && line.as_bytes()[end - 2] == b'\\' {
            break;
        }
        end -= 1;
    }
    line[..end].trim_end_matches('\t')
}

/// Returns `true` for bodies such as `docs/*.md` or `a/b/*.tmp`: a directory
/// name followed by `/` and, somewhere after it, a `*.` wildcard.
fn is_directory_extension_glob(body: &str) -> bool {
    let bytes = body.as_bytes();
    body.match_indices('/').any(|(index, _)| {
        index > 0
            && !matches!(bytes[index - 1], b'/' | b'\\')
            && body[index + 1..].contains("*.")
    })
}

/// Compiles pattern lines into [`Rule`]s for one base directory.
#[derive(Clone, Debug)]
pub struct PatternCompiler {
    base: NormalizedPath,
    options: IgnoreOptions,
}

impl PatternCompiler {
    /// Creates a compiler for rules scoped to `base`.
    pub fn new(base: &str, options: IgnoreOptions) -> Result<Self, ConfigError> {
        let base = NormalizedPath::directory(base);
        if base.is_empty() {
            return Err(ConfigError::MissingBasePath);
        }
        Ok(Self { base, options })
    }

    pub(crate) const fn from_parts(base: NormalizedPath, options: IgnoreOptions) -> Self {
        Self { base, options }
    }

    /// Returns the base directory rules are scoped to.
    #[must_use]
    pub const fn base(&self) -> &NormalizedPath {
        &self.base
    }

    /// Returns the options applied to compiled rules.
    #[must_use]
    pub const fn options(&self) -> IgnoreOptions {
        self.options
    }

    /// Compiles a single line without a line number.
    ///
    /// Returns `Ok(None)` when the line produces no rule.
    pub fn compile(&self, raw: &str) -> Result<Option<Rule>, PatternError> {
        self.compile_line(raw, None)
    }

    /// Compiles a single line, recording its 1-based line number.
    pub fn compile_line(&self, raw: &str, line: Option<usize>) -> Result<Option<Rule>, PatternError> {
        let Some(parsed) = parse_pattern(raw).map_err(|error| error.with_line(line))? else {
            return Ok(None);
        };

        let matcher = CompiledMatcher::new(&parsed, self.options).map_err(|source| {
            PatternError::Unsupported {
                pattern: parsed.original().to_owned(),
                line,
                source,
            }
        })?;

        Ok(Some(Rule::new(
            parsed,
            matcher,
            self.base.clone(),
            line,
            self.options,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(raw: &str) -> ParsedPattern {
        parse_pattern(raw).expect("valid").expect("not skipped")
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        for raw in ["", "   ", "\r", " \t ", "# comment", "#", "#!not negation\r"] {
            assert_eq!(parse_pattern(raw).unwrap(), None, "{raw:?}");
        }
    }

    #[test]
    fn carriage_return_is_stripped() {
        let pattern = parsed("*.log\r");
        assert_eq!(pattern.original(), "*.log");
        assert_eq!(pattern.body(), "*.log");
    }

    #[test]
    fn negation_is_detected_and_stripped() {
        let pattern = parsed("!keep.log");
        assert!(pattern.flags().negated);
        assert_eq!(pattern.body(), "keep.log");
        assert_eq!(pattern.original(), "!keep.log");
    }

    #[test]
    fn escaped_hash_and_bang_are_literal() {
        let hash = parsed("\\#notes");
        assert!(!hash.flags().negated);
        assert_eq!(hash.body(), "#notes");

        let bang = parsed("\\!important");
        assert!(!bang.flags().negated);
        assert_eq!(bang.body(), "!important");

        let negated_bang = parsed("!\\!important");
        assert!(negated_bang.flags().negated);
        assert_eq!(negated_bang.body(), "!important");
    }

    #[test]
    fn leading_slash_anchors() {
        let pattern = parsed("/config");
        assert!(pattern.flags().anchored);
        assert!(!pattern.flags().contains_separator);
        assert_eq!(pattern.body(), "config");
        assert!(!pattern.is_segment_pattern());
    }

    #[test]
    fn trailing_slash_marks_directory_only() {
        let pattern = parsed("build/");
        assert!(pattern.flags().directory_only);
        assert!(!pattern.flags().anchored);
        assert_eq!(pattern.body(), "build");
        assert!(pattern.is_segment_pattern());
    }

    #[test]
    fn internal_separator_is_recorded() {
        let pattern = parsed("doc/frotz");
        assert!(pattern.flags().contains_separator);
        assert!(!pattern.flags().anchored);
        assert!(!pattern.is_segment_pattern());
    }

    #[test]
    fn directory_extension_heuristic_anchors() {
        assert!(parsed("foo/*.ext").flags().anchored);
        assert!(parsed("a/b/*.c").flags().anchored);
        assert!(parsed("foo/bar/baz*.txt").flags().anchored);
        assert!(!parsed("foo/*ext").flags().anchored);
        assert!(!parsed("*.ext").flags().anchored);
    }

    #[test]
    fn surrounding_spaces_are_trimmed() {
        assert_eq!(parsed("  *.tmp  ").body(), "*.tmp");
    }

    #[test]
    fn escaped_trailing_space_is_kept() {
        let pattern = parsed("name\\ ");
        assert_eq!(pattern.body(), "name\\ ");
        let padded = parsed("name\\    ");
        assert_eq!(padded.body(), "name\\ ");
    }

    #[test]
    fn reserved_sequence_is_rejected() {
        let error = parse_pattern("foo#$~bar").unwrap_err();
        assert!(matches!(error, PatternError::IllegalSequence { .. }));
        assert_eq!(error.pattern(), "foo#$~bar");
    }

    #[test]
    fn reserved_sequence_in_comment_is_ignored() {
        assert_eq!(parse_pattern("# #$~").unwrap(), None);
    }

    #[test]
    fn lone_markers_produce_no_rule() {
        assert_eq!(parse_pattern("/").unwrap(), None);
        assert_eq!(parse_pattern("!").unwrap(), None);
        assert_eq!(parse_pattern("!/").unwrap(), None);
    }

    #[test]
    fn literal_prefix_stops_at_first_wildcard() {
        assert_eq!(parsed("/src/*.rs").literal_prefix(), Some("src/"));
        assert_eq!(parsed("/config").literal_prefix(), Some("config"));
        assert_eq!(parsed("/a\\*b").literal_prefix(), Some("a"));
        assert_eq!(parsed("/**/z").literal_prefix(), Some(""));
        assert_eq!(parsed("config").literal_prefix(), None);
    }

    #[test]
    fn compiler_rejects_empty_base() {
        let error = PatternCompiler::new("  ", IgnoreOptions::default()).unwrap_err();
        assert_eq!(error, ConfigError::MissingBasePath);
    }

    #[test]
    fn compiler_attaches_line_numbers_to_errors() {
        let compiler = PatternCompiler::new("/r", IgnoreOptions::default()).unwrap();
        let error = compiler.compile_line("[", Some(12)).unwrap_err();
        assert!(matches!(error, PatternError::Unsupported { .. }));
        assert_eq!(error.line(), Some(12));
        assert_eq!(error.pattern(), "[");

        let error = compiler.compile_line("x#$~", Some(4)).unwrap_err();
        assert_eq!(error.line(), Some(4));
    }

    #[test]
    fn compiler_skips_comments() {
        let compiler = PatternCompiler::new("/r", IgnoreOptions::default()).unwrap();
        assert!(compiler.compile("# nothing").unwrap().is_none());
        let rule = compiler.compile("*.log").unwrap().expect("rule");
        assert_eq!(rule.pattern(), "*.log");
        assert_eq!(rule.base().as_str(), "/r/");
    }
}
