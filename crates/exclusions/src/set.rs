use std::path::{Path, PathBuf};

use crate::debug_exclude::{trace_pattern_rejected, trace_rule_added};
use crate::{
    ConfigError, EntryKind, IgnoreOptions, LoadReport, NormalizedPath, PatternCompiler,
    PatternError, Rule,
};

/// Ordered rules sharing one base directory, typically one ignore file.
///
/// Rules are evaluated in definition order and the **last** matching rule
/// decides, so later lines override earlier ones regardless of negation. A
/// path that matches no rule is not ignored.
///
/// Adding a pattern whose text and options equal an existing rule drops the
/// earlier copy, so the set never evaluates the same rule twice and the
/// surviving copy sits at the most recent position.
///
/// # Examples
///
/// ```
/// use exclusions::{IgnoreOptions, RuleSet};
///
/// let set = RuleSet::from_lines("/r", ["*.log", "!keep.log"], IgnoreOptions::default())
///     .unwrap()
///     .into_value();
///
/// assert!(set.is_ignored("/r/other.log").0);
/// assert!(!set.is_ignored("/r/keep.log").0);
/// ```
#[derive(Clone, Debug)]
pub struct RuleSet {
    compiler: PatternCompiler,
    source: Option<PathBuf>,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates an empty set scoped to `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBasePath`] when `base` is empty.
    pub fn new(base: &str, options: IgnoreOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            compiler: PatternCompiler::new(base, options)?,
            source: None,
            rules: Vec::new(),
        })
    }

    /// Builds a set from the lines of an ignore file.
    ///
    /// Lines are numbered from 1. Lines that fail to compile are reported in
    /// the returned [`LoadReport`] and do not affect the other lines.
    pub fn from_lines<I, S>(
        base: &str,
        lines: I,
        options: IgnoreOptions,
    ) -> Result<LoadReport<Self>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new(base, options)?;
        let errors = set.add_lines(lines);
        Ok(LoadReport::new(set, errors))
    }

    /// Builds a set from inline patterns that carry no line numbers.
    pub fn from_literals<I, S>(
        base: &str,
        patterns: I,
        options: IgnoreOptions,
    ) -> Result<LoadReport<Self>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new(base, options)?;
        let errors = set.add_literals(patterns);
        Ok(LoadReport::new(set, errors))
    }

    /// Labels the set with the file it was read from.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the file the set was read from, if known.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Returns the base directory, terminated by `/`.
    #[must_use]
    pub const fn base(&self) -> &NormalizedPath {
        self.compiler.base()
    }

    /// Returns the options used for lines added without explicit options.
    #[must_use]
    pub const fn options(&self) -> IgnoreOptions {
        self.compiler.options()
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compiles and appends numbered lines using the set's options.
    pub fn add_lines<I, S>(&mut self, lines: I) -> Vec<PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_lines_with(lines, self.options())
    }

    /// Compiles and appends numbered lines using explicit options.
    ///
    /// Numbering continues after the highest line already in the set, so
    /// lines merged in later never share a number with a surviving rule.
    pub fn add_lines_with<I, S>(&mut self, lines: I, options: IgnoreOptions) -> Vec<PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiler = PatternCompiler::from_parts(self.base().clone(), options);
        let first = self.last_line() + 1;
        let mut errors = Vec::new();
        for (index, line) in lines.into_iter().enumerate() {
            self.add_compiled(compiler.compile_line(line.as_ref(), Some(first + index)), &mut errors);
        }
        errors
    }

    fn last_line(&self) -> usize {
        self.rules.iter().filter_map(Rule::line).max().unwrap_or(0)
    }

    /// Compiles and appends inline patterns using the set's options.
    pub fn add_literals<I, S>(&mut self, patterns: I) -> Vec<PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_literals_with(patterns, self.options())
    }

    /// Compiles and appends inline patterns using explicit options.
    pub fn add_literals_with<I, S>(
        &mut self,
        patterns: I,
        options: IgnoreOptions,
    ) -> Vec<PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiler = PatternCompiler::from_parts(self.base().clone(), options);
        let mut errors = Vec::new();
        for pattern in patterns {
            self.add_compiled(compiler.compile(pattern.as_ref()), &mut errors);
        }
        errors
    }

    /// Compiles and appends a single pattern using the set's options.
    ///
    /// Returns `Ok(false)` when the pattern is a comment or blank.
    pub fn add_pattern(&mut self, pattern: &str) -> Result<bool, PatternError> {
        match self.compiler.compile(pattern) {
            Ok(Some(rule)) => {
                self.push(rule);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(error) => {
                trace_pattern_rejected(self.base().as_str(), &error);
                Err(error)
            }
        }
    }

    /// Appends an already compiled rule, rescoping it to this set's base.
    pub fn add_rule(&mut self, rule: Rule) {
        let rule = if rule.base() == self.base() {
            rule
        } else {
            rule.rebased(self.base().clone())
        };
        self.push(rule);
    }

    fn add_compiled(
        &mut self,
        compiled: Result<Option<Rule>, PatternError>,
        errors: &mut Vec<PatternError>,
    ) {
        match compiled {
            Ok(Some(rule)) => self.push(rule),
            Ok(None) => {}
            Err(error) => {
                trace_pattern_rejected(self.base().as_str(), &error);
                errors.push(error);
            }
        }
    }

    fn push(&mut self, rule: Rule) {
        let before = self.rules.len();
        self.rules.retain(|existing| !existing.same_identity(&rule));
        trace_rule_added(
            self.base().as_str(),
            rule.pattern(),
            rule.is_negated(),
            self.rules.len() != before,
        );
        self.rules.push(rule);
    }

    /// Removes every rule whose pattern text equals `pattern` (after
    /// trimming), returning how many were removed.
    pub fn remove_rule(&mut self, pattern: &str) -> usize {
        let pattern = pattern.trim();
        let before = self.rules.len();
        self.rules.retain(|rule| rule.pattern() != pattern);
        before - self.rules.len()
    }

    /// Returns a copy of the set scoped to another base directory.
    ///
    /// Rules keep their text, line numbers, and order. The source label is
    /// dropped.
    pub fn rebased(&self, base: &str) -> Result<Self, ConfigError> {
        let compiler = PatternCompiler::new(base, self.options())?;
        let rules = self
            .rules
            .iter()
            .map(|rule| rule.rebased(compiler.base().clone()))
            .collect();
        Ok(Self {
            compiler,
            source: None,
            rules,
        })
    }

    /// Returns the last rule matching `path`, if any.
    ///
    /// Returns `None` when `path` does not lie below the base directory.
    #[must_use]
    pub fn evaluate(&self, path: &str, kind: EntryKind) -> Option<&Rule> {
        self.evaluate_normalized(&NormalizedPath::new(path), kind)
    }

    pub(crate) fn evaluate_normalized(&self, path: &NormalizedPath, kind: EntryKind) -> Option<&Rule> {
        let relative = path.strip_base(self.base())?;
        self.rules.iter().rev().find(|rule| rule.matches(relative, kind))
    }

    /// Returns whether `path` is ignored by this set and the deciding rule.
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> (bool, Option<&Rule>) {
        self.is_ignored_as(path, EntryKind::Unknown)
    }

    /// Like [`RuleSet::is_ignored`], with file-type information for
    /// directory-only rules.
    #[must_use]
    pub fn is_ignored_as(&self, path: &str, kind: EntryKind) -> (bool, Option<&Rule>) {
        let rule = self.evaluate(path, kind);
        (rule.is_some_and(|rule| !rule.is_negated()), rule)
    }
}
