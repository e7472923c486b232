use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::debug_exclude::{trace_exclusion_decision, trace_rule_set_registered};
use crate::load::{discover_ignore_files, read_ignore_file};
use crate::{
    ConfigError, EntryKind, IgnoreOptions, LoadError, MatchDetails, NormalizedPath, PatternError,
    Rule, RuleSet,
};

/// Label used for inline rule sets of an unnamed resolver.
const DEFAULT_RESOLVER_NAME: &str = "default";

/// Registry of rule sets answering exclusion queries across nested scopes.
///
/// Each registered [`RuleSet`] is keyed by its base directory; registering a
/// second set for the same base replaces the first. A query consults every
/// set whose base is a directory ancestor of the path, deepest first, and
/// the first set containing a matching rule decides the verdict. Within that
/// set the last matching rule wins, so a `!pattern` in a nested ignore file
/// re-includes a path that an ancestor file excludes.
///
/// Sets are held behind [`Arc`], which keeps cloning a resolver cheap and
/// lets [`crate::SharedResolver`] publish updated copies.
///
/// # Examples
///
/// ```
/// use exclusions::{EntryKind, ExclusionResolver, IgnoreOptions};
///
/// let mut resolver = ExclusionResolver::named("site");
/// resolver.add_rules_from_lines("/r", ["*.tmp"], IgnoreOptions::default())?;
/// resolver.add_rules_from_lines("/r/sub", ["!important.tmp"], IgnoreOptions::default())?;
///
/// assert!(resolver.is_excluded("/r/other.tmp"));
/// assert!(!resolver.is_excluded("/r/sub/important.tmp"));
///
/// let details = resolver.explain("/r/other.tmp", EntryKind::File).unwrap();
/// assert_eq!(details.pattern(), "*.tmp");
/// # Ok::<(), exclusions::ConfigError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExclusionResolver {
    name: Option<String>,
    sets: BTreeMap<String, Arc<RuleSet>>,
}

impl ExclusionResolver {
    /// Creates an empty, unnamed resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: None,
            sets: BTreeMap::new(),
        }
    }

    /// Creates an empty resolver whose name labels its inline rule sets.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            sets: BTreeMap::new(),
        }
    }

    /// Returns the resolver's name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Registers a set under its base directory.
    ///
    /// Returns the set previously registered for that base, if any.
    pub fn register(&mut self, set: impl Into<Arc<RuleSet>>) -> Option<Arc<RuleSet>> {
        let set = set.into();
        let base = set.base().as_str().to_owned();
        let rule_count = set.len();
        let previous = self.sets.insert(base.clone(), set);
        trace_rule_set_registered(&base, rule_count, previous.is_some());
        previous
    }

    /// Removes the set registered for `base`.
    pub fn unregister(&mut self, base: &str) -> Option<Arc<RuleSet>> {
        self.sets.remove(NormalizedPath::directory(base).as_str())
    }

    /// Returns the set registered for `base`.
    #[must_use]
    pub fn get(&self, base: &str) -> Option<&Arc<RuleSet>> {
        self.sets.get(NormalizedPath::directory(base).as_str())
    }

    /// Returns the number of registered sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` when no set is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Iterates over the registered sets ordered by base directory.
    pub fn rule_sets(&self) -> impl Iterator<Item = &RuleSet> + '_ {
        self.sets.values().map(|set| &**set)
    }

    /// Compiles numbered lines into the set at `base`, creating it if needed.
    ///
    /// Lines are merged into an existing set, so re-adding a pattern moves it
    /// to the end of that set's evaluation order. Line numbers continue from
    /// the highest one already in the set. The updated set replaces the
    /// registered one only after every line has been compiled.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBasePath`] when `base` is empty. Per-line
    /// failures are returned in the `Ok` vector.
    pub fn add_rules_from_lines<I, S>(
        &mut self,
        base: &str,
        lines: I,
        options: IgnoreOptions,
    ) -> Result<Vec<PatternError>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = self.editable_set(base, options)?;
        let errors = set.add_lines_with(lines, options);
        self.register(set);
        Ok(errors)
    }

    /// Compiles inline patterns into the set at `base`, creating it if needed.
    ///
    /// A newly created set is labelled `<base>.ignore_<name>` after the
    /// resolver's name so diagnostics can tell it apart from ignore files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBasePath`] when `base` is empty.
    pub fn add_rules_from_literals<I, S>(
        &mut self,
        base: &str,
        patterns: I,
        options: IgnoreOptions,
    ) -> Result<Vec<PatternError>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = self.editable_set(base, options)?;
        if set.is_empty() && set.source().is_none() {
            let label = self.inline_label(set.base());
            set = set.with_source(label);
        }
        let errors = set.add_literals_with(patterns, options);
        self.register(set);
        Ok(errors)
    }

    fn editable_set(&self, base: &str, options: IgnoreOptions) -> Result<RuleSet, ConfigError> {
        let base = NormalizedPath::directory(base);
        match self.sets.get(base.as_str()) {
            Some(existing) => Ok(RuleSet::clone(existing)),
            None => RuleSet::new(base.as_str(), options),
        }
    }

    fn inline_label(&self, base: &NormalizedPath) -> PathBuf {
        let name: String = self
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_RESOLVER_NAME)
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        PathBuf::from(format!("{base}.ignore_{name}"))
    }

    /// Discovers every `file_name` below `root` and registers one set per
    /// file, scoped to the file's directory.
    ///
    /// Returns the pattern errors of every file that had any, keyed by file.
    ///
    /// # Errors
    ///
    /// Returns the first traversal or read failure. Sets registered before
    /// the failure stay registered.
    pub fn load_tree(
        &mut self,
        root: &Path,
        file_name: &str,
        options: IgnoreOptions,
    ) -> Result<BTreeMap<PathBuf, Vec<PatternError>>, LoadError> {
        let mut failures = BTreeMap::new();
        for file in discover_ignore_files(root, file_name)? {
            let (set, errors) = read_ignore_file(&file, options)?.into_parts();
            self.register(set);
            if !errors.is_empty() {
                failures.insert(file, errors);
            }
        }
        Ok(failures)
    }

    /// Returns `true` when `path` is excluded.
    ///
    /// Equivalent to [`ExclusionResolver::is_excluded_as`] with
    /// [`EntryKind::Unknown`].
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.is_excluded_as(path, EntryKind::Unknown)
    }

    /// Returns `true` when `path` is excluded, using `kind` to enforce
    /// directory-only rules.
    #[must_use]
    pub fn is_excluded_as(&self, path: &str, kind: EntryKind) -> bool {
        let path = NormalizedPath::new(path);
        let decision = self.decide(&path, kind);
        let excluded = decision.is_some_and(|(_, rule)| !rule.is_negated());
        trace_exclusion_decision(
            path.as_str(),
            excluded,
            decision.map(|(set, _)| set.base().as_str()),
            decision.map(|(_, rule)| rule.pattern()),
        );
        excluded
    }

    /// Returns the verdict together with the deciding rule, if any.
    #[must_use]
    pub fn is_excluded_with_details(
        &self,
        path: &str,
        kind: EntryKind,
    ) -> (bool, Option<MatchDetails>) {
        let details = self.explain(path, kind);
        (details.as_ref().is_some_and(MatchDetails::is_excluded), details)
    }

    /// Describes the rule deciding `path`, or `None` when no rule matches.
    #[must_use]
    pub fn explain(&self, path: &str, kind: EntryKind) -> Option<MatchDetails> {
        let path = NormalizedPath::new(path);
        let decision = self.decide(&path, kind);
        trace_exclusion_decision(
            path.as_str(),
            decision.is_some_and(|(_, rule)| !rule.is_negated()),
            decision.map(|(set, _)| set.base().as_str()),
            decision.map(|(_, rule)| rule.pattern()),
        );
        decision.map(|(set, rule)| MatchDetails::new(path.as_str(), set, rule))
    }

    /// Returns the verdict and hands the deciding rule to `report` when one
    /// matched.
    pub fn is_excluded_with<F>(&self, path: &str, kind: EntryKind, report: F) -> bool
    where
        F: FnOnce(&MatchDetails),
    {
        match self.explain(path, kind) {
            Some(details) => {
                report(&details);
                details.is_excluded()
            }
            None => false,
        }
    }

    fn decide(&self, path: &NormalizedPath, kind: EntryKind) -> Option<(&RuleSet, &Rule)> {
        if path.is_empty() {
            return None;
        }
        path.ancestors()
            .filter_map(|base| self.sets.get(base))
            .find_map(|set| {
                set.evaluate_normalized(path, kind)
                    .map(|rule| (&**set, rule))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(base: &str, lines: &[&str]) -> RuleSet {
        RuleSet::from_lines(base, lines, IgnoreOptions::default())
            .unwrap()
            .into_value()
    }

    fn resolver(sets: Vec<RuleSet>) -> ExclusionResolver {
        let mut resolver = ExclusionResolver::new();
        for set in sets {
            resolver.register(set);
        }
        resolver
    }

    #[test]
    fn deeper_scope_negation_wins() {
        let resolver = resolver(vec![set("/r", &["*.tmp"]), set("/r/sub", &["!important.tmp"])]);
        assert!(!resolver.is_excluded("/r/sub/important.tmp"));
        assert!(resolver.is_excluded("/r/other.tmp"));
        assert!(resolver.is_excluded("/r/sub/other.tmp"));
    }

    #[test]
    fn deeper_scope_exclusion_wins_over_ancestor_negation() {
        let resolver = resolver(vec![set("/r", &["!*.md"]), set("/r/docs", &["draft*"])]);
        assert!(resolver.is_excluded("/r/docs/draft.md"));
        assert!(!resolver.is_excluded("/r/draft.md"));
    }

    #[test]
    fn sibling_scopes_do_not_leak() {
        let resolver = resolver(vec![set("/r/a", &["*.o"]), set("/r/b", &[])]);
        assert!(resolver.is_excluded("/r/a/x.o"));
        assert!(!resolver.is_excluded("/r/b/x.o"));
        assert!(!resolver.is_excluded("/r/ab/x.o"));
    }

    #[test]
    fn unmatched_or_unscoped_paths_are_included() {
        let resolver = resolver(vec![set("/r", &["*.tmp"])]);
        assert!(!resolver.is_excluded("/elsewhere/a.tmp"));
        assert!(!resolver.is_excluded("/r/a.txt"));
        assert!(!resolver.is_excluded(""));
        assert!(!ExclusionResolver::new().is_excluded("/r/a.tmp"));
    }

    #[test]
    fn query_paths_are_normalised() {
        let resolver = resolver(vec![set("C:\\repo", &["bin/"])]);
        assert!(resolver.is_excluded(" C:\\repo\\bin\\app.exe "));
        assert!(resolver.is_excluded("C:/repo/bin/"));
    }

    #[test]
    fn register_replaces_same_base() {
        let mut resolver = resolver(vec![set("/r", &["*.tmp"])]);
        let previous = resolver.register(set("/r/", &["*.bak"]));
        assert_eq!(previous.map(|set| set.len()), Some(1));
        assert_eq!(resolver.len(), 1);
        assert!(!resolver.is_excluded("/r/a.tmp"));
        assert!(resolver.is_excluded("/r/a.bak"));
    }

    #[test]
    fn add_rules_merges_into_existing_set() {
        let mut resolver = ExclusionResolver::new();
        let options = IgnoreOptions::default();
        assert!(resolver.add_rules_from_lines("/r", ["*.log"], options).unwrap().is_empty());
        resolver.add_rules_from_lines("/r", ["!keep.log", "*.log"], options).unwrap();

        let set = resolver.get("/r").unwrap();
        let patterns: Vec<_> = set.rules().iter().map(Rule::pattern).collect();
        assert_eq!(patterns, ["!keep.log", "*.log"]);
        let lines: Vec<_> = set.rules().iter().map(Rule::line).collect();
        assert_eq!(lines, [Some(2), Some(3)]);
        assert!(resolver.is_excluded("/r/keep.log"));
    }

    #[test]
    fn add_rules_reports_bad_lines() {
        let mut resolver = ExclusionResolver::new();
        let errors = resolver
            .add_rules_from_lines("/r", ["ok", "bad#$~"], IgnoreOptions::default())
            .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line(), Some(2));
        assert!(resolver.is_excluded("/r/ok"));
    }

    #[test]
    fn add_rules_rejects_empty_base() {
        let mut resolver = ExclusionResolver::new();
        assert_eq!(
            resolver
                .add_rules_from_literals("  ", ["x"], IgnoreOptions::default())
                .unwrap_err(),
            ConfigError::MissingBasePath
        );
        assert!(resolver.is_empty());
    }

    #[test]
    fn literal_sets_are_labelled_by_resolver_name() {
        let mut resolver = ExclusionResolver::named("my site");
        resolver
            .add_rules_from_literals("/r", ["*.draft"], IgnoreOptions::default())
            .unwrap();
        let details = resolver.explain("/r/a.draft", EntryKind::File).unwrap();
        assert_eq!(details.source(), Some(Path::new("/r/.ignore_my_site")));
        assert_eq!(details.line(), None);

        let mut unnamed = ExclusionResolver::new();
        unnamed
            .add_rules_from_literals("/r", ["x"], IgnoreOptions::default())
            .unwrap();
        assert_eq!(
            unnamed.get("/r").unwrap().source(),
            Some(Path::new("/r/.ignore_default"))
        );
    }

    #[test]
    fn explain_reports_deciding_scope() {
        let resolver = resolver(vec![
            set("/r", &["*.tmp"]),
            set("/r/sub", &["!important.tmp"]).with_source("/r/sub/.gitignore"),
        ]);
        let (excluded, details) =
            resolver.is_excluded_with_details("/r/sub/important.tmp", EntryKind::File);
        assert!(!excluded);
        let details = details.unwrap();
        assert_eq!(details.base(), "/r/sub/");
        assert_eq!(details.pattern(), "!important.tmp");
        assert_eq!(
            details.to_string(),
            "[Included] /r/sub/important.tmp: [!important.tmp] #1 (/r/sub/.gitignore)"
        );

        assert_eq!(
            resolver.is_excluded_with_details("/r/readme", EntryKind::File),
            (false, None)
        );
    }

    #[test]
    fn callback_sees_deciding_rule() {
        let resolver = resolver(vec![set("/r", &["*.tmp"])]);
        let mut seen = None;
        assert!(resolver.is_excluded_with("/r/a.tmp", EntryKind::File, |details| {
            seen = Some(details.pattern().to_owned());
        }));
        assert_eq!(seen.as_deref(), Some("*.tmp"));

        let mut called = false;
        assert!(!resolver.is_excluded_with("/r/a.txt", EntryKind::File, |_| called = true));
        assert!(!called);
    }

    #[test]
    fn directory_only_rules_use_entry_kind() {
        let resolver = resolver(vec![set("/r", &["cache/"])]);
        assert!(resolver.is_excluded_as("/r/cache", EntryKind::Directory));
        assert!(!resolver.is_excluded_as("/r/cache", EntryKind::File));
        assert!(resolver.is_excluded_as("/r/cache/blob", EntryKind::File));
    }

    #[test]
    fn unregister_and_iteration() {
        let mut resolver = resolver(vec![set("/r/b", &["x"]), set("/r/a", &["y"])]);
        let bases: Vec<_> = resolver.rule_sets().map(|set| set.base().as_str()).collect();
        assert_eq!(bases, ["/r/a/", "/r/b/"]);
        assert!(resolver.unregister("/r/a").is_some());
        assert!(resolver.unregister("/r/a").is_none());
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn resolver_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExclusionResolver>();
        assert_send_sync::<MatchDetails>();
    }
}
