//! Tests for precedence across nested ignore files.
//!
//! Within one rule set the last matching rule wins. Across rule sets the
//! deepest set that has any matching rule decides, so a nested ignore file
//! can both exclude and re-include paths that an ancestor file handles
//! differently. Sets with no matching rule defer to their ancestors.

use exclusions::{EntryKind, ExclusionResolver, IgnoreOptions, RuleSet};

fn resolver(sets: &[(&str, &[&str])]) -> ExclusionResolver {
    let mut resolver = ExclusionResolver::new();
    for (base, lines) in sets {
        let set = RuleSet::from_lines(base, lines.iter(), IgnoreOptions::default())
            .unwrap()
            .into_value();
        resolver.register(set);
    }
    resolver
}

// =============================================================================
// Intra-Set Ordering
// =============================================================================

#[test]
fn later_rule_overrides_earlier_rule() {
    let resolver = resolver(&[("/r", &["*.log", "!keep.log"])]);
    assert!(!resolver.is_excluded("/r/keep.log"));
    assert!(resolver.is_excluded("/r/other.log"));
}

#[test]
fn earlier_negation_is_overridden() {
    let resolver = resolver(&[("/r", &["!keep.log", "*.log"])]);
    assert!(resolver.is_excluded("/r/keep.log"));
}

#[test]
fn negation_reincludes_files_below_excluded_pattern() {
    let resolver = resolver(&[("/r", &["/data/*", "!/data/schema.sql"])]);
    assert!(resolver.is_excluded("/r/data/rows.csv"));
    assert!(!resolver.is_excluded("/r/data/schema.sql"));
}

// =============================================================================
// Cross-Set Precedence
// =============================================================================

#[test]
fn deeper_negation_beats_ancestor_exclusion() {
    let resolver = resolver(&[("/r", &["*.tmp"]), ("/r/sub", &["!important.tmp"])]);
    assert!(!resolver.is_excluded("/r/sub/important.tmp"));
    assert!(!resolver.is_excluded("/r/sub/deep/important.tmp"));
    assert!(resolver.is_excluded("/r/sub/other.tmp"));
    assert!(resolver.is_excluded("/r/other.tmp"));
    assert!(resolver.is_excluded("/r/important.tmp"));
}

#[test]
fn deeper_exclusion_beats_ancestor_negation() {
    let resolver = resolver(&[("/r", &["*", "!*.rs"]), ("/r/gen", &["*.rs"])]);
    assert!(!resolver.is_excluded("/r/src/lib.rs"));
    assert!(resolver.is_excluded("/r/gen/out.rs"));
    assert!(resolver.is_excluded("/r/readme.md"));
}

#[test]
fn three_levels_pick_the_deepest_match() {
    let resolver = resolver(&[
        ("/r", &["*.tmp", "logs/"]),
        ("/r/a", &["!keep.tmp"]),
        ("/r/a/b", &["*.tmp"]),
    ]);
    assert!(resolver.is_excluded("/r/a/b/keep.tmp"));
    assert!(!resolver.is_excluded("/r/a/keep.tmp"));
    assert!(!resolver.is_excluded("/r/a/c/keep.tmp"));
    assert!(resolver.is_excluded("/r/a/logs/app.txt"));
    assert!(resolver.is_excluded("/r/a/b/logs/app.txt"));
}

#[test]
fn anchoring_is_relative_to_each_set() {
    let resolver = resolver(&[("/r", &["/out"]), ("/r/web", &["/dist"])]);
    assert!(resolver.is_excluded("/r/out"));
    assert!(!resolver.is_excluded("/r/web/out"));
    assert!(resolver.is_excluded("/r/web/dist/app.js"));
    assert!(!resolver.is_excluded("/r/dist"));
}

#[test]
fn base_prefix_respects_directory_boundaries() {
    let resolver = resolver(&[("/r/build", &["*"])]);
    assert!(resolver.is_excluded("/r/build/x"));
    assert!(!resolver.is_excluded("/r/builder/x"));
    assert!(!resolver.is_excluded("/r/build"));
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn details_name_the_deciding_scope() {
    let resolver = resolver(&[("/r", &["*.tmp"]), ("/r/sub", &["# header", "!important.tmp"])]);

    let details = resolver
        .explain("/r/sub/important.tmp", EntryKind::File)
        .unwrap();
    assert_eq!(details.base(), "/r/sub/");
    assert_eq!(details.line(), Some(2));
    assert!(!details.is_excluded());

    let details = resolver.explain("/r/sub/x.tmp", EntryKind::File).unwrap();
    assert_eq!(details.base(), "/r/");
    assert_eq!(details.pattern(), "*.tmp");
    assert!(details.is_excluded());

    assert!(resolver.explain("/r/sub/x.txt", EntryKind::File).is_none());
}

#[test]
fn directory_only_rule_through_resolver() {
    let resolver = resolver(&[("/r", &["tmp/"])]);
    assert!(resolver.is_excluded_as("/r/tmp", EntryKind::Directory));
    assert!(!resolver.is_excluded_as("/r/tmp", EntryKind::File));
    assert!(resolver.is_excluded_as("/r/a/tmp/file", EntryKind::File));
    assert!(resolver.is_excluded("/r/tmp"));
}
