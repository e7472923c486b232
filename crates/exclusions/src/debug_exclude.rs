//! Tracing for rule compilation and exclusion decisions.
//!
//! All helpers are conditionally compiled behind the `tracing` feature flag
//! and become no-op inline functions when it is disabled, so call sites never
//! need their own `cfg` guards.
//!
//! Events are emitted under the [`EXCLUDE_TARGET`] target, which allows
//! `RUST_LOG=exclusions::rules=trace` style filtering.

/// Target name for tracing events.
pub const EXCLUDE_TARGET: &str = "exclusions::rules";

// ============================================================================
// Tracing functions (feature-gated)
// ============================================================================

/// Traces a rule being appended to a rule set.
///
/// # Arguments
///
/// * `base` - Base directory of the rule set
/// * `pattern` - The pattern text as written
/// * `negated` - Whether the rule re-includes paths
/// * `replaced` - Whether an identical earlier rule was dropped
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_rule_added(base: &str, pattern: &str, negated: bool, replaced: bool) {
    tracing::debug!(
        target: EXCLUDE_TARGET,
        base = %base,
        pattern = %pattern,
        negated = negated,
        replaced = replaced,
        "rule_added"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_rule_added(_base: &str, _pattern: &str, _negated: bool, _replaced: bool) {}

/// Traces a pattern line that failed to compile.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_pattern_rejected(base: &str, error: &crate::PatternError) {
    tracing::warn!(
        target: EXCLUDE_TARGET,
        base = %base,
        pattern = %error.pattern(),
        line = ?error.line(),
        error = %error,
        "pattern_rejected"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_pattern_rejected(_base: &str, _error: &crate::PatternError) {}

/// Traces a rule set being registered with a resolver.
///
/// # Arguments
///
/// * `base` - Base directory the set is keyed by
/// * `rule_count` - Number of rules in the set
/// * `replaced` - Whether a set with the same base was replaced
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_rule_set_registered(base: &str, rule_count: usize, replaced: bool) {
    tracing::debug!(
        target: EXCLUDE_TARGET,
        base = %base,
        rule_count = rule_count,
        replaced = replaced,
        "rule_set_registered"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_rule_set_registered(_base: &str, _rule_count: usize, _replaced: bool) {}

/// Traces the final decision for a queried path.
///
/// # Arguments
///
/// * `path` - The normalised query path
/// * `excluded` - The verdict
/// * `base` - Base directory of the deciding rule set, if any
/// * `pattern` - Pattern of the deciding rule, if any
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_exclusion_decision(path: &str, excluded: bool, base: Option<&str>, pattern: Option<&str>) {
    tracing::trace!(
        target: EXCLUDE_TARGET,
        path = %path,
        excluded = excluded,
        base = ?base,
        pattern = ?pattern,
        "exclusion_decision"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_exclusion_decision(
    _path: &str,
    _excluded: bool,
    _base: Option<&str>,
    _pattern: Option<&str>,
) {
}

/// Traces loading of an ignore file from disk.
///
/// # Arguments
///
/// * `file` - Path of the ignore file
/// * `rule_count` - Number of rules compiled from it
/// * `error_count` - Number of lines rejected
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_ignore_file_loaded(file: &std::path::Path, rule_count: usize, error_count: usize) {
    tracing::debug!(
        target: EXCLUDE_TARGET,
        file = %file.display(),
        rule_count = rule_count,
        error_count = error_count,
        "ignore_file_loaded"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_ignore_file_loaded(_file: &std::path::Path, _rule_count: usize, _error_count: usize) {}
