use globset::{GlobBuilder, GlobMatcher};

use crate::options::IgnoreOptions;
use crate::pattern::ParsedPattern;
use crate::rule::EntryKind;

/// How a compiled pattern is applied to a relative path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Scope {
    /// Matched against every `/`-delimited segment on its own.
    Segment,
    /// Matched against the whole relative path.
    Path,
}

/// Glob matchers backing a single rule.
#[derive(Clone, Debug)]
pub(crate) struct CompiledMatcher {
    scope: Scope,
    direct: GlobMatcher,
    descendant: Option<GlobMatcher>,
    literal_prefix: Option<String>,
}

impl CompiledMatcher {
    pub(crate) fn new(
        pattern: &ParsedPattern,
        options: IgnoreOptions,
    ) -> Result<Self, globset::Error> {
        let glob = translate(pattern.body());
        let scope = if pattern.is_segment_pattern() {
            Scope::Segment
        } else {
            Scope::Path
        };

        let direct = compile(&glob, options)?;
        let descendant = if scope == Scope::Path && !covers_descendants(&glob) {
            Some(compile(&format!("{glob}/**"), options)?)
        } else {
            None
        };

        // Unicode case folding maps some non-ASCII characters onto ASCII
        // letters, so a byte prefix test is only exact when matching is
        // case-sensitive.
        let literal_prefix = pattern
            .literal_prefix()
            .filter(|prefix| !prefix.is_empty() && options.is_case_sensitive())
            .map(str::to_owned);

        Ok(Self {
            scope,
            direct,
            descendant,
            literal_prefix,
        })
    }

    /// Tests a path relative to the rule's base directory.
    ///
    /// `relative` must be non-empty and carry no leading or trailing `/`.
    pub(crate) fn is_match(&self, relative: &str, kind: EntryKind, directory_only: bool) -> bool {
        if let Some(prefix) = &self.literal_prefix {
            if !relative.starts_with(prefix.as_str()) {
                return false;
            }
        }

        let itself_allowed = !directory_only || kind.may_be_directory();

        match self.scope {
            Scope::Segment => {
                let mut segments = relative.split('/').filter(|s| !s.is_empty()).peekable();
                while let Some(segment) = segments.next() {
                    let is_last = segments.peek().is_none();
                    if (!is_last || itself_allowed) && self.direct.is_match(segment) {
                        return true;
                    }
                }
                false
            }
            Scope::Path => {
                if itself_allowed && self.direct.is_match(relative) {
                    return true;
                }
                match &self.descendant {
                    Some(descendant) => descendant.is_match(relative),
                    None => relative
                        .match_indices('/')
                        .any(|(index, _)| self.direct.is_match(&relative[..index])),
                }
            }
        }
    }
}

fn compile(glob: &str, options: IgnoreOptions) -> Result<GlobMatcher, globset::Error> {
    Ok(GlobBuilder::new(glob)
        .literal_separator(true)
        .backslash_escape(true)
        .case_insensitive(!options.is_case_sensitive())
        .build()?
        .compile_matcher())
}

fn covers_descendants(glob: &str) -> bool {
    glob == "**" || glob.ends_with("/**")
}

/// Rewrites a gitignore glob body into globset syntax.
///
/// Braces are literal in ignore files but alternations in globset, so they
/// are escaped. Runs of `*` collapse to `**` only when they form a whole path
/// component and to `*` everywhere else. Escapes and bracket classes are
/// copied through untouched; an unterminated class is left for globset to
/// reject.
fn translate(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len() + 4);
    let mut index = 0;

    while index < chars.len() {
        match chars[index] {
            '\\' => {
                out.push('\\');
                if let Some(&next) = chars.get(index + 1) {
                    out.push(next);
                    index += 1;
                }
            }
            '[' => {
                let end = class_end(&chars, index);
                out.extend(&chars[index..end]);
                index = end;
                continue;
            }
            '*' => {
                let start = index;
                while chars.get(index + 1) == Some(&'*') {
                    index += 1;
                }
                let run = index - start + 1;
                let bounded_before = start == 0 || chars[start - 1] == '/';
                let bounded_after = index + 1 == chars.len() || chars[index + 1] == '/';
                if run >= 2 && bounded_before && bounded_after {
                    out.push_str("**");
                } else {
                    out.push('*');
                }
            }
            '{' | '}' => {
                out.push('\\');
                out.push(chars[index]);
            }
            other => out.push(other),
        }
        index += 1;
    }

    out
}

/// Returns the index just past the `]` closing the class opened at `start`,
/// or the end of input when the class is unterminated.
fn class_end(chars: &[char], start: usize) -> usize {
    let mut index = start + 1;
    if matches!(chars.get(index), Some('!' | '^')) {
        index += 1;
    }
    if chars.get(index) == Some(&']') {
        index += 1;
    }
    while index < chars.len() {
        if chars[index] == ']' {
            return index + 1;
        }
        index += 1;
    }
    chars.len()
}
