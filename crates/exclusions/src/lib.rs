#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `exclusions` decides whether a path is excluded by gitignore-style
//! pattern files. Patterns are compiled once into [`Rule`]s, grouped into a
//! [`RuleSet`] per ignore file (one base directory each), and the sets are
//! registered into an [`ExclusionResolver`] that answers queries for any path
//! below those directories.
//!
//! # Design
//!
//! - [`PatternCompiler`] parses a single line of ignore syntax. Blank lines and
//!   comments are skipped, `!` negates, a leading `/` anchors to the base
//!   directory, a trailing `/` restricts the rule to directories, and `*`,
//!   `**`, `?` and `[...]` are translated into [`globset`] matchers.
//! - [`RuleSet`] evaluates its rules in definition order. The last matching
//!   rule decides, so a later `!keep.log` re-includes what an earlier `*.log`
//!   excluded.
//! - [`ExclusionResolver`] selects every registered set whose base directory
//!   contains the queried path and consults them from the deepest directory
//!   outwards. The first set with a matching rule decides.
//! - [`SharedResolver`] allows registering ignore files discovered during a
//!   parallel walk while other threads keep querying a consistent snapshot.
//!
//! # Invariants
//!
//! - Rules are immutable and sets are shared behind `Arc` once registered;
//!   queries take `&self` and never fail.
//! - Within one set, re-adding an identical pattern replaces the earlier copy
//!   and moves it to the end of the evaluation order.
//! - No two sets registered in a resolver share a base directory.
//!
//! # Errors
//!
//! Compilation problems are reported per line as [`PatternError`] values and
//! never invalidate the remaining lines of the same source. Empty base
//! directories are rejected with [`ConfigError::MissingBasePath`].
//!
//! # Examples
//!
//! ```
//! use exclusions::{ExclusionResolver, IgnoreOptions, RuleSet};
//!
//! let mut resolver = ExclusionResolver::new();
//! let root = RuleSet::from_lines("/repo", ["*.log", "!keep.log"], IgnoreOptions::default())
//!     .expect("base path")
//!     .into_value();
//! resolver.register(root);
//!
//! assert!(resolver.is_excluded("/repo/debug.log"));
//! assert!(!resolver.is_excluded("/repo/keep.log"));
//! assert!(!resolver.is_excluded("/repo/src/main.rs"));
//! ```

mod compiled;
pub mod debug_exclude;
mod details;
mod error;
pub mod load;
mod options;
mod path;
mod pattern;
mod resolver;
mod rule;
mod set;
mod shared;

pub use details::MatchDetails;
pub use error::{ConfigError, LoadError, LoadReport, PatternError};
pub use load::{DEFAULT_IGNORE_FILE_NAME, discover_ignore_files, read_ignore_file, read_rules};
pub use options::IgnoreOptions;
pub use path::NormalizedPath;
pub use pattern::{ParsedPattern, PatternCompiler, PatternFlags, RESERVED_SEQUENCE, parse_pattern};
pub use resolver::ExclusionResolver;
pub use rule::{EntryKind, Rule};
pub use set::RuleSet;
pub use shared::SharedResolver;
