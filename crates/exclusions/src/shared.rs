use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::{EntryKind, ExclusionResolver, RuleSet};

/// A resolver that can grow while other threads query it.
///
/// Readers take a cheap [`Arc`] snapshot and query it without holding the
/// lock. Writers clone the current resolver, apply their change, and publish
/// the result in one swap, so a query sees either the old or the new
/// registry and never a partially built [`RuleSet`].
///
/// # Examples
///
/// ```
/// use exclusions::{IgnoreOptions, RuleSet, SharedResolver};
/// use std::thread;
///
/// let shared = SharedResolver::default();
/// thread::scope(|scope| {
///     scope.spawn(|| {
///         let set = RuleSet::from_lines("/r", ["*.o"], IgnoreOptions::default())
///             .unwrap()
///             .into_value();
///         shared.register(set);
///     });
/// });
/// assert!(shared.is_excluded("/r/main.o"));
/// ```
#[derive(Debug, Default)]
pub struct SharedResolver {
    current: RwLock<Arc<ExclusionResolver>>,
    writer: Mutex<()>,
}

impl SharedResolver {
    /// Wraps an existing resolver.
    #[must_use]
    pub fn new(resolver: ExclusionResolver) -> Self {
        Self {
            current: RwLock::new(Arc::new(resolver)),
            writer: Mutex::new(()),
        }
    }

    /// Returns the resolver as currently published.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ExclusionResolver> {
        // The guarded value is only ever replaced whole, so a poisoned lock
        // still holds a consistent resolver.
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Applies `change` to a copy of the resolver and publishes the copy.
    ///
    /// Concurrent writers are serialised. `change` runs without the read
    /// lock held, so readers keep querying the previous snapshot and are
    /// only blocked for the swap itself.
    pub fn update<F, T>(&self, change: F) -> T
    where
        F: FnOnce(&mut ExclusionResolver) -> T,
    {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = ExclusionResolver::clone(&self.snapshot());
        let output = change(&mut next);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
        output
    }

    /// Registers a set, replacing any set with the same base.
    pub fn register(&self, set: impl Into<Arc<RuleSet>>) -> Option<Arc<RuleSet>> {
        let set = set.into();
        self.update(|resolver| resolver.register(set))
    }

    /// Returns `true` when `path` is excluded by the current snapshot.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.snapshot().is_excluded(path)
    }

    /// Like [`SharedResolver::is_excluded`], with file-type information.
    #[must_use]
    pub fn is_excluded_as(&self, path: &str, kind: EntryKind) -> bool {
        self.snapshot().is_excluded_as(path, kind)
    }

    /// Unwraps the current resolver, cloning it if snapshots are still alive.
    #[must_use]
    pub fn into_inner(self) -> ExclusionResolver {
        let current = self
            .current
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::try_unwrap(current).unwrap_or_else(|shared| ExclusionResolver::clone(&shared))
    }
}

impl From<ExclusionResolver> for SharedResolver {
    fn from(resolver: ExclusionResolver) -> Self {
        Self::new(resolver)
    }
}
