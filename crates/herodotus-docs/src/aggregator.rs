//! Shared document state.

use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::document::PathEntry;

/// The growing path tree, shared by every observation.
///
/// Created once at startup and shared through `Arc`. Every read-modify-write
/// of a path entry happens inside one critical section of [`Self::with_entry`],
/// so concurrent observations of the same route never lose an update.
#[derive(Debug, Default)]
pub struct DocumentAggregator {
    paths: Mutex<IndexMap<String, PathEntry>>,
    observed: AtomicBool,
}

impl DocumentAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the observer ran, whether or not it stored anything.
    pub fn mark_observed(&self) {
        self.observed.store(true, Ordering::Release);
    }

    /// Returns true once any observation was attempted.
    #[must_use]
    pub fn has_observations(&self) -> bool {
        self.observed.load(Ordering::Acquire)
    }

    /// Runs `f` on the entry for `key` under the lock.
    ///
    /// `create` builds the entry when the key is new; it is not called for
    /// existing entries.
    pub fn with_entry<C, F, R>(&self, key: &str, create: C, f: F) -> R
    where
        C: FnOnce() -> PathEntry,
        F: FnOnce(&mut PathEntry) -> R,
    {
        let mut paths = self.paths.lock();
        let entry = match paths.get_index_of(key) {
            Some(index) => &mut paths[index],
            None => paths.entry(key.to_string()).or_insert_with(create),
        };
        f(entry)
    }

    /// Returns a copy of one entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<PathEntry> {
        self.paths.lock().get(key).cloned()
    }

    /// Returns a copy of the whole path tree.
    #[must_use]
    pub fn snapshot(&self) -> IndexMap<String, PathEntry> {
        self.paths.lock().clone()
    }

    /// Number of documented paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.lock().len()
    }

    /// Returns true if no path was documented.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.lock().is_empty()
    }
}
