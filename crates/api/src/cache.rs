//! Per-id memoization for hot detail lookups.

use std::collections::HashMap;
use std::sync::Mutex;

/// Plain per-id memo cache. Deliberately not an eviction engine: entries
/// live until invalidated or cleared, which matches how the admin screens
/// use it (repeated detail lookups inside one review session).
pub struct MemoCache<T: Clone> {
    entries: Mutex<HashMap<i64, T>>,
}

impl<T: Clone> MemoCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The cached value for `id`, if present.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<T> {
        self.entries.lock().unwrap().get(&id).cloned()
    }

    /// Caches `value` under `id`, replacing any previous entry.
    pub fn insert(&self, id: i64, value: T) {
        self.entries.lock().unwrap().insert(id, value);
    }

    /// Drops the entry for `id`, if any.
    pub fn invalidate(&self, id: i64) {
        self.entries.lock().unwrap().remove(&id);
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl<T: Clone> Default for MemoCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
