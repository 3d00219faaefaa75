//! Bounded least-recently-used map.
//!
//! Backed by an [`IndexMap`] whose insertion order doubles as recency order:
//! index 0 is the least recently used entry, the last index the most recent.

use std::hash::Hash;
use std::num::NonZeroUsize;

use indexmap::IndexMap;

/// Default number of archives kept in memory.
pub const DEFAULT_CAPACITY: usize = 128;

pub struct LruCache<K, V> {
    entries: IndexMap<K, V>,
    capacity: NonZeroUsize,
}

impl<K: Hash + Eq + Clone, V: Clone> LruCache<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Look up `key`, marking it as the most recently used entry on a hit.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let (key, value) = self.entries.shift_remove_entry(key)?;
        self.entries.insert(key, value.clone());
        Some(value)
    }

    /// Insert or replace `key`, evicting the least recently used entries
    /// once the capacity is exceeded. Returns the evicted keys.
    pub fn insert(&mut self, key: K, value: V) -> Vec<K> {
        self.entries.shift_remove(&key);
        self.entries.insert(key, value);

        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity.get() {
            match self.entries.shift_remove_index(0) {
                Some((key, _)) => evicted.push(key),
                None => break,
            }
        }
        evicted
    }

    #[cfg(test)]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
