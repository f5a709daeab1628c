//! Generic LRU (Least Recently Used) cache.
//!
//! Used by text measurement, where the same cell strings are measured again on
//! every repaint of a scrolled region.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

/// LRU cache with a fixed capacity.
///
/// Lookups promote entries. Promotion appends a fresh stamp to the recency queue
/// instead of searching it; outdated queue entries are skipped at eviction and
/// compacted away once the queue grows past twice the capacity.
pub struct LruCache<K: Hash + Eq + Clone, V> {
    entries: HashMap<K, (V, u64)>,
    order: VecDeque<(K, u64)>,
    capacity: usize,
    clock: u64,
}

impl<K: Hash + Eq + Clone, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Create a new cache with the given capacity.
    ///
    /// A capacity of 0 disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Look up a value and mark it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.capacity == 0 || !self.entries.contains_key(key) {
            return None;
        }
        let stamp = self.tick();
        self.order.push_back((key.clone(), stamp));
        self.compact();
        let entry = self.entries.get_mut(key)?;
        entry.1 = stamp;
        Some(&entry.0)
    }

    /// Look up a value without touching recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|(v, _)| v)
    }

    /// Insert or replace a value, evicting the least recently used entries when
    /// over capacity.
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let stamp = self.tick();
        self.entries.insert(key.clone(), (value, stamp));
        self.order.push_back((key, stamp));
        self.evict();
        self.compact();
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn evict(&mut self) {
        while self.entries.len() > self.capacity {
            let Some((key, stamp)) = self.order.pop_front() else {
                break;
            };
            if self.entries.get(&key).is_some_and(|(_, s)| *s == stamp) {
                self.entries.remove(&key);
            }
        }
    }

    fn compact(&mut self) {
        if self.order.len() <= self.capacity.saturating_mul(2) {
            return;
        }
        let entries = &self.entries;
        self.order
            .retain(|(key, stamp)| entries.get(key).is_some_and(|(_, s)| s == stamp));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used() {
        let mut cache: LruCache<&str, i32> = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.insert("c", 3);

        assert_eq!(cache.peek(&"b"), None);
        assert_eq!(cache.peek(&"a"), Some(&1));
        assert_eq!(cache.peek(&"c"), Some(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache: LruCache<&str, i32> = LruCache::new(0);
        cache.insert("a", 1);
        assert_eq!(cache.get(&"a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn repeated_hits_stay_bounded() {
        let mut cache: LruCache<u32, u32> = LruCache::new(4);
        for i in 0..4 {
            cache.insert(i, i);
        }
        for _ in 0..100 {
            assert_eq!(cache.get(&2), Some(&2));
        }
        assert!(cache.order.len() <= 8);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn clear_empties() {
        let mut cache: LruCache<&str, i32> = LruCache::new(3);
        cache.insert("a", 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
