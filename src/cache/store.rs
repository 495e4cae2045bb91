//! LRU Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheStats, LruTracker};
use crate::error::{CacheError, Result};

// == LRU Cache ==
/// Fixed-capacity key-value store with strict least-recently-used eviction.
///
/// Every `get` hit and every `set` moves the key to the most recently used
/// position. When a `set` pushes the entry count past `capacity`, exactly one
/// entry (the least recently used) is evicted before `set` returns.
#[derive(Debug)]
pub struct LruCache {
    /// Key-value storage
    entries: HashMap<String, String>,
    /// Recency order over the keys of `entries`
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl LruCache {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            lru: LruTracker::with_capacity(capacity),
            stats: CacheStats::new(capacity),
            capacity,
        })
    }

    // == Set ==
    /// Inserts or overwrites `key` and marks it most recently used.
    ///
    /// Empty values are stored like any other value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.lru.touch(&key);
        self.entries.insert(key, value.into());

        if self.entries.len() > self.capacity {
            self.evict_oldest();
        }

        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value for `key`, refreshing its recency on a hit.
    ///
    /// A miss leaves the recency order untouched.
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self.entries.get(key).cloned() {
            Some(value) => {
                self.lru.touch(key);
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Returns the value for `key` without touching recency or statistics.
    pub fn peek(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Resident keys ordered from least to most recently used.
    pub fn keys_lru_order(&self) -> Vec<String> {
        self.lru.iter_oldest_first().map(str::to_string).collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_oldest(&mut self) {
        if let Some(evicted) = self.lru.evict_oldest() {
            self.entries.remove(&evicted);
            self.stats.record_eviction();
            debug!(key = %evicted, capacity = self.capacity, "evicted least recently used entry");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> LruCache {
        LruCache::new(capacity).unwrap()
    }

    #[test]
    fn test_cache_new() {
        let cache = cache(100);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 100);
    }

    #[test]
    fn test_cache_zero_capacity_rejected() {
        let result = LruCache::new(0);
        assert!(matches!(result, Err(CacheError::InvalidCapacity(0))));
    }

    #[test]
    fn test_cache_get_empty() {
        let mut cache = cache(1);
        assert_eq!(cache.get("test"), None);
    }

    #[test]
    fn test_cache_set_and_get() {
        let mut cache = cache(1);

        cache.set("id", "value");

        assert_eq!(cache.get("id"), Some("value".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_empty_value_is_a_hit() {
        let mut cache = cache(2);

        cache.set("blank", "");

        assert_eq!(cache.get("blank"), Some(String::new()));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn test_cache_overwrite() {
        let mut cache = cache(100);

        cache.set("key1", "value1");
        cache.set("key1", "value2");

        assert_eq!(cache.get("key1"), Some("value2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_evicts_first_value_after_access() {
        let mut cache = cache(1);

        cache.set("1", "one");
        cache.get("1");
        cache.set("2", "two");
        cache.get("2");

        assert_eq!(cache.get("1"), None);
    }

    #[test]
    fn test_cache_evicts_first_written_when_none_accessed() {
        let mut cache = cache(1);

        cache.set("1", "one");
        cache.set("2", "two");

        assert_eq!(cache.get("1"), None);
        assert_eq!(cache.get("2"), Some("two".to_string()));
    }

    #[test]
    fn test_cache_lru_eviction() {
        let mut cache = cache(3);

        cache.set("key1", "value1");
        cache.set("key2", "value2");
        cache.set("key3", "value3");
        cache.set("key4", "value4");

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("key1"), None);
        assert!(cache.get("key2").is_some());
        assert!(cache.get("key3").is_some());
        assert!(cache.get("key4").is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_cache_get_refreshes_recency() {
        let mut cache = cache(2);

        cache.set("a", "1");
        cache.set("b", "2");
        cache.get("a");
        cache.set("c", "3");

        assert_eq!(cache.get("a"), Some("1".to_string()));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("c"), Some("3".to_string()));
    }

    #[test]
    fn test_cache_overwrite_refreshes_recency() {
        let mut cache = cache(3);

        cache.set("a", "1");
        cache.set("b", "2");
        cache.set("c", "3");
        cache.set("a", "1b");

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.keys_lru_order(), vec!["b", "c", "a"]);

        cache.set("d", "4");
        assert!(!cache.contains("b"));
        assert_eq!(cache.peek("a"), Some("1b"));
    }

    #[test]
    fn test_cache_miss_does_not_touch_order() {
        let mut cache = cache(2);

        cache.set("a", "1");
        cache.set("b", "2");
        assert_eq!(cache.get("zzz"), None);

        assert_eq!(cache.keys_lru_order(), vec!["a", "b"]);
    }

    #[test]
    fn test_cache_peek_does_not_touch_order_or_stats() {
        let mut cache = cache(2);

        cache.set("a", "1");
        cache.set("b", "2");

        assert_eq!(cache.peek("a"), Some("1"));
        assert_eq!(cache.keys_lru_order(), vec!["a", "b"]);
        assert_eq!(cache.stats().hits, 0);

        cache.set("c", "3");
        assert!(!cache.contains("a"));
    }

    #[test]
    fn test_cache_stats() {
        let mut cache = cache(100);

        cache.set("key1", "value1");
        cache.get("key1");
        cache.get("nonexistent");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.capacity, 100);
    }
}
