//! Shared Cache Handle
//!
//! Thread-safe handle over an [`LruCache`]. The store and its recency order
//! live behind one mutex, so no caller ever observes a half-applied update.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cache::{Cache, CacheStats, LruCache};
use crate::error::Result;

// == Shared Cache ==
/// Cloneable, thread-safe LRU cache handle.
///
/// Clones share the same underlying cache.
#[derive(Debug, Clone)]
pub struct SharedCache {
    inner: Arc<Mutex<LruCache>>,
}

impl SharedCache {
    /// Creates a shared cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        LruCache::new(capacity).map(Self::from)
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Snapshot of resident keys from least to most recently used.
    pub fn keys_lru_order(&self) -> Vec<String> {
        self.lock().keys_lru_order()
    }

    // LruCache never panics between its map and tracker updates, so the data
    // behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, LruCache> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<LruCache> for SharedCache {
    fn from(cache: LruCache) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }
}

impl Cache for SharedCache {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key)
    }

    fn set(&self, key: &str, value: String) {
        self.lock().set(key, value);
    }

    fn peek(&self, key: &str) -> Option<String> {
        self.lock().peek(key).map(str::to_string)
    }
}
