//! Cache Module
//!
//! Provides a fixed-capacity in-memory cache with LRU eviction.

mod lru;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use lru::LruTracker;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::LruCache;

// == Cache Capability ==
/// Key-value cache consumed by the read-through repository.
///
/// Implementations must be safe to call from several threads at once.
pub trait Cache: Send + Sync {
    /// Returns the cached value, refreshing the key's recency on a hit.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, evicting as the policy requires.
    fn set(&self, key: &str, value: String);

    /// Returns the cached value without refreshing recency or counting a lookup.
    fn peek(&self, key: &str) -> Option<String>;
}
