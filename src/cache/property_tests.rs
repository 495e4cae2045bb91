//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check capacity, recency and consistency properties of
//! the LRU cache over arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::cache::LruCache;

// == Strategies ==
/// Small key alphabet so sequences revisit keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,2}"
}

/// Values, including the empty string
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,8}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

/// Straightforward reference model: a recency list rebuilt on every access.
#[derive(Debug, Default)]
struct Model {
    values: HashMap<String, String>,
    order: Vec<String>,
}

impl Model {
    fn refresh(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push(key.to_string());
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let value = self.values.get(key).cloned();
        if value.is_some() {
            self.refresh(key);
        }
        value
    }

    fn set(&mut self, key: &str, value: &str, capacity: usize) {
        self.values.insert(key.to_string(), value.to_string());
        self.refresh(key);
        if self.values.len() > capacity {
            let oldest = self.order.remove(0);
            self.values.remove(&oldest);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The cache never holds more than its capacity.
    #[test]
    fn prop_capacity_enforcement(
        capacity in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let mut cache = LruCache::new(capacity).unwrap();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Get { key } => { cache.get(&key); }
            }
            prop_assert!(cache.len() <= capacity, "size {} exceeds {}", cache.len(), capacity);
        }
    }

    /// Recency order and store always hold exactly the same keys.
    #[test]
    fn prop_order_matches_store(
        capacity in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let mut cache = LruCache::new(capacity).unwrap();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Get { key } => { cache.get(&key); }
            }

            let order = cache.keys_lru_order();
            let unique: HashSet<&String> = order.iter().collect();
            prop_assert_eq!(unique.len(), order.len(), "duplicate keys in recency order");
            prop_assert_eq!(order.len(), cache.len());
            for key in &order {
                prop_assert!(cache.contains(key), "tracked key '{}' is not stored", key);
            }
        }
    }

    /// The cache behaves exactly like the naive scan-and-filter model.
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..150)
    ) {
        let mut cache = LruCache::new(capacity).unwrap();
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value.clone());
                    model.set(&key, &value, capacity);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(&key));
                }
            }
            prop_assert_eq!(cache.keys_lru_order(), model.order.clone());
        }
    }

    /// A set is immediately readable, empty values included.
    #[test]
    fn prop_write_then_read(
        capacity in 1usize..8,
        key in key_strategy(),
        value in value_strategy()
    ) {
        let mut cache = LruCache::new(capacity).unwrap();

        cache.set(key.clone(), value.clone());
        prop_assert_eq!(cache.get(&key), Some(value));
    }

    /// Filling to capacity and adding one more evicts exactly the first key.
    #[test]
    fn prop_lru_eviction_order(
        keys in prop::collection::hash_set("[a-z]{1,6}", 2..10),
        new_key in "[A-Z]{1,6}"
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let capacity = keys.len();
        let mut cache = LruCache::new(capacity).unwrap();

        for key in &keys {
            cache.set(key.clone(), format!("value_{key}"));
        }
        cache.set(new_key.clone(), "new");

        prop_assert_eq!(cache.len(), capacity);
        prop_assert!(cache.get(&keys[0]).is_none(), "oldest key '{}' survived", &keys[0]);
        prop_assert!(cache.get(&new_key).is_some());
        for key in keys.iter().skip(1) {
            prop_assert!(cache.get(key).is_some(), "key '{}' was evicted", key);
        }
    }

    /// Reading the oldest key protects it from the next eviction.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::hash_set("[a-z]{1,6}", 3..8),
        new_key in "[A-Z]{1,6}"
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut cache = LruCache::new(keys.len()).unwrap();

        for key in &keys {
            cache.set(key.clone(), format!("value_{key}"));
        }
        let _ = cache.get(&keys[0]);
        cache.set(new_key, "new");

        prop_assert!(cache.contains(&keys[0]));
        prop_assert!(!cache.contains(&keys[1]));
    }

    /// Statistics count every lookup outcome.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut cache = LruCache::new(4).unwrap();
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, cache.len());
    }
}
