//! Thing Cache - A read-through LRU cache
//!
//! Fronts a slow, possibly failing data source with a fixed-capacity cache
//! that evicts the least recently used entry.
//!
//! ```
//! use thing_cache::cache::SharedCache;
//! use thing_cache::repository::ThingRepository;
//!
//! let service = |key: &str| -> Result<Option<String>, String> { Ok(Some(format!("{key}{key}"))) };
//! let repository = ThingRepository::new(SharedCache::new(2).unwrap(), service);
//!
//! assert_eq!(repository.get_thing("x"), Ok(Some("xx".to_string())));
//! assert_eq!(repository.stats().service_calls, 1);
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, LruCache, SharedCache};
pub use config::Config;
pub use error::CacheError;
pub use repository::{ThingRepository, ThingService};
pub use tasks::spawn_stats_reporter;
