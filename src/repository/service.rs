//! Thing Service Module
//!
//! The slow data source consulted on cache misses, plus a demo
//! implementation used by the server binary.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::config::Config;

// == Service Capability ==
/// Synchronous lookup against a slow, possibly failing data source.
///
/// `Ok(None)` means the source has no value for the key. Errors are handed
/// to the repository's caller untouched.
pub trait ThingService: Send + Sync {
    type Error;

    fn get_thing_sync(&self, key: &str) -> Result<Option<String>, Self::Error>;
}

impl<F, E> ThingService for F
where
    F: Fn(&str) -> Result<Option<String>, E> + Send + Sync,
{
    type Error = E;

    fn get_thing_sync(&self, key: &str) -> Result<Option<String>, E> {
        self(key)
    }
}

// == Service Error ==
/// Failure raised by [`DoublingService`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("thing service unavailable for key '{0}'")]
    Unavailable(String),
}

// == Doubling Service ==
/// Demo data source: blocks for a fixed delay, then answers `key` with the
/// key repeated twice (`"x"` -> `"xx"`).
///
/// Keys listed as failing raise [`ServiceError::Unavailable`]; keys listed as
/// missing have no value.
#[derive(Debug, Default)]
pub struct DoublingService {
    delay: Duration,
    failing_keys: HashSet<String>,
    missing_keys: HashSet<String>,
    calls: AtomicU64,
}

impl DoublingService {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Builds the service from the `LOOKUP_*` settings.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Duration::from_millis(config.lookup_delay_ms))
            .with_failing_keys(config.lookup_failing_keys.iter().cloned())
            .with_missing_keys(config.lookup_missing_keys.iter().cloned())
    }

    pub fn with_failing_keys(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.failing_keys.extend(keys);
        self
    }

    pub fn with_missing_keys(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.missing_keys.extend(keys);
        self
    }

    /// Number of lookups served so far, failures included.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl ThingService for DoublingService {
    type Error = ServiceError;

    fn get_thing_sync(&self, key: &str) -> Result<Option<String>, ServiceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        if self.failing_keys.contains(key) {
            return Err(ServiceError::Unavailable(key.to_string()));
        }
        if self.missing_keys.contains(key) {
            return Ok(None);
        }

        Ok(Some(format!("{key}{key}")))
    }
}
