//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold (must be positive)
    pub cache_capacity: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Simulated latency of the slow data source, in milliseconds
    pub lookup_delay_ms: u64,
    /// Keys the data source fails on
    pub lookup_failing_keys: Vec<String>,
    /// Keys the data source has no value for
    pub lookup_missing_keys: Vec<String>,
    /// Statistics reporting interval in seconds
    pub stats_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `LOOKUP_DELAY_MS` - Data source latency (default: 250)
    /// - `LOOKUP_FAILING_KEYS` - Comma-separated failing keys (default: none)
    /// - `LOOKUP_MISSING_KEYS` - Comma-separated absent keys (default: none)
    /// - `STATS_INTERVAL` - Stats report frequency in seconds (default: 60)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            lookup_delay_ms: parse_var("LOOKUP_DELAY_MS").unwrap_or(defaults.lookup_delay_ms),
            lookup_failing_keys: list_var("LOOKUP_FAILING_KEYS"),
            lookup_missing_keys: list_var("LOOKUP_MISSING_KEYS"),
            stats_interval: parse_var("STATS_INTERVAL").unwrap_or(defaults.stats_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            server_port: 3000,
            lookup_delay_ms: 250,
            lookup_failing_keys: Vec::new(),
            lookup_missing_keys: Vec::new(),
            stats_interval: 60,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn list_var(name: &str) -> Vec<String> {
    env::var(name)
        .map(|v| split_list(&v))
        .unwrap_or_default()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
