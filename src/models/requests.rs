//! Request DTOs for the cache service API

use serde::Deserialize;

use crate::error::CacheError;

/// Body of `PUT /cache`, a direct write that bypasses the data source.
///
/// The value is stored as sent. An empty string is a real value and reads
/// back as a hit.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
}

impl SetRequest {
    /// Rejects an empty key. Keys are otherwise taken verbatim (no trimming
    /// or case folding), since the cache itself accepts any string.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.key.is_empty() {
            return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
        }
        Ok(())
    }
}
