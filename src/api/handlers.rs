//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::warn;

use crate::cache::{Cache, SharedCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{HealthResponse, SetRequest, SetResponse, StatsResponse, ThingResponse};
use crate::repository::{DoublingService, ThingRepository};

/// Repository type served by the binary.
pub type AppRepository = ThingRepository<SharedCache, DoublingService>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-through repository; its cache is shared with the `/cache` routes
    pub repository: Arc<AppRepository>,
}

impl AppState {
    pub fn new(repository: AppRepository) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// # Errors
    /// Fails when the configured cache capacity is zero.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = SharedCache::new(config.cache_capacity)?;
        let service = DoublingService::from_config(config);
        Ok(Self::new(ThingRepository::new(cache, service)))
    }

    pub fn cache(&self) -> &SharedCache {
        self.repository.cache()
    }
}

/// Handler for GET /things/:key
///
/// Read-through lookup. The blocking data source call runs on the blocking
/// thread pool.
pub async fn get_thing_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ThingResponse>> {
    let repository = Arc::clone(&state.repository);
    let lookup_key = key.clone();

    let outcome = tokio::task::spawn_blocking(move || repository.get_thing(&lookup_key))
        .await
        .map_err(|e| CacheError::Internal(format!("lookup task failed: {e}")))?;

    match outcome {
        Ok(Some(value)) => Ok(Json(ThingResponse::new(key, value))),
        Ok(None) => Err(CacheError::NotFound(key)),
        Err(err) => {
            warn!(key = %key, error = %err, "thing service lookup failed");
            Err(CacheError::Upstream(err.to_string()))
        }
    }
}

/// Handler for GET /cache/:key
///
/// Cache-only lookup; a hit refreshes the key's recency.
pub async fn cache_get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ThingResponse>> {
    match state.cache().get(&key) {
        Some(value) => Ok(Json(ThingResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for PUT /cache
///
/// Writes a key-value pair directly into the cache.
pub async fn cache_set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    req.validate()?;

    state.cache().set(&req.key, req.value);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        &state.cache().stats(),
        state.repository.stats(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
