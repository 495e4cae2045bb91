//! API Module
//!
//! HTTP handlers and routing for the cache service REST API.
//!
//! # Endpoints
//! - `GET /things/:key` - Read-through lookup via the repository
//! - `GET /cache/:key` - Cache-only lookup
//! - `PUT /cache` - Store a key-value pair in the cache
//! - `GET /stats` - Cache and repository statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
