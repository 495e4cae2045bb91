//! Repository Module
//!
//! Read-through access to a slow data source, fronted by the LRU cache.

mod service;
mod thing;

pub use service::{DoublingService, ServiceError, ThingService};
pub use thing::{RepositoryStats, ThingRepository};
