//! Stats Reporter Task
//!
//! Background task that periodically logs cache and repository statistics.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::api::AppState;
use crate::models::StatsResponse;

/// Spawns a background task that logs statistics every `interval_secs`.
///
/// Intervals below one second are raised to one second. The returned handle
/// is aborted during graceful shutdown.
pub fn spawn_stats_reporter(state: AppState, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting stats reporter with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;
            report_stats(&state);
        }
    })
}

/// Logs one statistics snapshot and returns it.
pub fn report_stats(state: &AppState) -> StatsResponse {
    let stats = StatsResponse::new(&state.cache().stats(), state.repository.stats());

    info!(
        entries = stats.cache.total_entries,
        capacity = stats.cache.capacity,
        hit_rate = stats.cache.hit_rate,
        evictions = stats.cache.evictions,
        service_calls = stats.repository.service_calls,
        service_failures = stats.repository.service_failures,
        coalesced = stats.repository.coalesced,
        "cache stats"
    );

    stats
}
