//! Read-Through Repository Module
//!
//! Serves lookups from the cache and falls back to the slow data source on a
//! miss, caching any non-empty value it returns. Concurrent misses for the same
//! key share one data source call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::debug;

use crate::cache::Cache;
use crate::repository::ThingService;

type Outcome<E> = Result<Option<String>, E>;
type InFlight<E> = Mutex<HashMap<String, Arc<Flight<E>>>>;

// == Repository Stats ==
/// Snapshot of repository activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryStats {
    /// Calls to `get_thing`
    pub lookups: u64,
    /// Lookups answered straight from the cache
    pub hits: u64,
    /// Lookups that missed the cache
    pub misses: u64,
    /// Calls made to the data source
    pub service_calls: u64,
    /// Data source calls that returned an error
    pub service_failures: u64,
    /// Misses that waited on another caller's in-flight lookup
    pub coalesced: u64,
}

#[derive(Debug, Default)]
struct Counters {
    lookups: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    service_calls: AtomicU64,
    service_failures: AtomicU64,
    coalesced: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> RepositoryStats {
        RepositoryStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            service_calls: self.service_calls.load(Ordering::Relaxed),
            service_failures: self.service_failures.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
        }
    }
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// == In-Flight Lookup ==
enum FlightState<E> {
    Pending,
    Done(Outcome<E>),
    /// The leading caller unwound before producing an outcome.
    Abandoned,
}

struct Flight<E> {
    state: Mutex<FlightState<E>>,
    ready: Condvar,
}

impl<E> Flight<E> {
    fn new() -> Self {
        Self {
            state: Mutex::new(FlightState::Pending),
            ready: Condvar::new(),
        }
    }

    fn finish(&self, state: FlightState<E>) {
        *lock(&self.state) = state;
        self.ready.notify_all();
    }
}

impl<E: Clone> Flight<E> {
    /// Blocks until the leader finishes. `None` if it was abandoned.
    fn wait(&self) -> Option<Outcome<E>> {
        let state = self
            .ready
            .wait_while(lock(&self.state), |state| {
                matches!(state, FlightState::Pending)
            })
            .unwrap_or_else(PoisonError::into_inner);

        match &*state {
            FlightState::Done(outcome) => Some(outcome.clone()),
            FlightState::Pending | FlightState::Abandoned => None,
        }
    }
}

/// Unregisters the leader's flight on every exit path, unwinding included.
struct LeaderGuard<'a, E> {
    in_flight: &'a InFlight<E>,
    key: &'a str,
    flight: Arc<Flight<E>>,
    released: bool,
}

impl<E> LeaderGuard<'_, E> {
    fn complete(mut self, outcome: Outcome<E>) {
        self.release(FlightState::Done(outcome));
    }

    fn release(&mut self, state: FlightState<E>) {
        if self.released {
            return;
        }
        self.released = true;
        lock(self.in_flight).remove(self.key);
        self.flight.finish(state);
    }
}

impl<E> Drop for LeaderGuard<'_, E> {
    fn drop(&mut self) {
        self.release(FlightState::Abandoned);
    }
}

enum Role<E> {
    Leader(Arc<Flight<E>>),
    Follower(Arc<Flight<E>>),
}

// == Thing Repository ==
/// Read-through repository over a [`Cache`] and a slow [`ThingService`].
///
/// The cache lock is never held while the data source runs, so hits on other
/// keys are served while a slow lookup is outstanding.
pub struct ThingRepository<C, S: ThingService> {
    cache: C,
    service: S,
    in_flight: InFlight<S::Error>,
    counters: Counters,
}

impl<C, S: ThingService> ThingRepository<C, S> {
    pub fn new(cache: C, service: S) -> Self {
        Self {
            cache,
            service,
            in_flight: Mutex::new(HashMap::new()),
            counters: Counters::default(),
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn stats(&self) -> RepositoryStats {
        self.counters.snapshot()
    }
}

impl<C, S> ThingRepository<C, S>
where
    C: Cache,
    S: ThingService,
    S::Error: Clone,
{
    // == Get Thing ==
    /// Returns the value for `key`, loading it from the data source on a miss.
    ///
    /// - Hit: the cached value; the data source is not called.
    /// - Miss: exactly one data source call. A non-empty `Ok(Some(v))` is
    ///   cached and returned; `Ok(None)` and `Ok(Some(""))` are returned as
    ///   is without caching.
    ///
    /// # Errors
    /// A data source failure is returned exactly as the source produced it and
    /// nothing is cached. Callers that joined an in-flight lookup receive a
    /// clone of the same error.
    pub fn get_thing(&self, key: &str) -> Result<Option<String>, S::Error> {
        bump(&self.counters.lookups);

        if let Some(value) = self.cache.get(key) {
            bump(&self.counters.hits);
            return Ok(Some(value));
        }

        bump(&self.counters.misses);
        self.load(key)
    }

    fn load(&self, key: &str) -> Outcome<S::Error> {
        let role = {
            let mut in_flight = lock(&self.in_flight);
            if let Some(flight) = in_flight.get(key) {
                Role::Follower(Arc::clone(flight))
            } else if let Some(value) = self.cache.peek(key).and_then(|_| self.cache.get(key)) {
                // a lookup for this key finished after our cache check; the
                // follow-up get marks the hit as most recently used
                return Ok(Some(value));
            } else {
                let flight = Arc::new(Flight::new());
                in_flight.insert(key.to_string(), Arc::clone(&flight));
                Role::Leader(flight)
            }
        };

        match role {
            Role::Leader(flight) => self.lead(key, flight),
            Role::Follower(flight) => {
                bump(&self.counters.coalesced);
                debug!(key = %key, "joining in-flight lookup");
                match flight.wait() {
                    Some(outcome) => outcome,
                    None => self.load(key),
                }
            }
        }
    }

    fn lead(&self, key: &str, flight: Arc<Flight<S::Error>>) -> Outcome<S::Error> {
        let guard = LeaderGuard {
            in_flight: &self.in_flight,
            key,
            flight,
            released: false,
        };

        bump(&self.counters.service_calls);
        debug!(key = %key, "cache miss, querying thing service");
        let outcome = self.service.get_thing_sync(key);

        match &outcome {
            Ok(Some(value)) if !value.is_empty() => {
                self.cache.set(key, value.clone());
                debug!(key = %key, "cached value from thing service");
            }
            Ok(_) => debug!(key = %key, "thing service has no value"),
            Err(_) => bump(&self.counters.service_failures),
        }

        guard.complete(outcome.clone());
        outcome
    }
}
