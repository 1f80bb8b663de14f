//! Request cache implementation

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use super::config::CacheConfig;
use super::stats::{CacheStats, MetricsCollector};
use crate::time::{Clock, SystemClock};

/// Whether a fresh entry may be reused or the compute must run regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Return a fresh entry when one exists; compute otherwise.
    Reuse,
    /// Bypass the freshness check and recompute immediately. Single-flight
    /// and grace-on-failure still apply.
    ForceRefresh,
}

/// Stored entry. Entries are retained past `fresh_until` so a failed
/// recompute can fall back to the stale value.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fresh_until: Instant,
}

/// Request-keyed cache with single-flight recomputation and stale-on-error
/// extension.
///
/// # Type Parameters
///
/// * `V` - Value type (must implement `Clone`)
/// * `C` - Clock type for time operations (defaults to [`SystemClock`])
pub struct RequestCache<V, C = SystemClock>
where
    V: Clone,
    C: Clock + Clone,
{
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    // One short-lived lock per key, held only for the duration of a compute.
    flights: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
    config: CacheConfig,
    metrics: MetricsCollector,
    clock: C,
}

impl<V> RequestCache<V, SystemClock>
where
    V: Clone,
{
    /// Creates a cache with the specified configuration and the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<V, C> RequestCache<V, C>
where
    V: Clone,
    C: Clock + Clone,
{
    /// Creates a cache with the specified configuration and clock.
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            flights: Arc::new(Mutex::new(HashMap::new())),
            config,
            metrics: MetricsCollector::new(),
            clock,
        }
    }

    /// Returns the cached value for `key`, computing it when missing or
    /// expired.
    ///
    /// Concurrent callers for the same key share one in-flight computation:
    /// waiters queue on the per-key lock and, once it is released, observe
    /// the freshly stored value instead of recomputing.
    ///
    /// On compute failure the previous value - if one is still retained - is
    /// served and its validity window moves to `now + grace`; with no
    /// previous value the error propagates.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &str,
        mode: RefreshMode,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Display,
    {
        if mode == RefreshMode::Reuse {
            if let Some(value) = self.fresh_value(key).await {
                self.metrics.record_hit();
                return Ok(value);
            }
        }

        let flight = self.flight_lock(key).await;
        let result = {
            let _guard = flight.lock().await;

            // Re-check under the flight lock: a coalesced waiter arrives here
            // after the leader has already stored the result.
            if mode == RefreshMode::Reuse {
                if let Some(value) = self.fresh_value(key).await {
                    self.metrics.record_hit();
                    drop(_guard);
                    self.release_flight(key, &flight).await;
                    return Ok(value);
                }
            }

            self.metrics.record_miss();
            match compute().await {
                Ok(value) => {
                    self.store(key, value.clone()).await;
                    self.metrics.record_insert();
                    Ok(value)
                }
                Err(err) => match self.extend_stale(key).await {
                    Some(stale) => {
                        warn!(key, error = %err, "recompute failed, serving stale value with extended grace");
                        self.metrics.record_stale_serve();
                        Ok(stale)
                    }
                    None => Err(err),
                },
            }
        };
        self.release_flight(key, &flight).await;

        result
    }

    /// Unconditionally removes the entry for `key`; the next access
    /// recomputes. Returns whether an entry was present.
    pub async fn evict(&self, key: &str) -> bool {
        let removed = self.entries.write().await.remove(key).is_some();
        if removed {
            self.metrics.record_eviction();
            debug!(key, "evicted cache entry");
        }
        removed
    }

    /// Number of retained entries, fresh or stale.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` when no entries are retained.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Whether a retained entry for `key` is currently fresh.
    pub async fn is_fresh(&self, key: &str) -> bool {
        let entries = self.entries.read().await;
        entries.get(key).is_some_and(|entry| self.clock.now() < entry.fresh_until)
    }

    /// Returns current cache statistics.
    ///
    /// Uses a non-blocking read; the size is reported as 0 when the storage
    /// lock is currently held.
    pub fn stats(&self) -> CacheStats {
        let size = self.entries.try_read().map(|entries| entries.len()).unwrap_or(0);
        self.metrics.snapshot(size)
    }

    async fn fresh_value(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| self.clock.now() < entry.fresh_until)
            .map(|entry| entry.value.clone())
    }

    async fn store(&self, key: &str, value: V) {
        let fresh_until = self.clock.now() + self.config.ttl;
        self.entries.write().await.insert(key.to_string(), CacheEntry { value, fresh_until });
    }

    /// Extends the retained entry's validity window from the failure time
    /// and returns the stale value, if any.
    async fn extend_stale(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(key)?;
        entry.fresh_until = self.clock.now() + self.config.grace;
        Some(entry.value.clone())
    }

    async fn flight_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut flights = self.flights.lock().await;
        flights.entry(key.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    /// Drops the per-key lock from the registry once no other caller holds a
    /// clone, keeping the registry bounded by in-flight keys.
    async fn release_flight(&self, key: &str, flight: &Arc<Mutex<()>>) {
        let mut flights = self.flights.lock().await;
        // Two clones remain when nobody else waits: the registry's and ours.
        if Arc::strong_count(flight) <= 2 {
            flights.remove(key);
        }
    }
}

impl<V, C> Clone for RequestCache<V, C>
where
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            flights: Arc::clone(&self.flights),
            config: self.config,
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
        }
    }
}
