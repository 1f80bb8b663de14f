//! Periodic cache refresh
//!
//! Keeps the event listing warm by force-refetching it on a fixed interval,
//! so interactive queries rarely pay the upstream round trip. Explicit
//! lifecycle: `start` spawns the background task, `stop` cancels it and
//! waits for it to finish.

use std::sync::Arc;
use std::time::Duration;

use eventline_common::cache::RefreshMode;
use eventline_core::EventService;
use eventline_domain::{EventQuery, EventlineError, Result};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Matches the cache freshness window, so a refresh lands roughly when the
/// previous payload expires.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1200);

/// Background refresher for the event listing cache.
pub struct RefreshScheduler {
    service: Arc<EventService>,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
}

impl RefreshScheduler {
    /// Create a scheduler with the default interval.
    pub fn new(service: Arc<EventService>) -> Self {
        Self::with_interval(service, DEFAULT_REFRESH_INTERVAL)
    }

    /// Create a scheduler with a custom interval.
    pub fn with_interval(service: Arc<EventService>, interval: Duration) -> Self {
        Self { service, interval, handle: None, cancellation: CancellationToken::new() }
    }

    /// Start the background refresh task.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(EventlineError::Internal("refresh scheduler already running".to_string()));
        }

        self.cancellation = CancellationToken::new();
        let cancel = self.cancellation.clone();
        let service = Arc::clone(&self.service);
        let period = self.interval;

        let handle = tokio::spawn(async move {
            Self::refresh_loop(service, period, cancel).await;
        });

        self.handle = Some(handle);
        info!(interval_secs = self.interval.as_secs(), "refresh scheduler started");
        Ok(())
    }

    /// Stop the background task and wait for it to finish.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Err(EventlineError::Internal("refresh scheduler not running".to_string()));
        };

        self.cancellation.cancel();
        handle
            .await
            .map_err(|err| EventlineError::Internal(format!("refresh task panicked: {err}")))?;

        info!("refresh scheduler stopped");
        Ok(())
    }

    /// Returns true when the background task is active.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    async fn refresh_loop(
        service: Arc<EventService>,
        period: Duration,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; the startup fetch already
        // happened, so consume it and refresh one period from now.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let events =
                        service.get_user_events(&EventQuery::default(), RefreshMode::ForceRefresh).await;
                    if events.is_empty() {
                        warn!("scheduled refresh returned no events");
                    } else {
                        debug!(event_count = events.len(), "scheduled refresh complete");
                    }
                }
            }
        }
    }
}
