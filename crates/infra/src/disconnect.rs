//! Account disconnect handling
//!
//! When the connected account is disconnected the cached payloads must not
//! be served again and the background refresh must stop re-fetching with a
//! token that no longer works. The hook receives the disconnect signal with
//! the service name it concerns and ignores every other service.

use std::sync::Arc;

use eventline_core::{EventService, SERVICE_NAME};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::refresh::RefreshScheduler;

/// Reacts to "account disconnected" signals for this integration.
pub struct DisconnectHook {
    service: Arc<EventService>,
    scheduler: Mutex<RefreshScheduler>,
}

impl DisconnectHook {
    pub fn new(service: Arc<EventService>, scheduler: RefreshScheduler) -> Self {
        Self { service, scheduler: Mutex::new(scheduler) }
    }

    /// Handle a disconnect signal. Signals for other services are ignored;
    /// a matching signal stops the refresh scheduler and evicts the known
    /// method caches.
    pub async fn service_disconnected(&self, service_name: &str) {
        if service_name != SERVICE_NAME {
            return;
        }

        let mut scheduler = self.scheduler.lock().await;
        if scheduler.is_running() {
            if let Err(err) = scheduler.stop().await {
                warn!(error = %err, "failed to stop refresh scheduler on disconnect");
            }
        }

        self.service.flush_known_method_caches().await;
        info!(service = service_name, "account disconnected, cached payloads evicted");
    }
}
