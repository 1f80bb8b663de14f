//! Cache configuration

use std::time::Duration;

/// Default freshness window after a successful compute.
pub const DEFAULT_TTL: Duration = Duration::from_secs(1200);

/// Default extension granted to a stale value after a failed recompute.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(300);

/// Configuration for [`RequestCache`](super::RequestCache) behavior
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// How long a successfully computed value stays fresh.
    pub ttl: Duration,

    /// How far the validity window moves forward when a recompute fails and
    /// the previous value is served instead.
    pub grace: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL, grace: DEFAULT_GRACE }
    }
}

impl CacheConfig {
    /// Create a configuration with explicit TTL and grace windows.
    pub fn new(ttl: Duration, grace: Duration) -> Self {
        Self { ttl, grace }
    }
}
