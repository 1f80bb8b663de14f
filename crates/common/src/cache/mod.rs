//! Request-keyed cache with single-flight recomputation and stale-on-error
//! extension
//!
//! This module implements the caching policy used for remote API payloads:
//!
//! - A fresh entry (within its TTL) is returned without recomputing.
//! - A miss or expired entry triggers the supplied compute future, with
//!   concurrent callers for the same key coalesced behind a per-key lock
//!   (single-flight): the upstream is invoked exactly once, waiters observe
//!   the stored result.
//! - When a recompute fails and a stale value is still retained, the stale
//!   value is served and its validity window extended by a grace period,
//!   trading staleness for availability.
//! - Entries can be evicted unconditionally; the next access recomputes.
//!
//! The cache holds no knowledge of what it stores; keys are derived strings
//! and values are opaque clones.
//!
//! # Examples
//!
//! ```
//! use eventline_common::cache::{CacheConfig, RefreshMode, RequestCache};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache: RequestCache<String> = RequestCache::new(CacheConfig::default());
//!
//!     let value = cache
//!         .get_or_compute("key", RefreshMode::Reuse, || async {
//!             Ok::<_, String>("computed".to_string())
//!         })
//!         .await
//!         .unwrap();
//!     assert_eq!(value, "computed");
//! }
//! ```

mod config;
mod core;
mod stats;

pub use config::CacheConfig;
pub use self::core::{RefreshMode, RequestCache};
pub use stats::CacheStats;
