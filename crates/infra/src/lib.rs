//! # Eventline Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The Eventbrite HTTP adapter behind the `EventApi` port
//! - The access-token boundary for the connected account
//! - The periodic cache refresh scheduler and the disconnect hook
//! - Featured-event helpers driven by a `SettingsStore`
//!
//! ## Architecture
//! - Implements traits defined in `eventline-core`
//! - Depends on `eventline-domain`, `eventline-common`, and `eventline-core`
//! - Contains all "impure" code (network I/O, background tasks)

pub mod disconnect;
pub mod errors;
pub mod eventbrite;
pub mod featured;
pub mod refresh;

// Re-export commonly used items
pub use disconnect::DisconnectHook;
pub use errors::InfraError;
pub use eventbrite::{AccessTokenStore, EventbriteClient, StaticTokenStore};
pub use featured::{featured_event_refs, get_featured_events, get_non_featured_events};
pub use refresh::RefreshScheduler;
