//! # Eventline Core
//!
//! Business logic for the event retrieval and filtering pipeline:
//! - Request key derivation for the payload cache
//! - Recurrence expansion of repeating events
//! - The filter/sort/paginate pipeline
//! - The query orchestrator ([`events::EventService`]) and its port traits
//!
//! Core depends only on `eventline-domain` and `eventline-common`;
//! infrastructure adapters implement the ports defined here.

pub mod events;

pub use events::{
    EventApi, EventService, SettingsStore, METHOD_USER_GET, METHOD_USER_LIST_EVENTS,
    METHOD_USER_LIST_ORGANIZERS, METHOD_USER_LIST_VENUES, SERVICE_NAME,
};
