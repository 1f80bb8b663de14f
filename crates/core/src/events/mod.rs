//! Event retrieval and filtering pipeline

pub mod filters;
pub mod ports;
pub mod recurrence;
pub mod request_key;
pub mod service;

pub use ports::{EventApi, SettingsStore};
pub use service::{
    EventService, METHOD_USER_GET, METHOD_USER_LIST_EVENTS, METHOD_USER_LIST_ORGANIZERS,
    METHOD_USER_LIST_VENUES, SERVICE_NAME,
};
