//! Eventbrite HTTP adapter
//!
//! Implements the `EventApi` port against the Eventbrite JSON endpoint.

pub mod auth;
pub mod client;

pub use auth::{AccessTokenStore, StaticTokenStore};
pub use client::EventbriteClient;
