//! # Eventline Domain
//!
//! Business domain types and models for Eventline.
//!
//! This crate contains:
//! - Event, venue, and organizer wire models
//! - The typed event query specification and its defaults
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Eventline crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
