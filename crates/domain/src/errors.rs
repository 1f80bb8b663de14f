//! Error types used throughout the integration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Eventline
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum EventlineError {
    /// No valid authenticated service is available.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The remote API returned an error payload or the transport failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Eventline operations
pub type Result<T> = std::result::Result<T, EventlineError>;
