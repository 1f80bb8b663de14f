//! Access-token boundary for the connected account
//!
//! Token acquisition (the OAuth dance) happens elsewhere; this module only
//! exposes the token the rest of the system needs to sign requests. A
//! missing token is an ordinary state, not a crash: the client turns it into
//! an auth error and the listing entry points fail open from there.

use eventline_domain::{EventlineError, Result};

/// Read access to the connected account's API token.
pub trait AccessTokenStore: Send + Sync {
    /// The current access token, or `None` when no account is connected.
    fn access_token(&self) -> Option<String>;
}

/// Returns the token or an auth error describing its absence.
pub(crate) fn require_token(store: &dyn AccessTokenStore) -> Result<String> {
    store
        .access_token()
        .ok_or_else(|| EventlineError::Auth("no connected account token".to_string()))
}

/// Fixed token store: the token is handed in at construction and never
/// changes. Suits deployments where the token comes from configuration.
pub struct StaticTokenStore {
    token: Option<String>,
}

impl StaticTokenStore {
    /// A store holding the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()) }
    }

    /// A store with no connected account.
    pub fn disconnected() -> Self {
        Self { token: None }
    }
}

impl AccessTokenStore for StaticTokenStore {
    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}
