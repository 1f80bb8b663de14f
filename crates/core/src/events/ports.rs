//! Port interfaces implemented by infrastructure adapters

use async_trait::async_trait;
use eventline_domain::Result;
use serde_json::Value;

/// Authenticated access to the remote event API.
///
/// Implementations issue `GET <endpoint>/<method>?<params>` on behalf of the
/// connected account and return the raw JSON payload. Absence of a valid
/// authenticated session is reported as [`EventlineError::Auth`], not a
/// panic.
///
/// [`EventlineError::Auth`]: eventline_domain::EventlineError::Auth
#[async_trait]
pub trait EventApi: Send + Sync {
    /// Fetch one API method with the given query parameters.
    async fn get(&self, method: &str, params: &[(String, String)]) -> Result<Value>;
}

/// Read-only settings lookup.
///
/// Used by calling code to obtain the configured featured-event pairs that
/// are fed into a query's occurrence filters; the pipeline itself never
/// reads settings.
pub trait SettingsStore: Send + Sync {
    /// Fetch a setting value by key within a settings group.
    fn get_setting(&self, key: &str, group: &str) -> Option<Value>;
}
