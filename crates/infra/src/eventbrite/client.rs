//! Eventbrite JSON API client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eventline_core::EventApi;
use eventline_domain::{EventlineError, Result};
use serde_json::Value;
use tracing::debug;

use super::auth::{require_token, AccessTokenStore};
use crate::errors::{status_error, InfraError};

const EVENTBRITE_API_URL: &str = "https://www.eventbrite.com/json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP adapter implementing [`EventApi`] against the Eventbrite JSON
/// endpoint: `GET <base>/<method>?access_token=...&<params>`.
pub struct EventbriteClient {
    http: reqwest::Client,
    tokens: Arc<dyn AccessTokenStore>,
    base_url: String,
}

impl EventbriteClient {
    /// Create a client over the production endpoint.
    pub fn new(tokens: Arc<dyn AccessTokenStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| EventlineError::from(InfraError::from(err)))?;
        Ok(Self { http, tokens, base_url: EVENTBRITE_API_URL.to_string() })
    }

    /// Point the client at a different endpoint (for tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl EventApi for EventbriteClient {
    async fn get(&self, method: &str, params: &[(String, String)]) -> Result<Value> {
        let token = require_token(self.tokens.as_ref())?;
        let url = format!("{}/{}", self.base_url, method);

        debug!(method, "requesting eventbrite api");
        let response = self
            .http
            .get(&url)
            .query(&[("access_token", token.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|err| EventlineError::from(InfraError::from(err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| EventlineError::from(InfraError::from(err)))?;

        // The API reports some failures as 200 responses carrying an error
        // object instead of the requested payload.
        if let Some(error) = payload.get("error") {
            let message = error
                .get("error_message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(EventlineError::Upstream(message));
        }

        Ok(payload)
    }
}
