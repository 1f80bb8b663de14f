//! Conversions from external infrastructure errors into domain errors.

use eventline_domain::EventlineError;
use reqwest::Error as HttpError;
use reqwest::StatusCode;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub EventlineError);

impl From<InfraError> for EventlineError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<EventlineError> for InfraError {
    fn from(value: EventlineError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoEventlineError {
    fn into_eventline(self) -> EventlineError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → EventlineError */
/* -------------------------------------------------------------------------- */

impl IntoEventlineError for HttpError {
    fn into_eventline(self) -> EventlineError {
        if self.is_timeout() {
            return EventlineError::Upstream("HTTP request timed out".into());
        }

        if self.is_connect() {
            return EventlineError::Upstream("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return status_error(status);
        }

        if self.is_decode() {
            return EventlineError::Upstream(format!("invalid response body: {self}"));
        }

        EventlineError::Upstream(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_eventline())
    }
}

/// Maps a response status to the domain error the caller should see.
/// Credential rejections surface as auth failures; everything else is an
/// upstream fault.
pub(crate) fn status_error(status: StatusCode) -> EventlineError {
    let message =
        format!("HTTP {} {}", status.as_u16(), status.canonical_reason().unwrap_or("unknown status"));

    match status.as_u16() {
        401 | 403 => EventlineError::Auth(message),
        400..=499 => EventlineError::InvalidInput(message),
        _ => EventlineError::Upstream(message),
    }
}
