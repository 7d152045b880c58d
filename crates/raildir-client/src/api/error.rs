//! # API Errors
//!
//! Structured error raised for non-2xx responses and timeouts.

use raildir_types::ErrorBody;
use thiserror::Error;

/// HTTP-like status reported for requests that exceeded the client timeout.
pub const TIMEOUT_STATUS: u16 = 408;

/// The backend answered with a non-success status, or the request timed out.
///
/// `message` is the backend's own message when the error body carried one,
/// otherwise a generic `HTTP error! status: N`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    status: u16,
    response: Option<ErrorBody>,
}

impl ApiError {
    /// Creates an error for `status` with an optional parsed error body.
    pub fn new(message: impl Into<String>, status: u16, response: Option<ErrorBody>) -> Self {
        Self {
            message: message.into(),
            status,
            response,
        }
    }

    /// The error raised when a request exceeds the configured timeout.
    #[must_use]
    pub fn timeout() -> Self {
        Self::new("Request timeout", TIMEOUT_STATUS, None)
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code (408 for timeouts).
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Parsed backend error body, when the response carried one.
    #[must_use]
    pub fn response(&self) -> Option<&ErrorBody> {
        self.response.as_ref()
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.status == TIMEOUT_STATUS
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}
