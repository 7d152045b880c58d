//! Error types for the directory client.

use thiserror::Error;

use crate::api::ApiError;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the transport and service layers.
///
/// Only [`Error::Api`] is a classified backend failure. Everything else is
/// either a local precondition or an unclassified transport failure, which
/// the hooks report with a generic message.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend returned a non-success status, or the request timed out.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Connection, DNS or other transport failure.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// A success response whose body could not be decoded.
    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    /// The request payload could not be encoded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A filter operation was called with every filter dimension empty.
    #[error("{0}")]
    MissingFilter(&'static str),

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {0}")]
    Config(String),

    /// Preferences could not be written.
    #[error("preferences error: {0}")]
    Preferences(String),
}

impl Error {
    /// Returns the structured API error, if this is one.
    #[must_use]
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of a classified API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.as_api().map(ApiError::status)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
