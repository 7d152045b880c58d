//! Response envelopes used by the directory API.
//!
//! Most endpoints answer `{ success, data }`; count endpoints answer
//! `{ success, count }`; errors carry `{ success: false, message, error? }`.

use serde::{Deserialize, Serialize};

/// `{ success, data }` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: T,
}

/// `{ success, count }` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEnvelope {
    #[serde(default)]
    pub success: bool,
    pub count: u64,
}

/// Either a `{ success, data }` envelope or the bare payload.
///
/// Single-record endpoints are not consistent about wrapping, so callers
/// accept both and unwrap with [`MaybeEnveloped::into_inner`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MaybeEnveloped<T> {
    /// Wrapped payload.
    Enveloped(DataEnvelope<T>),
    /// Bare payload.
    Bare(T),
}

impl<T> MaybeEnveloped<T> {
    /// Returns the payload regardless of wrapping.
    pub fn into_inner(self) -> T {
        match self {
            Self::Enveloped(envelope) => envelope.data,
            Self::Bare(value) => value,
        }
    }
}

/// Structured error body returned with non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub success: bool,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Machine-oriented error detail: a code string, or an object or array
    /// of field errors depending on the endpoint.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}
