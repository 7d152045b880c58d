//! # API Client
//!
//! HTTP transport for the directory API.
//!
//! This module provides the [`ApiClient`] used by every service, the
//! [`ApiRequest`] description it executes and the structured [`ApiError`]
//! it raises for non-2xx responses and timeouts.

mod client;
mod error;
mod request;

pub use client::{ApiClient, API_KEY_HEADER};
pub use error::{ApiError, TIMEOUT_STATUS};
pub use request::ApiRequest;
