//! # Client Configuration
//!
//! Connection settings for the directory API, sourced from `RAILDIR_*`
//! environment variables on top of built-in defaults.
//!
//! | Variable | Default |
//! |---|---|
//! | `RAILDIR_API_BASE_URL` | `http://localhost:3000` |
//! | `RAILDIR_API_KEY` | unset |
//! | `RAILDIR_API_USERNAME` / `RAILDIR_API_PASSWORD` | unset |
//! | `RAILDIR_TIMEOUT_MS` | `30000` |
//! | `RAILDIR_DOCUMENTS_URL` | unset |
//! | `RAILDIR_DOCUMENTS_COUNT_URL` | `{documents_url}/count` |
//! | `RAILDIR_DOCUMENT_TITLE_MARKER` | unset |
//! | `RAILDIR_SEARCH_DEBOUNCE_MS` | `1500` |
//! | `RAILDIR_PAGE_SIZE` | `50` |

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use config::{Config, Environment};
use raildir_types::DEFAULT_LIMIT;
use serde::{de, Deserialize, Deserializer};

use crate::error::Result;

/// Prefix of every configuration environment variable.
pub const ENV_PREFIX: &str = "RAILDIR";

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Quiet period before an interactive search fires.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 1_500;

/// A credential that never shows up in logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wraps a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Exposes the secret value.
    ///
    /// Use this only where the value goes on the wire.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True when the secret is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Settings fixed at client construction.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the directory API.
    pub api_base_url: String,

    /// Sent as `X-API-Key` when non-blank.
    #[serde(default)]
    pub api_key: Option<Secret>,

    /// HTTP Basic username; used only together with `api_password`.
    #[serde(default)]
    pub api_username: Option<String>,

    #[serde(default)]
    pub api_password: Option<Secret>,

    /// Request timeout in milliseconds.
    #[serde(deserialize_with = "number")]
    pub timeout_ms: u64,

    /// Absolute URL of the external document source.
    #[serde(default)]
    pub documents_url: Option<String>,

    /// Absolute URL of the document count endpoint.
    #[serde(default)]
    pub documents_count_url: Option<String>,

    /// When set, only documents whose title contains this marker are listed.
    #[serde(default)]
    pub document_title_marker: Option<String>,

    /// Debounce quiet period for interactive search, in milliseconds.
    #[serde(deserialize_with = "number")]
    pub search_debounce_ms: u64,

    /// Page size for listing and search hooks.
    #[serde(deserialize_with = "number")]
    pub page_size: u32,
}

impl ClientConfig {
    /// Creates a configuration for `base_url` with every other setting at
    /// its default.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            api_key: None,
            api_username: None,
            api_password: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            documents_url: None,
            documents_count_url: None,
            document_title_marker: None,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            page_size: DEFAULT_LIMIT,
        }
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if a variable cannot be parsed into
    /// its setting (e.g. a non-numeric `RAILDIR_TIMEOUT_MS`).
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from an explicit variable map instead of the
    /// process environment. Keys use the same `RAILDIR_*` names.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load(environment: Environment) -> Result<Self> {
        let config: Self = Config::builder()
            .set_default("api_base_url", DEFAULT_BASE_URL)?
            .set_default("timeout_ms", DEFAULT_TIMEOUT_MS)?
            .set_default("search_debounce_ms", DEFAULT_SEARCH_DEBOUNCE_MS)?
            .set_default("page_size", u64::from(DEFAULT_LIMIT))?
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        tracing::debug!(
            base_url = %config.api_base_url,
            timeout_ms = config.timeout_ms,
            api_key = config.api_key.is_some(),
            basic_auth = config.basic_auth().is_some(),
            "Loaded client configuration"
        );

        Ok(config)
    }

    /// Sets the `X-API-Key` credential.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(key));
        self
    }

    /// Sets HTTP Basic credentials.
    #[must_use]
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.api_username = Some(username.into());
        self.api_password = Some(Secret::new(password));
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_documents_url(mut self, url: impl Into<String>) -> Self {
        self.documents_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_document_title_marker(mut self, marker: impl Into<String>) -> Self {
        self.document_title_marker = Some(marker.into());
        self
    }

    #[must_use]
    pub fn with_search_debounce(mut self, quiet: Duration) -> Self {
        self.search_debounce_ms = u64::try_from(quiet.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// The API key, if one is configured and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&Secret> {
        self.api_key.as_ref().filter(|key| !key.is_blank())
    }

    /// Username and password, if both are configured and non-empty.
    #[must_use]
    pub fn basic_auth(&self) -> Option<(&str, &Secret)> {
        match (&self.api_username, &self.api_password) {
            (Some(username), Some(password))
                if !username.is_empty() && !password.expose().is_empty() =>
            {
                Some((username.as_str(), password))
            }
            _ => None,
        }
    }

    /// URL of the document count endpoint.
    #[must_use]
    pub fn documents_count_url(&self) -> Option<String> {
        self.documents_count_url.clone().or_else(|| {
            self.documents_url
                .as_ref()
                .map(|url| format!("{}/count", url.trim_end_matches('/')))
        })
    }
}

/// Numeric settings arrive as strings from the environment and as numbers
/// from the defaults. Every other variable is kept verbatim, so credentials
/// such as `0123` or `TRUE` are never reinterpreted.
fn number<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + FromStr,
    <T as FromStr>::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => {
            T::try_from(n).map_err(|_| de::Error::custom(format!("{n} is out of range")))
        }
        Raw::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = ClientConfig::from_vars(HashMap::new()).unwrap();

        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.search_debounce(), Duration::from_millis(1500));
        assert_eq!(config.page_size, 50);
        assert!(config.api_key().is_none());
        assert!(config.basic_auth().is_none());
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = ClientConfig::from_vars(vars(&[
            ("RAILDIR_API_BASE_URL", "https://directory.example"),
            ("RAILDIR_API_KEY", "k-123"),
            ("RAILDIR_API_USERNAME", "ops"),
            ("RAILDIR_API_PASSWORD", "hunter2"),
            ("RAILDIR_TIMEOUT_MS", "5000"),
            ("RAILDIR_DOCUMENTS_URL", "https://docs.example/api/documents"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://directory.example");
        assert_eq!(config.api_key().map(Secret::expose), Some("k-123"));
        assert_eq!(config.basic_auth().map(|(user, _)| user), Some("ops"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(
            config.documents_count_url().as_deref(),
            Some("https://docs.example/api/documents/count")
        );
    }

    #[test]
    fn test_credentials_are_kept_verbatim() {
        let config = ClientConfig::from_vars(vars(&[
            ("RAILDIR_API_USERNAME", "007"),
            ("RAILDIR_API_PASSWORD", "0123"),
            ("RAILDIR_API_KEY", "TRUE"),
            ("RAILDIR_PAGE_SIZE", "25"),
        ]))
        .unwrap();

        let (user, password) = config.basic_auth().unwrap();
        assert_eq!(user, "007");
        assert_eq!(password.expose(), "0123");
        assert_eq!(config.api_key().map(Secret::expose), Some("TRUE"));
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        let result = ClientConfig::from_vars(vars(&[("RAILDIR_TIMEOUT_MS", "soon")]));
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_blank_key_and_partial_basic_auth_are_ignored() {
        let config = ClientConfig::new("http://x").with_api_key("   ");
        assert!(config.api_key().is_none());

        let mut config = ClientConfig::new("http://x");
        config.api_username = Some("ops".to_string());
        assert!(config.basic_auth().is_none());
    }

    #[test]
    fn test_secret_is_redacted() {
        let config = ClientConfig::new("http://x").with_basic_auth("ops", "hunter2");
        let debug = format!("{config:?}");

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
