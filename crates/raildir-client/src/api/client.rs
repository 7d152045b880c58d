//! # API Client
//!
//! Single point of outbound HTTP communication with the directory API.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use raildir_types::ErrorBody;

use super::error::ApiError;
use super::request::ApiRequest;
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Header carrying the static API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the directory API.
///
/// Every call issues exactly one request: no retries, no caching. Default
/// headers (`Content-Type`, `X-API-Key`, `Authorization`) are fixed at
/// construction; per-call headers on an [`ApiRequest`] override them.
///
/// The client is cheaply cloneable and is meant to be built once by the
/// composition root and handed to each service.
///
/// # Examples
///
/// ```rust,ignore
/// use raildir_client::{ApiClient, ClientConfig};
///
/// let client = ApiClient::new(&ClientConfig::from_env()?)?;
/// let groups: serde_json::Value = client.get("/api/contacts/blood-groups").await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a credential is not a valid header value
    /// or the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .default_headers(default_headers(config)?)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves `endpoint` against the base URL. Absolute `http` URLs are
    /// returned unchanged.
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Sends `request` and decodes the response body into `T`.
    ///
    /// JSON responses are deserialized (an empty body reads as `null`).
    /// Anything else is returned as raw text, so `T` must accept a string.
    ///
    /// # Errors
    ///
    /// * [`Error::Api`] - Non-2xx status, or the request timed out (status 408)
    /// * [`Error::Network`] - Any other transport failure
    /// * [`Error::InvalidResponse`] - Success body could not be decoded into `T`
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let url = self.url(&request.path);
        tracing::debug!(method = %request.method, %url, "Sending request");

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(|e| transport_error(e, &url))?;
        handle_response(response, &url).await
    }

    /// `GET endpoint`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.execute(ApiRequest::get(endpoint)).await
    }

    /// `POST endpoint` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also [`Error::InvalidRequest`] if `body`
    /// cannot be serialized.
    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::post(endpoint).json(body)?).await
    }

    /// `PUT endpoint` with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::post`].
    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::put(endpoint).json(body)?).await
    }

    /// `PATCH endpoint` with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::post`].
    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::patch(endpoint).json(body)?).await
    }

    /// `DELETE endpoint`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.execute(ApiRequest::delete(endpoint)).await
    }

    /// `GET endpoint` with extra per-call headers.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn get_with<T: DeserializeOwned>(&self, endpoint: &str, headers: HeaderMap) -> Result<T> {
        self.execute(ApiRequest::get(endpoint).headers(headers)).await
    }

    /// `POST endpoint` with a JSON body and extra per-call headers.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::post`].
    pub async fn post_with<T, B>(&self, endpoint: &str, body: &B, headers: HeaderMap) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::post(endpoint).json(body)?.headers(headers))
            .await
    }

    /// `PUT endpoint` with a JSON body and extra per-call headers.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::post`].
    pub async fn put_with<T, B>(&self, endpoint: &str, body: &B, headers: HeaderMap) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::put(endpoint).json(body)?.headers(headers))
            .await
    }

    /// `PATCH endpoint` with a JSON body and extra per-call headers.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::post`].
    pub async fn patch_with<T, B>(&self, endpoint: &str, body: &B, headers: HeaderMap) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::patch(endpoint).json(body)?.headers(headers))
            .await
    }

    /// `DELETE endpoint` with extra per-call headers.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn delete_with<T: DeserializeOwned>(&self, endpoint: &str, headers: HeaderMap) -> Result<T> {
        self.execute(ApiRequest::delete(endpoint).headers(headers)).await
    }
}

/// Builds the headers sent with every request.
fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(key) = config.api_key() {
        let mut value = HeaderValue::from_str(key.expose())
            .map_err(|_| Error::Config("API key is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, value);
    }

    if let Some((username, password)) = config.basic_auth() {
        let encoded = BASE64.encode(format!("{username}:{}", password.expose()));
        let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|_| Error::Config("basic credentials are not a valid header value".to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// Maps a reqwest failure: timeouts become a 408 [`ApiError`], everything
/// else stays an unclassified network error.
fn transport_error(err: reqwest::Error, url: &str) -> Error {
    if err.is_timeout() {
        tracing::warn!(%url, "Request timed out");
        ApiError::timeout().into()
    } else {
        tracing::warn!(%url, error = %err, "Request failed");
        Error::Network(err)
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response, url: &str) -> Result<T> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));
    let bytes = response.bytes().await.map_err(|e| transport_error(e, url))?;

    if !status.is_success() {
        let (message, body) = error_details(&bytes, is_json);
        let message =
            message.unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

        tracing::warn!(%url, status = status.as_u16(), %message, "Request rejected");
        return Err(ApiError::new(message, status.as_u16(), body).into());
    }

    decode_body(&bytes, is_json)
}

/// Backend message and parsed body of an error response.
///
/// The message is read on its own so that an unexpected shape elsewhere in
/// the body cannot hide it.
fn error_details(bytes: &[u8], is_json: bool) -> (Option<String>, Option<ErrorBody>) {
    if !is_json {
        return (None, None);
    }
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(bytes) else {
        return (None, None);
    };

    let message = value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    (message, serde_json::from_value(value).ok())
}

/// Decodes a success body: JSON when the content type says so, raw text
/// otherwise.
fn decode_body<T: DeserializeOwned>(bytes: &[u8], is_json: bool) -> Result<T> {
    let decoded = if !is_json {
        let text = String::from_utf8_lossy(bytes).into_owned();
        T::deserialize(serde_json::Value::String(text))
    } else if bytes.iter().all(u8::is_ascii_whitespace) {
        T::deserialize(serde_json::Value::Null)
    } else {
        serde_json::from_slice(bytes)
    };
    decoded.map_err(|e| Error::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::IgnoredAny;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&ClientConfig::new(server.uri())).unwrap()
    }

    #[test]
    fn test_url_building() {
        let client = ApiClient::new(&ClientConfig::new("http://localhost:3000/")).unwrap();

        assert_eq!(client.url("/api/contacts"), "http://localhost:3000/api/contacts");
        assert_eq!(client.url("api/contacts"), "http://localhost:3000/api/contacts");
        assert_eq!(
            client.url("https://docs.example/api/documents"),
            "https://docs.example/api/documents"
        );
    }

    #[test]
    fn test_decode_text_body_as_string() {
        let text: String = decode_body(b"pong", false).unwrap();
        assert_eq!(text, "pong");
    }

    #[test]
    fn test_decode_empty_json_body() {
        let value: Option<u64> = decode_body(b"", true).unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_default_headers_are_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/contacts/count"))
            .and(header("content-type", "application/json"))
            .and(header("x-api-key", "k-123"))
            .and(header("authorization", "Basic b3BzOmh1bnRlcjI="))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true, "count": 3})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = ClientConfig::new(mock_server.uri())
            .with_api_key("k-123")
            .with_basic_auth("ops", "hunter2");
        let client = ApiClient::new(&config).unwrap();

        let body: serde_json::Value = client.get("/api/contacts/count").await.unwrap();
        assert_eq!(body["count"], 3);
    }

    #[tokio::test]
    async fn test_per_call_header_overrides_default() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("x-api-key", "override"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client =
            ApiClient::new(&ClientConfig::new(mock_server.uri()).with_api_key("default")).unwrap();
        let request =
            ApiRequest::get("/ping").header(API_KEY_HEADER.parse().unwrap(), HeaderValue::from_static("override"));

        let text: String = client.execute(request).await.unwrap();
        assert_eq!(text, "pong");
    }

    #[tokio::test]
    async fn test_json_body_and_query_are_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/contacts/c1"))
            .and(query_param("dryRun", "true"))
            .and(body_json(serde_json::json!({"name": "A. Kumar"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = ApiRequest::put("/api/contacts/c1")
            .query("dryRun", true)
            .json(&serde_json::json!({"name": "A. Kumar"}))
            .unwrap();

        let body: serde_json::Value = client(&mock_server).execute(request).await.unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_error_body_message_is_used() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/contacts/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "success": false,
                "message": "Contact not found in directory",
                "error": "NOT_FOUND"
            })))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .get::<serde_json::Value>("/api/contacts/missing")
            .await
            .unwrap_err();

        let api = err.as_api().expect("api error");
        assert_eq!(api.status(), 404);
        assert_eq!(api.message(), "Contact not found in directory");
        assert_eq!(
            api.response().and_then(|b| b.error.as_ref()).and_then(|e| e.as_str()),
            Some("NOT_FOUND")
        );
    }

    #[tokio::test]
    async fn test_error_message_survives_structured_detail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/contacts"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "Limit must be between 1 and 100",
                "error": { "field": "limit" }
            })))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .get::<serde_json::Value>("/api/contacts")
            .await
            .unwrap_err();

        let api = err.as_api().expect("api error");
        assert_eq!(api.status(), 400);
        assert_eq!(api.message(), "Limit must be between 1 and 100");
        let detail = api.response().and_then(|b| b.error.clone()).unwrap();
        assert_eq!(detail["field"], "limit");
    }

    #[test]
    fn test_error_message_read_from_any_body_shape() {
        let (message, body) =
            error_details(br#"{"message":"Invalid filter","success":"no"}"#, true);
        assert_eq!(message.as_deref(), Some("Invalid filter"));
        assert!(body.is_none());

        let (message, _) = error_details(br#"{"message":"Invalid filter"}"#, false);
        assert!(message.is_none());
    }

    #[tokio::test]
    async fn test_unparseable_error_body_falls_back_to_generic_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(
                ResponseTemplate::new(502).set_body_raw("<html>bad gateway</html>", "application/json"),
            )
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .get::<serde_json::Value>("/broken")
            .await
            .unwrap_err();

        let api = err.as_api().expect("api error");
        assert_eq!(api.status(), 502);
        assert_eq!(api.message(), "HTTP error! status: 502");
        assert!(api.response().is_none());
    }

    #[tokio::test]
    async fn test_slow_response_times_out_as_408() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let config = ClientConfig::new(mock_server.uri()).with_timeout(Duration::from_millis(50));
        let client = ApiClient::new(&config).unwrap();

        let err = client.get::<serde_json::Value>("/slow").await.unwrap_err();
        assert_eq!(err.status(), Some(408));
        assert_eq!(err.to_string(), "Request timeout");
    }

    #[tokio::test]
    async fn test_connection_refused_is_unclassified() {
        // Nothing listens on port 9 on a test machine.
        let client = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9")).unwrap();

        let err = client.get::<serde_json::Value>("/api/contacts").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_delete_ignores_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/contacts/c9"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true, "message": "Deleted"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let result: Result<IgnoredAny> = client(&mock_server).delete("/api/contacts/c9").await;
        assert!(result.is_ok());
    }
}
