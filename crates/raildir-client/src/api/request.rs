//! # API Requests
//!
//! Requests described as plain data before they reach the transport.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;

use crate::error::{Error, Result};

/// One outbound call: method, endpoint, query, optional JSON body and any
/// per-call headers that override the client defaults.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(&'static str, String)>,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) headers: HeaderMap,
}

impl ApiRequest {
    /// Creates a request for `path`, which is either relative to the base
    /// URL or an absolute `http(s)` URL used unchanged.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Appends `values` as one comma-joined parameter, or nothing when
    /// `values` is empty.
    #[must_use]
    pub fn query_list(mut self, key: &'static str, values: &[String]) -> Self {
        if !values.is_empty() {
            self.query.push((key, values.join(",")));
        }
        self
    }

    /// Sets a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| Error::InvalidRequest(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Adds a per-call header, replacing a default header of the same name.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Adds every header in `headers`, replacing defaults of the same name.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query_pairs(&self) -> &[(&'static str, String)] {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_list_joins_with_commas() {
        let request = ApiRequest::get("/api/contacts/filter")
            .query_list("bloodGroup", &["A+".to_string(), "B+".to_string()])
            .query_list("lobby", &[])
            .query("page", 1);

        assert_eq!(
            request.query_pairs(),
            &[("bloodGroup", "A+,B+".to_string()), ("page", "1".to_string())]
        );
    }

    #[test]
    fn test_json_body() {
        let request = ApiRequest::post("/api/analytics/visits")
            .json(&serde_json::json!({}))
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.body, Some(serde_json::json!({})));
    }
}
