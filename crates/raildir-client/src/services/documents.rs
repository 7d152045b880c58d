//! # Documents Service
//!
//! Documents come from an external source that sits outside the directory
//! API and does not keep a stable schema. Every record passes through
//! [`normalize_document`] before it leaves this module, so the rest of the
//! client only ever sees fully populated [`Document`] values.

use raildir_types::Document;
use serde_json::{Map, Value};

use crate::api::{ApiClient, ApiRequest};
use crate::config::ClientConfig;
use crate::error::{Error, Result};

const INVALID_COUNT: &str = "Invalid response format for documents count";

/// Service for the external document source.
#[derive(Clone)]
pub struct DocumentsService {
    client: ApiClient,
    documents_url: Option<String>,
    count_url: Option<String>,
    title_marker: Option<String>,
}

impl DocumentsService {
    /// Creates a service reading the URLs and title marker from `config`.
    pub fn new(client: ApiClient, config: &ClientConfig) -> Self {
        Self {
            client,
            documents_url: config.documents_url.clone(),
            count_url: config.documents_count_url(),
            title_marker: config
                .document_title_marker
                .clone()
                .filter(|marker| !marker.is_empty()),
        }
    }

    /// All documents, normalized.
    ///
    /// When a title marker is configured only documents whose title contains
    /// it are returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no documents URL is configured;
    /// otherwise propagates transport and API errors.
    pub async fn get_documents(&self) -> Result<Vec<Document>> {
        let url = required(self.documents_url.as_deref(), "documents URL")?;
        let body: Value = self.client.execute(ApiRequest::get(url)).await?;

        let documents: Vec<Document> = document_records(&body)
            .iter()
            .map(normalize_document)
            .filter(|doc| match &self.title_marker {
                Some(marker) => doc.title.contains(marker.as_str()),
                None => true,
            })
            .collect();

        tracing::debug!(count = documents.len(), "Fetched documents");
        Ok(documents)
    }

    /// Number of documents held by the source.
    ///
    /// Accepts `{ count }`, a bare number or `{ total }`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResponse`] for any other shape,
    /// [`Error::Config`] when no count URL is configured, and propagates
    /// transport and API errors.
    pub async fn get_documents_count(&self) -> Result<u64> {
        let url = required(self.count_url.as_deref(), "documents count URL")?;
        let body: Value = self.client.execute(ApiRequest::get(url)).await?;

        body.get("count")
            .and_then(Value::as_u64)
            .or_else(|| body.as_u64())
            .or_else(|| body.get("total").and_then(Value::as_u64))
            .ok_or_else(|| Error::InvalidResponse(INVALID_COUNT.to_string()))
    }
}

fn required<'a>(url: Option<&'a str>, what: &str) -> Result<&'a str> {
    url.ok_or_else(|| Error::Config(format!("{what} is not configured")))
}

/// Items of a `{ data: [...] }` envelope or a bare array. Anything else
/// yields no records.
fn document_records(body: &Value) -> &[Value] {
    let list = match body {
        Value::Object(map) if map.contains_key("data") => &map["data"],
        other => other,
    };
    list.as_array().map(Vec::as_slice).unwrap_or_default()
}

/// Maps one untyped record to a [`Document`].
///
/// Both current and legacy key names are accepted. Missing or mistyped
/// fields become an empty string or zero; numeric ids and titles are
/// rendered as strings.
pub fn normalize_document(record: &Value) -> Document {
    let empty = Map::new();
    let fields = record.as_object().unwrap_or(&empty);

    Document {
        id: text(fields, &["id", "_id"]),
        title: text(fields, &["title", "doc_title"]),
        description: text(fields, &["description", "doc_discription", "doc_description"]),
        link: text(fields, &["link", "doc_link"]),
        uploaded_by: text(fields, &["uploadedBy", "doc_uploaded_by"]),
        created_at: text(fields, &["createdAt"]),
        updated_at: text(fields, &["updatedAt"]),
        version: number(fields, &["version", "__v"]),
    }
}

fn text(fields: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| match fields.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn number(fields: &Map<String, Value>, keys: &[&str]) -> u64 {
    keys.iter()
        .find_map(|key| match fields.get(*key) {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
        .unwrap_or_default()
}

/// Client-side title search over already fetched documents.
///
/// Case-insensitive; a blank query returns every document.
pub fn filter_by_title<'a>(documents: &'a [Document], query: &str) -> Vec<&'a Document> {
    let needle = query.trim().to_lowercase();
    documents
        .iter()
        .filter(|doc| needle.is_empty() || doc.title.to_lowercase().contains(&needle))
        .collect()
}
