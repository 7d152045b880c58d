//! Documents published by the external document source.

use serde::{Deserialize, Serialize};

/// A document link shown in the directory.
///
/// Every field is always populated: the documents service fills anything
/// the upstream source left out with an empty string or zero, so consumers
/// never deal with missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub description: String,
    /// External URL of the document.
    pub link: String,
    pub uploaded_by: String,
    pub created_at: String,
    pub updated_at: String,
    /// Upstream revision counter.
    pub version: u64,
}
