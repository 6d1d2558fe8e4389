// Core domain types shared across the Quire crates.
//
// Wire format is JSON with camelCase multi-word field names; these types
// are the external contract of the HTTP API and are persisted verbatim
// (the tab tree is stored as one JSON document per title).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document: the top-level persisted entity, uniquely keyed by title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Primary key. Immutable once created.
    pub title: String,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Ordered tabs. Tabs are addressed by position; there is no stable tab id.
    #[serde(default)]
    pub content: Vec<Tab>,
    #[serde(default)]
    pub archived: bool,
}

/// List-view projection of a [`Document`] with the tab tree omitted.
///
/// List responses never include block bodies, to bound payload size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub title: String,
    pub creator: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub archived: bool,
}

impl From<&Document> for DocumentMeta {
    fn from(document: &Document) -> Self {
        Self {
            title: document.title.clone(),
            creator: document.creator.clone(),
            created_at: document.created_at,
            updated_at: document.updated_at,
            archived: document.archived,
        }
    }
}

/// An ordered, owned sub-collection of blocks within a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Blank on input means "assign my 1-based position when added".
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text_blocks: Vec<Block>,
}

impl Tab {
    /// A tab with the given title and no blocks.
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: title.into(), text_blocks: Vec::new() }
    }
}

/// A single authored content unit (text or code) within a tab.
///
/// Only `content`, `updated_at` and `updated_by` mutate after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Generated identifier, unique within its tab.
    pub id: String,
    /// Filtered text. A filter response without a payload is stored as null.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Code vs. prose.
    #[serde(default)]
    pub code: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

/// Body of the block-update endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlockUpdateRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub username: String,
}

/// Outbound payload for the content-filter service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub text: String,
}

/// Response from the content-filter service. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResponse {
    /// Carried on the wire but not consulted by the service.
    #[serde(default)]
    pub valid: bool,
    /// Absent means "no filtering occurred"; the caller stores it as-is.
    #[serde(default)]
    pub filtered_text: Option<String>,
}
