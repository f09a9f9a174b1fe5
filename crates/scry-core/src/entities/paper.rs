use serde::{Deserialize, Serialize};

/// Denormalized metadata for one paper identity.
///
/// Upserts merge field by field: an absent field in a later write never
/// clobbers a stored non-null value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperMeta {
    pub id: String,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<String>,
    pub external_id: Option<String>,
    pub doi: Option<String>,
    pub raw_json: Option<serde_json::Value>,
    pub citations_synced_at: Option<String>,
    pub cited_by_count: Option<i64>,
    pub referenced_count: Option<i64>,
}

/// A paper reference handed to the citation sync engine.
///
/// Accepts the id under the aliases upstream payloads use; the engine
/// normalizes it before treating it as a paper identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperRef {
    #[serde(alias = "paper_id", alias = "arxivId")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(alias = "published", default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}
