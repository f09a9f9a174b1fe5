use serde::{Deserialize, Serialize};

use crate::enums::Period;

/// A cached research brief, as read back from either cache backend.
///
/// `created_at` stays textual (UTC, RFC 3339) because freshness checks must
/// fail open on values that no longer parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Digest {
    pub id: String,
    pub topic: String,
    pub days: i64,
    pub summary: String,
    pub clusters_json: String,
    pub audio_url: Option<String>,
    pub top_k: i64,
    pub period: Period,
    pub voice: bool,
    pub created_at: String,
}

/// A digest about to be written. The store stamps `created_at` itself on
/// every save — last write wins, there is no first-created tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDigest {
    pub id: String,
    pub topic: String,
    pub days: i64,
    pub summary: String,
    pub clusters_json: String,
    pub audio_url: Option<String>,
    pub top_k: i64,
    pub period: Period,
    pub voice: bool,
}

/// One labeled cluster inside a digest, serialized as `clusters_json`.
///
/// Field casing matches the JSON contract the labeling prompt asks the model
/// to produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledCluster {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(rename = "topPapers", default)]
    pub top_papers: Vec<TopPaper>,
}

/// A highlighted paper inside a labeled cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopPaper {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
}
