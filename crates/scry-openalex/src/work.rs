//! OpenAlex work records and field extraction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A work record from the OpenAlex `/works` endpoints.
///
/// Only the fields Scry reads are typed; everything else is captured in
/// `extra` so the full payload can be persisted as provenance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Work {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i64>,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub ids: WorkIds,
    #[serde(default)]
    pub authorships: Vec<Authorship>,
    #[serde(default)]
    pub primary_location: Option<Location>,
    #[serde(default)]
    pub open_access: Option<OpenAccess>,
    #[serde(default)]
    pub referenced_works: Vec<String>,
    #[serde(default)]
    pub cited_by_count: Option<i64>,
    #[serde(default)]
    pub referenced_works_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_inverted_index: Option<HashMap<String, Vec<usize>>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Alternate identifiers attached to a work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkIds {
    #[serde(default)]
    pub arxiv: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Authorship {
    #[serde(default)]
    pub author: Author,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub landing_page_url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAccess {
    #[serde(default)]
    pub oa_url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Work {
    /// Comma-joined author display names, or `None` when no names are known.
    #[must_use]
    pub fn author_names(&self) -> Option<String> {
        let names: Vec<&str> = self
            .authorships
            .iter()
            .filter_map(|a| a.author.display_name.as_deref())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }

    /// Best available landing URL: primary location, then open-access URL,
    /// then the OpenAlex id itself.
    #[must_use]
    pub fn best_url(&self) -> Option<String> {
        self.primary_location
            .as_ref()
            .and_then(|l| l.landing_page_url.clone())
            .or_else(|| self.open_access.as_ref().and_then(|o| o.oa_url.clone()))
            .or_else(|| {
                if self.id.is_empty() {
                    None
                } else {
                    Some(self.id.clone())
                }
            })
    }

    /// Publication date if present, otherwise the year as text.
    #[must_use]
    pub fn published(&self) -> Option<String> {
        self.publication_date
            .clone()
            .or_else(|| self.publication_year.map(|y| y.to_string()))
    }

    /// Reconstruct the abstract from its inverted index.
    ///
    /// OpenAlex ships abstracts as word → positions; re-ordering by position
    /// recovers the original text. Returns `None` when no index is present
    /// or it is empty.
    #[must_use]
    pub fn abstract_text(&self) -> Option<String> {
        let index = self.abstract_inverted_index.as_ref()?;
        let mut positioned: Vec<(usize, &str)> = Vec::new();
        for (word, positions) in index {
            for &pos in positions {
                positioned.push((pos, word.as_str()));
            }
        }
        if positioned.is_empty() {
            return None;
        }
        positioned.sort_unstable();
        Some(
            positioned
                .into_iter()
                .map(|(_, word)| word)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}
