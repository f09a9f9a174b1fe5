//! OpenAlex client and citation-sync configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://api.openalex.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_citation_ttl_hours() -> i64 {
    24
}

const fn default_max_references() -> usize {
    4
}

const fn default_max_cited_by() -> usize {
    4
}

const fn default_batch_size() -> usize {
    25
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAlexConfig {
    /// OpenAlex API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Contact address appended as the `mailto` query parameter (polite pool).
    #[serde(default)]
    pub mailto: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Hours before a paper's citation data counts as stale.
    #[serde(default = "default_citation_ttl_hours")]
    pub citation_ttl_hours: i64,

    /// Referenced works fetched per paper refresh.
    #[serde(default = "default_max_references")]
    pub max_references: usize,

    /// Citing works fetched per paper refresh.
    #[serde(default = "default_max_cited_by")]
    pub max_cited_by: usize,

    /// Ids per chunk in bulk work lookups (upstream query-size limit).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for OpenAlexConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            mailto: String::new(),
            timeout_secs: default_timeout_secs(),
            citation_ttl_hours: default_citation_ttl_hours(),
            max_references: default_max_references(),
            max_cited_by: default_max_cited_by(),
            batch_size: default_batch_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = OpenAlexConfig::default();
        assert_eq!(config.base_url, "https://api.openalex.org");
        assert!(config.mailto.is_empty());
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.citation_ttl_hours, 24);
        assert_eq!(config.max_references, 4);
        assert_eq!(config.max_cited_by, 4);
        assert_eq!(config.batch_size, 25);
    }
}
