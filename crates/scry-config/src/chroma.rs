//! Chroma document-store configuration (vector cache backend).

use serde::{Deserialize, Serialize};

fn default_tenant() -> String {
    "default_tenant".to_string()
}

fn default_database() -> String {
    "default_database".to_string()
}

fn default_collection() -> String {
    "digests".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChromaConfig {
    /// Base URL of the Chroma server (e.g. `https://api.trychroma.com`).
    #[serde(default)]
    pub url: String,

    /// API key sent as `x-chroma-token`. Empty for unauthenticated servers.
    #[serde(default)]
    pub api_key: String,

    /// Tenant path segment.
    #[serde(default = "default_tenant")]
    pub tenant: String,

    /// Database path segment.
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection holding digest documents.
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for ChromaConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            tenant: default_tenant(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

impl ChromaConfig {
    /// Check whether the vector backend can be reached at all.
    ///
    /// Required when `cache.backend = "vector"`; a missing URL is fatal at
    /// startup, not retried.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = ChromaConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.tenant, "default_tenant");
        assert_eq!(config.collection, "digests");
    }

    #[test]
    fn configured_when_url_set() {
        let config = ChromaConfig {
            url: "http://localhost:8000".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }
}
