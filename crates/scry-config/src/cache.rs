//! Digest cache configuration, including the backend selector.

use serde::{Deserialize, Serialize};

/// Default digest cache TTL in hours.
const fn default_ttl_hours() -> i64 {
    6
}

/// Default libSQL database path.
fn default_db_path() -> String {
    "scry.db".to_string()
}

/// Which storage backend serves the digest cache.
///
/// Chosen once at process start; the rest of the tree only ever talks to the
/// cache facade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    #[default]
    Relational,
    Vector,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Storage backend for cached digests.
    #[serde(default)]
    pub backend: CacheBackend,

    /// Path to the libSQL database file.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Digest freshness window in hours. Zero or negative disables TTL
    /// filtering entirely.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            db_path: default_db_path(),
            ttl_hours: default_ttl_hours(),
        }
    }
}
