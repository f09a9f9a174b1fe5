//! # scry-cache
//!
//! Dual-backend digest cache for Scry.
//!
//! The same three operations — `save`, `get_latest`, `get_cached` — run over
//! either the libSQL store or a document+metadata collection. The backend is
//! chosen exactly once at process start from configuration; nothing outside
//! this crate ever branches on it, and the two backends are observably
//! identical apart from latency and failure mode.

pub mod chroma;
pub mod error;
mod freshness;
pub mod relational;
pub mod vector;

#[cfg(test)]
mod memory;

pub use error::CacheError;
pub use relational::RelationalCache;
pub use vector::{DocumentCollection, StoredDocument, VectorCache};

use std::sync::Arc;

use scry_config::{CacheBackend, ScryConfig};
use scry_core::entities::{Digest, NewDigest};
use scry_core::enums::Period;
use scry_db::ScryDb;

use crate::chroma::ChromaCollection;

/// The digest cache facade.
///
/// Holds whichever backend the configuration selected. All delegation lives
/// in the match arms below — the one place in the tree allowed to know there
/// are two backends.
#[derive(Debug)]
pub enum DigestCache {
    Relational(RelationalCache),
    Vector(VectorCache<ChromaCollection>),
}

impl DigestCache {
    /// Build the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Config`] when the vector backend is selected
    /// without a Chroma URL, or [`CacheError`] when the collection cannot be
    /// resolved. Fatal at startup, not retried.
    pub async fn from_config(config: &ScryConfig, db: Arc<ScryDb>) -> Result<Self, CacheError> {
        tracing::debug!(backend = ?config.cache.backend, "selecting digest cache backend");
        match config.cache.backend {
            CacheBackend::Relational => Ok(Self::Relational(RelationalCache::new(db))),
            CacheBackend::Vector => {
                let collection = ChromaCollection::connect(&config.chroma).await?;
                Ok(Self::Vector(VectorCache::new(collection)))
            }
        }
    }

    /// Full upsert by digest identity; `created_at` is stamped on every save.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the active backend fails the write.
    pub async fn save(&self, new: &NewDigest) -> Result<(), CacheError> {
        match self {
            Self::Relational(cache) => cache.save(new).await,
            Self::Vector(cache) => cache.save(new).await,
        }
    }

    /// Most recent digest for `(topic, days)`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the active backend fails the read.
    pub async fn get_latest(&self, topic: &str, days: i64) -> Result<Option<Digest>, CacheError> {
        match self {
            Self::Relational(cache) => cache.get_latest(topic, days).await,
            Self::Vector(cache) => cache.get_latest(topic, days).await,
        }
    }

    /// Digest matching every request parameter and still fresh, or `None`.
    /// Callers cannot distinguish "stale" from "never existed".
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the active backend fails the read.
    pub async fn get_cached(
        &self,
        topic: &str,
        days: i64,
        top_k: i64,
        period: Period,
        voice: bool,
        ttl_hours: i64,
    ) -> Result<Option<Digest>, CacheError> {
        match self {
            Self::Relational(cache) => {
                cache
                    .get_cached(topic, days, top_k, period, voice, ttl_hours)
                    .await
            }
            Self::Vector(cache) => {
                cache
                    .get_cached(topic, days, top_k, period, voice, ttl_hours)
                    .await
            }
        }
    }
}
