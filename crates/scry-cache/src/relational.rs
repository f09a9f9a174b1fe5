//! Relational cache backend over the libSQL store.

use std::sync::Arc;

use chrono::Utc;

use scry_core::entities::{Digest, NewDigest};
use scry_core::enums::Period;
use scry_db::ScryDb;

use crate::error::CacheError;
use crate::freshness::within_ttl;

/// Digest cache backed by the `digests` table.
#[derive(Debug)]
pub struct RelationalCache {
    db: Arc<ScryDb>,
}

impl RelationalCache {
    #[must_use]
    pub fn new(db: Arc<ScryDb>) -> Self {
        Self { db }
    }

    /// Full upsert by digest identity.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Database`] if the write fails.
    pub async fn save(&self, new: &NewDigest) -> Result<(), CacheError> {
        self.db.save_digest(new).await?;
        Ok(())
    }

    /// Most recent digest for `(topic, days)`, regardless of parameters or age.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Database`] if the lookup fails.
    pub async fn get_latest(&self, topic: &str, days: i64) -> Result<Option<Digest>, CacheError> {
        Ok(self.db.get_latest_digest(topic, days).await?)
    }

    /// Digest matching all request parameters and still within its TTL.
    /// Stale and missing are both `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Database`] if the lookup fails.
    pub async fn get_cached(
        &self,
        topic: &str,
        days: i64,
        top_k: i64,
        period: Period,
        voice: bool,
        ttl_hours: i64,
    ) -> Result<Option<Digest>, CacheError> {
        let row = self
            .db
            .get_digest_matching(topic, days, top_k, period, voice)
            .await?;
        Ok(row.filter(|d| within_ttl(&d.created_at, ttl_hours, Utc::now())))
    }
}
