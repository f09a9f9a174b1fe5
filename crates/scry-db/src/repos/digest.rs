//! Digest repository — upsert and lookup for cached research briefs.
//!
//! A digest identity is unique per `(topic, days)`, so `INSERT OR REPLACE`
//! keeps exactly one row per identity. The `created_at DESC` ordering in the
//! lookups is belt-and-braces for that invariant.

use chrono::Utc;

use scry_core::entities::{Digest, NewDigest};
use scry_core::enums::Period;

use crate::ScryDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_enum};

fn row_to_digest(row: &libsql::Row) -> Result<Digest, DatabaseError> {
    Ok(Digest {
        id: row.get::<String>(0)?,
        topic: row.get::<String>(1)?,
        days: row.get::<i64>(2)?,
        summary: row.get::<String>(3)?,
        clusters_json: row.get::<String>(4)?,
        audio_url: get_opt_string(row, 5)?,
        top_k: row.get::<i64>(6)?,
        period: parse_enum(&row.get::<String>(7)?)?,
        voice: row.get::<i64>(8)? != 0,
        created_at: row.get::<String>(9)?,
    })
}

const DIGEST_COLUMNS: &str =
    "id, topic, days, summary, clusters_json, audio_url, top_k, period, voice, created_at";

impl ScryDb {
    /// Full upsert by digest identity. Stamps `created_at = now` (UTC,
    /// RFC 3339) on every save, replacements included.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the statement fails.
    pub async fn save_digest(&self, new: &NewDigest) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO digests
                   (id, topic, days, summary, clusters_json, audio_url, top_k, period, voice, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                libsql::params![
                    new.id.as_str(),
                    new.topic.as_str(),
                    new.days,
                    new.summary.as_str(),
                    new.clusters_json.as_str(),
                    new.audio_url.clone(),
                    new.top_k,
                    new.period.as_str(),
                    i64::from(new.voice),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// Most recently created digest for exactly `(topic, days)`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row cannot be parsed.
    pub async fn get_latest_digest(
        &self,
        topic: &str,
        days: i64,
    ) -> Result<Option<Digest>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {DIGEST_COLUMNS} FROM digests
                     WHERE topic = ?1 AND days = ?2
                     ORDER BY created_at DESC LIMIT 1"
                ),
                libsql::params![topic, days],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_digest(&row)?)),
            None => Ok(None),
        }
    }

    /// Newest digest matching `(topic, days)` and all request parameters
    /// exactly, or `None`. Freshness filtering happens above the store so
    /// both cache backends share one TTL implementation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row cannot be parsed.
    pub async fn get_digest_matching(
        &self,
        topic: &str,
        days: i64,
        top_k: i64,
        period: Period,
        voice: bool,
    ) -> Result<Option<Digest>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {DIGEST_COLUMNS} FROM digests
                     WHERE topic = ?1 AND days = ?2 AND top_k = ?3 AND period = ?4 AND voice = ?5
                     ORDER BY created_at DESC LIMIT 1"
                ),
                libsql::params![topic, days, top_k, period.as_str(), i64::from(voice)],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_digest(&row)?)),
            None => Ok(None),
        }
    }
}
