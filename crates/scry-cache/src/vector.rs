//! Vector-store cache backend: digests as documents with metadata.
//!
//! The adapter reproduces the relational semantics over any
//! [`DocumentCollection`]: the summary is the document body, everything else
//! rides in metadata. Metadata is heterogeneous JSON written by multiple
//! service generations, so every read normalizes missing and oddly-typed
//! values to the same defaults the relational store gives legacy rows.

use chrono::Utc;
use serde_json::{Map, Value};

use scry_core::entities::{Digest, NewDigest};
use scry_core::enums::Period;
use scry_core::identity::build_digest_id;

use crate::error::CacheError;
use crate::freshness::within_ttl;

/// One digest document with attached key/value metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    /// Document body — the digest summary.
    pub document: String,
    pub metadata: Map<String, Value>,
}

/// Minimal document-store surface the adapter needs.
///
/// Production uses the Chroma HTTP API; tests use an in-memory map.
pub trait DocumentCollection {
    /// Insert or replace a document by id.
    fn upsert(
        &self,
        doc: StoredDocument,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Fetch a document by id, or `None` when absent.
    fn get(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<StoredDocument>, CacheError>> + Send;
}

/// Digest cache backed by a document+metadata collection.
#[derive(Debug)]
pub struct VectorCache<C: DocumentCollection> {
    collection: C,
}

impl<C: DocumentCollection> VectorCache<C> {
    #[must_use]
    pub const fn new(collection: C) -> Self {
        Self { collection }
    }

    /// Full upsert by digest identity. Stamps `created_at = now` in metadata
    /// on every save.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the collection write fails.
    pub async fn save(&self, new: &NewDigest) -> Result<(), CacheError> {
        let mut metadata = Map::new();
        metadata.insert("topic".into(), Value::from(new.topic.clone()));
        metadata.insert("days".into(), Value::from(new.days));
        metadata.insert("clusters_json".into(), Value::from(new.clusters_json.clone()));
        if let Some(url) = &new.audio_url {
            metadata.insert("audio_url".into(), Value::from(url.clone()));
        }
        metadata.insert("top_k".into(), Value::from(new.top_k));
        metadata.insert("period".into(), Value::from(new.period.as_str()));
        metadata.insert("voice".into(), Value::from(new.voice));
        metadata.insert("created_at".into(), Value::from(Utc::now().to_rfc3339()));

        self.collection
            .upsert(StoredDocument {
                id: new.id.clone(),
                document: new.summary.clone(),
                metadata,
            })
            .await
    }

    /// Most recent digest for `(topic, days)`.
    ///
    /// Fetches by derived id, then requires the stored `topic` and `days`
    /// metadata to echo the query exactly — this backend indexes arbitrary
    /// content, so an id hit alone does not prove identity.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the collection read fails.
    pub async fn get_latest(&self, topic: &str, days: i64) -> Result<Option<Digest>, CacheError> {
        let id = build_digest_id(topic, days);
        let Some(digest) = self.get_by_id(&id).await? else {
            return Ok(None);
        };
        if digest.topic == topic && digest.days == days {
            Ok(Some(digest))
        } else {
            Ok(None)
        }
    }

    /// Digest matching all request parameters and still within its TTL.
    /// Stale and missing are both `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the collection read fails.
    pub async fn get_cached(
        &self,
        topic: &str,
        days: i64,
        top_k: i64,
        period: Period,
        voice: bool,
        ttl_hours: i64,
    ) -> Result<Option<Digest>, CacheError> {
        let id = build_digest_id(topic, days);
        let Some(digest) = self.get_by_id(&id).await? else {
            return Ok(None);
        };
        if digest.top_k != top_k || digest.period != period || digest.voice != voice {
            return Ok(None);
        }
        if within_ttl(&digest.created_at, ttl_hours, Utc::now()) {
            Ok(Some(digest))
        } else {
            Ok(None)
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Digest>, CacheError> {
        Ok(self.collection.get(id).await?.map(extract_digest))
    }
}

/// Normalize a stored document into a digest, applying legacy defaults for
/// missing or heterogeneous metadata.
fn extract_digest(doc: StoredDocument) -> Digest {
    let meta = &doc.metadata;
    Digest {
        id: doc.id,
        topic: meta_str(meta, "topic").unwrap_or_default(),
        days: meta_i64(meta, "days").unwrap_or(0),
        summary: doc.document,
        clusters_json: meta_str(meta, "clusters_json").unwrap_or_else(|| "[]".to_string()),
        audio_url: meta_str(meta, "audio_url"),
        top_k: meta_i64(meta, "top_k").unwrap_or(5),
        period: meta_str(meta, "period")
            .and_then(|s| s.parse::<Period>().ok())
            .unwrap_or_default(),
        voice: meta.get("voice").and_then(Value::as_bool).unwrap_or(false),
        created_at: meta_str(meta, "created_at").unwrap_or_default(),
    }
}

fn meta_str(meta: &Map<String, Value>, key: &str) -> Option<String> {
    meta.get(key).and_then(Value::as_str).map(String::from)
}

/// Integer metadata may come back as an integer or a float depending on who
/// wrote the document.
fn meta_i64(meta: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = meta.get(key)?;
    #[allow(clippy::cast_possible_truncation)]
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCollection;
    use pretty_assertions::assert_eq;

    fn sample(topic: &str, days: i64) -> NewDigest {
        NewDigest {
            id: build_digest_id(topic, days),
            topic: topic.to_string(),
            days,
            summary: "## Weekly brief".to_string(),
            clusters_json: "[{\"label\":\"x\"}]".to_string(),
            audio_url: None,
            top_k: 5,
            period: Period::Weekly,
            voice: false,
        }
    }

    fn test_cache() -> VectorCache<MemoryCollection> {
        VectorCache::new(MemoryCollection::default())
    }

    #[tokio::test]
    async fn save_then_latest_roundtrip() {
        let cache = test_cache();
        cache.save(&sample("llm agents", 7)).await.unwrap();

        let found = cache.get_latest("llm agents", 7).await.unwrap().unwrap();
        assert_eq!(found.topic, "llm agents");
        assert_eq!(found.summary, "## Weekly brief");
        assert_eq!(found.clusters_json, "[{\"label\":\"x\"}]");
        assert!(!found.created_at.is_empty());
    }

    #[tokio::test]
    async fn latest_rejects_identity_echo_mismatch() {
        let cache = test_cache();
        cache.save(&sample("llm agents", 7)).await.unwrap();

        // Plant a document under the id another query would derive: the
        // stored topic/days no longer echo that query, so it must read as
        // absent.
        let stray = StoredDocument {
            id: build_digest_id("quantum computing", 7),
            document: "wrong".to_string(),
            metadata: {
                let mut m = Map::new();
                m.insert("topic".into(), Value::from("llm agents"));
                m.insert("days".into(), Value::from(7));
                m
            },
        };
        cache.collection.upsert(stray).await.unwrap();

        assert!(
            cache
                .get_latest("quantum computing", 7)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn cached_rejects_parameter_mismatch() {
        let cache = test_cache();
        cache.save(&sample("llm agents", 7)).await.unwrap();

        for (top_k, period, voice) in [
            (8, Period::Weekly, false),
            (5, Period::Monthly, false),
            (5, Period::Weekly, true),
        ] {
            let miss = cache
                .get_cached("llm agents", 7, top_k, period, voice, 6)
                .await
                .unwrap();
            assert!(miss.is_none(), "({top_k}, {period}, {voice}) must miss");
        }

        let hit = cache
            .get_cached("llm agents", 7, 5, Period::Weekly, false, 6)
            .await
            .unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn sparse_metadata_gets_defaults() {
        let cache = test_cache();
        // A document written before the optional parameters existed.
        let doc = StoredDocument {
            id: build_digest_id("llm agents", 7),
            document: "old summary".to_string(),
            metadata: {
                let mut m = Map::new();
                m.insert("topic".into(), Value::from("llm agents"));
                m.insert("days".into(), Value::from(7));
                m
            },
        };
        cache.collection.upsert(doc).await.unwrap();

        let found = cache.get_latest("llm agents", 7).await.unwrap().unwrap();
        assert_eq!(found.top_k, 5);
        assert_eq!(found.period, Period::Weekly);
        assert!(!found.voice);
        assert_eq!(found.clusters_json, "[]");
        assert_eq!(found.audio_url, None);

        // Legacy defaults satisfy a default-parameter lookup; missing
        // created_at fails open.
        let hit = cache
            .get_cached("llm agents", 7, 5, Period::Weekly, false, 6)
            .await
            .unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn float_encoded_numbers_are_accepted() {
        let cache = test_cache();
        let doc = StoredDocument {
            id: build_digest_id("llm agents", 7),
            document: "summary".to_string(),
            metadata: {
                let mut m = Map::new();
                m.insert("topic".into(), Value::from("llm agents"));
                m.insert("days".into(), Value::from(7.0));
                m.insert("top_k".into(), Value::from(5.0));
                m.insert("period".into(), Value::from("weekly"));
                m.insert("voice".into(), Value::from(false));
                m
            },
        };
        cache.collection.upsert(doc).await.unwrap();

        let hit = cache
            .get_cached("llm agents", 7, 5, Period::Weekly, false, 0)
            .await
            .unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn expired_document_reads_as_missing() {
        let cache = test_cache();
        cache.save(&sample("llm agents", 7)).await.unwrap();

        let id = build_digest_id("llm agents", 7);
        let mut doc = cache.collection.get(&id).await.unwrap().unwrap();
        doc.metadata.insert(
            "created_at".into(),
            Value::from("2000-01-01T00:00:00+00:00"),
        );
        cache.collection.upsert(doc).await.unwrap();

        assert!(
            cache
                .get_cached("llm agents", 7, 5, Period::Weekly, false, 6)
                .await
                .unwrap()
                .is_none()
        );
        // TTL disabled still hits.
        assert!(
            cache
                .get_cached("llm agents", 7, 5, Period::Weekly, false, 0)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn unparsable_created_at_fails_open() {
        let cache = test_cache();
        cache.save(&sample("llm agents", 7)).await.unwrap();

        let id = build_digest_id("llm agents", 7);
        let mut doc = cache.collection.get(&id).await.unwrap().unwrap();
        doc.metadata
            .insert("created_at".into(), Value::from("garbage"));
        cache.collection.upsert(doc).await.unwrap();

        assert!(
            cache
                .get_cached("llm agents", 7, 5, Period::Weekly, false, 6)
                .await
                .unwrap()
                .is_some()
        );
    }
}
