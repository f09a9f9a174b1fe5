//! # scry-citations
//!
//! Citation-graph sync engine for Scry.
//!
//! Driven entirely by staleness: callers hand over the papers a digest
//! references, the engine normalizes and deduplicates their identities,
//! upserts placeholder metadata, and refreshes citation data for whatever is
//! unknown or stale. A refresh replaces the paper's outbound edge set
//! wholesale — edges never accumulate across syncs.
//!
//! Fetch failures degrade per paper: a dead upstream for one identity stamps
//! it synced with no edges and moves on, so a batch is never held hostage by
//! its worst member.

mod convert;
mod error;
mod state;

pub use convert::work_to_metadata;
pub use error::CitationError;
pub use state::{SyncState, sync_state};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;

use scry_core::entities::{CitationEdge, PaperMeta, PaperRef};
use scry_core::enums::Relation;
use scry_core::identity::normalize_arxiv_id;
use scry_db::ScryDb;
use scry_openalex::{OpenAlexClient, Work};

/// Neighbor cap used when the caller does not specify one.
pub const DEFAULT_MAX_NEIGHBORS: usize = 6;

/// External citation-graph source.
///
/// Production is the OpenAlex client; tests substitute a stub. All methods
/// degrade rather than fail — a missing or unreachable record is `None` or
/// empty, never an error.
pub trait CitationSource {
    /// Canonical record for an arXiv id, or `None`.
    fn get_work(&self, arxiv_id: &str) -> impl Future<Output = Option<Work>> + Send;

    /// Bulk lookup by source-native (OpenAlex) ids.
    fn get_works_batch(&self, ids: &[String]) -> impl Future<Output = Vec<Work>> + Send;

    /// Works citing the given source-native id, capped at `limit`.
    fn get_cited_by(
        &self,
        openalex_id: &str,
        limit: usize,
    ) -> impl Future<Output = Vec<Work>> + Send;
}

impl CitationSource for OpenAlexClient {
    async fn get_work(&self, arxiv_id: &str) -> Option<Work> {
        Self::get_work(self, arxiv_id).await
    }

    async fn get_works_batch(&self, ids: &[String]) -> Vec<Work> {
        Self::get_works_batch(self, ids).await
    }

    async fn get_cited_by(&self, openalex_id: &str, limit: usize) -> Vec<Work> {
        Self::get_cited_by(self, openalex_id, limit).await
    }
}

/// Refresh policy knobs.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Hours before synced citation data counts as stale.
    pub ttl_hours: i64,
    /// Referenced works fetched per refresh.
    pub max_references: usize,
    /// Citing works fetched per refresh.
    pub max_cited_by: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            max_references: 4,
            max_cited_by: 4,
        }
    }
}

/// The citation sync engine.
pub struct CitationSync<S: CitationSource> {
    db: Arc<ScryDb>,
    source: S,
    settings: SyncSettings,
}

impl<S: CitationSource> CitationSync<S> {
    #[must_use]
    pub fn new(db: Arc<ScryDb>, source: S, settings: SyncSettings) -> Self {
        Self {
            db,
            source,
            settings,
        }
    }

    /// Make citation data current for every paper in `papers`.
    ///
    /// Input identities are normalized and deduplicated (first seen wins);
    /// placeholder metadata is upserted for all of them, then each paper
    /// whose state is unknown or stale gets a refresh. One paper's fetch
    /// failure never blocks its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::Database`] only for storage failures.
    pub async fn ensure_citations_for_papers(
        &self,
        papers: &[PaperRef],
    ) -> Result<(), CitationError> {
        let mut focus: Vec<PaperMeta> = Vec::new();
        let mut seen = HashSet::new();
        for paper in papers {
            let Some(normalized) = normalize_arxiv_id(&paper.id) else {
                continue;
            };
            if !seen.insert(normalized.clone()) {
                continue;
            }
            focus.push(placeholder_meta(paper, normalized));
        }
        if focus.is_empty() {
            return Ok(());
        }

        self.db.upsert_paper_metadata(&focus).await?;

        let ids: Vec<String> = focus.iter().map(|p| p.id.clone()).collect();
        let meta_map = self.db.get_paper_metadata_map(&ids).await?;
        let now = Utc::now();
        for paper in &focus {
            let state = sync_state(meta_map.get(&paper.id), now, self.settings.ttl_hours);
            if state.needs_refresh() {
                self.refresh_for_paper(paper).await?;
            }
        }
        Ok(())
    }

    /// Read-only citation context for the given roots.
    ///
    /// Returns outbound edges (capped at `max_neighbors` per root) plus a
    /// metadata map covering the roots and every neighbor those edges
    /// reference, deduplicated in first-seen order. Never triggers a
    /// refresh.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::Database`] if a read fails.
    pub async fn load_citation_context(
        &self,
        focus_ids: &[String],
        max_neighbors: usize,
    ) -> Result<(Vec<CitationEdge>, HashMap<String, PaperMeta>), CitationError> {
        let focus_clean: Vec<String> = focus_ids
            .iter()
            .filter(|id| !id.is_empty())
            .cloned()
            .collect();
        let edges = self.db.get_citation_rows(&focus_clean, max_neighbors).await?;

        let mut lookup = Vec::new();
        let mut seen = HashSet::new();
        for id in focus_clean.iter().chain(edges.iter().map(|e| &e.target_id)) {
            if seen.insert(id.clone()) {
                lookup.push(id.clone());
            }
        }
        let metadata = self.db.get_paper_metadata_map(&lookup).await?;
        Ok((edges, metadata))
    }

    /// Bring one paper to the fresh state.
    ///
    /// No canonical record still stamps `citations_synced_at` — otherwise
    /// every call would hammer the same unknown paper — and clears the edge
    /// set. A found record produces base metadata, bounded reference and
    /// cited-by fan-out, and a full edge-set replacement.
    async fn refresh_for_paper(&self, paper: &PaperMeta) -> Result<(), CitationError> {
        let now_iso = Utc::now().to_rfc3339();

        let Some(work) = self.source.get_work(&paper.id).await else {
            tracing::debug!(paper_id = %paper.id, "no canonical record; stamping sync");
            let mut stamped = paper.clone();
            stamped.citations_synced_at = Some(now_iso);
            self.db
                .upsert_paper_metadata(std::slice::from_ref(&stamped))
                .await?;
            self.db.replace_citations_for_source(&paper.id, &[]).await?;
            return Ok(());
        };

        let mut base = work_to_metadata(&work, "openalex", Some(now_iso.clone()));
        base.id = paper.id.clone();

        let reference_ids: Vec<String> = work
            .referenced_works
            .iter()
            .take(self.settings.max_references)
            .cloned()
            .collect();
        let references = self.source.get_works_batch(&reference_ids).await;
        let cited_by = self
            .source
            .get_cited_by(&work.id, self.settings.max_cited_by)
            .await;

        let mut metadata_rows = vec![base];
        let mut edges = Vec::new();
        let related = references
            .iter()
            .map(|w| (w, Relation::References, "openalex-reference"))
            .chain(
                cited_by
                    .iter()
                    .map(|w| (w, Relation::CitedBy, "openalex-cited")),
            );
        for (work, relation, label) in related {
            let meta = work_to_metadata(work, label, None);
            if meta.id.is_empty() {
                continue;
            }
            edges.push(CitationEdge::new(
                paper.id.clone(),
                meta.id.clone(),
                relation,
                "openalex",
                now_iso.clone(),
            ));
            metadata_rows.push(meta);
        }

        tracing::debug!(
            paper_id = %paper.id,
            edges = edges.len(),
            "refreshed citation set"
        );
        self.db.upsert_paper_metadata(&metadata_rows).await?;
        self.db
            .replace_citations_for_source(&paper.id, &edges)
            .await?;
        Ok(())
    }
}

/// Seed metadata for a paper we only know from the digest pipeline.
fn placeholder_meta(paper: &PaperRef, id: String) -> PaperMeta {
    PaperMeta {
        id,
        title: paper.title.clone(),
        authors: paper.authors.clone(),
        url: paper.url.clone(),
        published_at: paper.published_at.clone(),
        source: paper.source.clone().or_else(|| Some("arxiv".to_string())),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;

    /// Scriptable citation source that records its canonical lookups.
    #[derive(Default)]
    struct StubSource {
        works: HashMap<String, Work>,
        batch_works: HashMap<String, Work>,
        cited_by: HashMap<String, Vec<Work>>,
        work_calls: Mutex<Vec<String>>,
    }

    impl CitationSource for StubSource {
        async fn get_work(&self, arxiv_id: &str) -> Option<Work> {
            self.work_calls.lock().unwrap().push(arxiv_id.to_string());
            self.works.get(arxiv_id).cloned()
        }

        async fn get_works_batch(&self, ids: &[String]) -> Vec<Work> {
            ids.iter()
                .filter_map(|id| self.batch_works.get(id).cloned())
                .collect()
        }

        async fn get_cited_by(&self, openalex_id: &str, limit: usize) -> Vec<Work> {
            self.cited_by
                .get(openalex_id)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .take(limit)
                .collect()
        }
    }

    fn work(openalex_id: &str, arxiv_id: Option<&str>, referenced: &[&str]) -> Work {
        serde_json::from_value(json!({
            "id": openalex_id,
            "display_name": format!("Work {openalex_id}"),
            "ids": arxiv_id.map_or_else(
                || json!({}),
                |a| json!({"arxiv": format!("https://arxiv.org/abs/{a}")}),
            ),
            "referenced_works": referenced,
        }))
        .unwrap()
    }

    fn paper_ref(id: &str) -> PaperRef {
        PaperRef {
            id: id.to_string(),
            title: Some(format!("Paper {id}")),
            ..Default::default()
        }
    }

    async fn test_db() -> Arc<ScryDb> {
        Arc::new(ScryDb::open_local(":memory:").await.unwrap())
    }

    fn stub_with_canonical() -> StubSource {
        let mut stub = StubSource::default();
        stub.works.insert(
            "2301.00001".to_string(),
            work("https://openalex.org/W1", Some("2301.00001"), &["https://openalex.org/W2", "https://openalex.org/W3"]),
        );
        stub.batch_works.insert(
            "https://openalex.org/W2".to_string(),
            work("https://openalex.org/W2", Some("1706.03762"), &[]),
        );
        stub.batch_works.insert(
            "https://openalex.org/W3".to_string(),
            work("https://openalex.org/W3", None, &[]),
        );
        stub.cited_by.insert(
            "https://openalex.org/W1".to_string(),
            vec![work("https://openalex.org/W4", Some("2405.11111"), &[])],
        );
        stub
    }

    #[tokio::test]
    async fn unknown_paper_syncs_metadata_and_edges() {
        let db = test_db().await;
        let sync = CitationSync::new(db, stub_with_canonical(), SyncSettings::default());

        sync.ensure_citations_for_papers(&[paper_ref("https://arxiv.org/abs/2301.00001")])
            .await
            .unwrap();

        let (edges, metadata) = sync
            .load_citation_context(&["2301.00001".to_string()], DEFAULT_MAX_NEIGHBORS)
            .await
            .unwrap();

        assert_eq!(edges.len(), 3, "two references plus one cited-by");
        let reference_edges: Vec<_> = edges
            .iter()
            .filter(|e| e.relation == Relation::References)
            .collect();
        assert_eq!(reference_edges.len(), 2);
        assert!(reference_edges.iter().all(|e| e.weight == 1.0));
        let cited_edge = edges
            .iter()
            .find(|e| e.relation == Relation::CitedBy)
            .unwrap();
        assert_eq!(cited_edge.weight, 0.9);
        assert_eq!(cited_edge.target_id, "2405.11111");

        // Metadata covers the root and every neighbor, under normalized ids
        // where the related work had an arXiv presence.
        assert!(metadata.contains_key("2301.00001"));
        assert!(metadata.contains_key("1706.03762"));
        assert!(metadata.contains_key("https://openalex.org/W3"));
        assert!(metadata.contains_key("2405.11111"));
        assert!(
            metadata["2301.00001"].citations_synced_at.is_some(),
            "root is stamped fresh"
        );
    }

    #[tokio::test]
    async fn fresh_paper_is_not_refetched() {
        let db = test_db().await;
        let sync = CitationSync::new(db, stub_with_canonical(), SyncSettings::default());

        let papers = [paper_ref("2301.00001")];
        sync.ensure_citations_for_papers(&papers).await.unwrap();
        sync.ensure_citations_for_papers(&papers).await.unwrap();

        let calls = sync.source.work_calls.lock().unwrap();
        assert_eq!(calls.len(), 1, "second ensure sees fresh state");
    }

    #[tokio::test]
    async fn input_is_deduplicated_by_normalized_identity() {
        let db = test_db().await;
        let sync = CitationSync::new(db, stub_with_canonical(), SyncSettings::default());

        sync.ensure_citations_for_papers(&[
            paper_ref("https://arxiv.org/abs/2301.00001"),
            paper_ref("arxiv:2301.00001"),
            paper_ref("2301.00001.pdf"),
        ])
        .await
        .unwrap();

        let calls = sync.source.work_calls.lock().unwrap();
        assert_eq!(calls.as_slice(), ["2301.00001"]);
    }

    #[tokio::test]
    async fn missing_record_stamps_sync_and_clears_edges() {
        let db = test_db().await;
        let sync = CitationSync::new(db, StubSource::default(), SyncSettings::default());

        sync.ensure_citations_for_papers(&[paper_ref("2399.99999")])
            .await
            .unwrap();

        let (edges, metadata) = sync
            .load_citation_context(&["2399.99999".to_string()], DEFAULT_MAX_NEIGHBORS)
            .await
            .unwrap();
        assert!(edges.is_empty());
        assert!(
            metadata["2399.99999"].citations_synced_at.is_some(),
            "stamp prevents hammering an unknown paper"
        );

        // And the stamp holds: a second ensure does not refetch.
        sync.ensure_citations_for_papers(&[paper_ref("2399.99999")])
            .await
            .unwrap();
        assert_eq!(sync.source.work_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn one_missing_paper_does_not_block_siblings() {
        let db = test_db().await;
        let sync = CitationSync::new(db, stub_with_canonical(), SyncSettings::default());

        sync.ensure_citations_for_papers(&[
            paper_ref("2399.99999"), // no canonical record
            paper_ref("2301.00001"), // resolves fine
        ])
        .await
        .unwrap();

        let (edges, metadata) = sync
            .load_citation_context(
                &["2399.99999".to_string(), "2301.00001".to_string()],
                DEFAULT_MAX_NEIGHBORS,
            )
            .await
            .unwrap();
        assert_eq!(edges.len(), 3, "the healthy sibling still got its edges");
        assert!(metadata["2399.99999"].citations_synced_at.is_some());
        assert!(metadata["2301.00001"].citations_synced_at.is_some());
    }

    #[tokio::test]
    async fn second_refresh_fully_replaces_edges() {
        let db = test_db().await;

        // ttl_hours = 0 forces a refresh on every ensure.
        let settings = SyncSettings {
            ttl_hours: 0,
            ..Default::default()
        };
        let sync = CitationSync::new(
            Arc::clone(&db),
            stub_with_canonical(),
            settings.clone(),
        );
        sync.ensure_citations_for_papers(&[paper_ref("2301.00001")])
            .await
            .unwrap();

        // Same database, new upstream truth: one different reference.
        let mut second_stub = StubSource::default();
        second_stub.works.insert(
            "2301.00001".to_string(),
            work("https://openalex.org/W1", Some("2301.00001"), &["https://openalex.org/W9"]),
        );
        second_stub.batch_works.insert(
            "https://openalex.org/W9".to_string(),
            work("https://openalex.org/W9", Some("2508.00009"), &[]),
        );
        let sync = CitationSync::new(db, second_stub, settings);
        sync.ensure_citations_for_papers(&[paper_ref("2301.00001")])
            .await
            .unwrap();

        let (edges, _) = sync
            .load_citation_context(&["2301.00001".to_string()], DEFAULT_MAX_NEIGHBORS)
            .await
            .unwrap();
        assert_eq!(edges.len(), 1, "nothing from the first sync survives");
        assert_eq!(edges[0].target_id, "2508.00009");
    }

    #[tokio::test]
    async fn fan_out_is_bounded() {
        let db = test_db().await;
        let mut stub = StubSource::default();
        let refs: Vec<String> = (0..10).map(|i| format!("https://openalex.org/R{i}")).collect();
        let ref_strs: Vec<&str> = refs.iter().map(String::as_str).collect();
        stub.works.insert(
            "2301.00001".to_string(),
            work("https://openalex.org/W1", Some("2301.00001"), &ref_strs),
        );
        for (i, id) in refs.iter().enumerate() {
            stub.batch_works
                .insert(id.clone(), work(id, Some(&format!("19{i:02}.00000")), &[]));
        }

        let sync = CitationSync::new(
            db,
            stub,
            SyncSettings {
                max_references: 2,
                max_cited_by: 0,
                ..Default::default()
            },
        );
        sync.ensure_citations_for_papers(&[paper_ref("2301.00001")])
            .await
            .unwrap();

        let (edges, _) = sync
            .load_citation_context(&["2301.00001".to_string()], 20)
            .await
            .unwrap();
        assert_eq!(edges.len(), 2, "reference fan-out capped at settings");
    }

    #[tokio::test]
    async fn load_context_is_read_only() {
        let db = test_db().await;
        let sync = CitationSync::new(db, stub_with_canonical(), SyncSettings::default());

        let (edges, metadata) = sync
            .load_citation_context(&["2301.00001".to_string()], DEFAULT_MAX_NEIGHBORS)
            .await
            .unwrap();
        assert!(edges.is_empty());
        assert!(metadata.is_empty());
        assert!(
            sync.source.work_calls.lock().unwrap().is_empty(),
            "no refresh is triggered by a read"
        );
    }

    #[tokio::test]
    async fn load_context_caps_neighbors_per_root() {
        let db = test_db().await;
        let edges: Vec<CitationEdge> = (0..5)
            .map(|i| {
                CitationEdge::new(
                    "2301.00001",
                    format!("19{i:02}.00000"),
                    Relation::References,
                    "openalex",
                    "2026-08-06T00:00:00+00:00",
                )
            })
            .collect();
        db.replace_citations_for_source("2301.00001", &edges)
            .await
            .unwrap();

        let sync = CitationSync::new(db, StubSource::default(), SyncSettings::default());
        let (capped, _) = sync
            .load_citation_context(&["2301.00001".to_string()], 2)
            .await
            .unwrap();
        assert_eq!(capped.len(), 2);
    }
}
