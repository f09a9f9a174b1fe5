//! # scry-digest
//!
//! Digest pipeline for Scry: fetch → embed → cluster → label → compose →
//! cache, with the citation sync engine run over the papers the digest
//! references.
//!
//! Collaborators enter through trait seams ([`PaperSource`], [`Embedder`],
//! [`Composer`], the citation source) so the pipeline itself is testable
//! without network, ONNX, or API keys. The cache is consulted before any
//! expensive work; a miss recomputes and writes through the facade,
//! last-write-wins.

pub mod cluster;
pub mod compose;
pub mod embed;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod tts;

pub use embed::{Embedder, FastEmbedder};
pub use error::DigestError;
pub use llm::{AnthropicClient, Composer, LlmError};

use serde::Serialize;

use scry_cache::DigestCache;
use scry_citations::{CitationSource, CitationSync};
use scry_core::entities::{Digest, LabeledCluster, NewDigest, PaperRef};
use scry_core::enums::Period;
use scry_core::identity::{build_digest_id, effective_days};
use scry_openalex::{OpenAlexClient, OpenAlexError, PaperRecord};

use crate::cluster::{cluster_embeddings, clusters_to_payload};
use crate::compose::{compose_digest, enrich_top_papers, label_clusters};

/// Papers fetched per digest request.
const FETCH_LIMIT: usize = 25;

/// Target cluster count; clamped to the paper count.
const CLUSTER_COUNT: usize = 6;

/// Representative papers per cluster handed to the labeling prompt.
const TOP_PER_CLUSTER: usize = 3;

/// An inbound digest request, parameters as supplied.
#[derive(Debug, Clone)]
pub struct DigestRequest {
    pub topic: String,
    pub days: i64,
    pub top_k: i64,
    pub period: Period,
    pub voice: bool,
}

/// The pipeline's answer: either a fresh computation or a cache hit.
#[derive(Debug, Clone, Serialize)]
pub struct DigestOutcome {
    pub digest_id: String,
    pub summary: String,
    pub clusters: Vec<LabeledCluster>,
    pub audio_url: Option<String>,
    pub days: i64,
    pub period: Period,
    pub top_k: i64,
    pub from_cache: bool,
}

/// Seam for the recent-paper search.
pub trait PaperSource {
    /// Papers on `topic` from the last `days` days, newest first.
    fn fetch_recent(
        &self,
        topic: &str,
        days: i64,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<PaperRecord>, OpenAlexError>> + Send;
}

impl PaperSource for OpenAlexClient {
    async fn fetch_recent(
        &self,
        topic: &str,
        days: i64,
        limit: usize,
    ) -> Result<Vec<PaperRecord>, OpenAlexError> {
        self.search_recent(topic, days, limit).await
    }
}

/// The digest pipeline. Owns its collaborators; constructed once at startup.
pub struct DigestPipeline<P, E, C, S>
where
    P: PaperSource,
    E: Embedder,
    C: Composer,
    S: CitationSource,
{
    papers: P,
    embedder: E,
    composer: C,
    cache: DigestCache,
    citations: CitationSync<S>,
    ttl_hours: i64,
}

impl<P, E, C, S> DigestPipeline<P, E, C, S>
where
    P: PaperSource,
    E: Embedder,
    C: Composer,
    S: CitationSource,
{
    #[must_use]
    pub fn new(
        papers: P,
        embedder: E,
        composer: C,
        cache: DigestCache,
        citations: CitationSync<S>,
        ttl_hours: i64,
    ) -> Self {
        Self {
            papers,
            embedder,
            composer,
            cache,
            citations,
            ttl_hours,
        }
    }

    /// Produce a digest for the request, serving from cache when possible.
    ///
    /// # Errors
    ///
    /// [`DigestError::NoPapers`] when the search comes back empty — the
    /// boundary's not-found signal — and the typed upstream errors of each
    /// collaborator otherwise.
    pub async fn run(&mut self, req: &DigestRequest) -> Result<DigestOutcome, DigestError> {
        let topic = req.topic.trim().to_string();
        let days = effective_days(req.period, req.days);

        if let Some(hit) = self
            .cache
            .get_cached(&topic, days, req.top_k, req.period, req.voice, self.ttl_hours)
            .await?
        {
            tracing::debug!(%topic, days, "digest cache hit");
            return outcome_from_digest(hit, true);
        }

        let papers = self.papers.fetch_recent(&topic, days, FETCH_LIMIT).await?;
        if papers.is_empty() {
            return Err(DigestError::NoPapers);
        }
        tracing::debug!(%topic, days, papers = papers.len(), "computing digest");

        let texts: Vec<String> = papers.iter().map(|p| p.abstract_text.clone()).collect();
        let embeds = self.embedder.embed_batch(texts)?;
        let labels = cluster_embeddings(&embeds, CLUSTER_COUNT);
        let payload = clusters_to_payload(&papers, &embeds, &labels, TOP_PER_CLUSTER);

        let labeled = label_clusters(&self.composer, &payload).await?;
        let labeled = enrich_top_papers(labeled, &papers);
        let summary = compose_digest(
            &self.composer,
            &topic,
            days,
            req.top_k,
            &labeled,
            req.period,
        )
        .await?;

        let audio_url = if req.voice {
            tts::synthesize(&summary)
        } else {
            None
        };

        let digest_id = build_digest_id(&topic, days);
        self.cache
            .save(&NewDigest {
                id: digest_id.clone(),
                topic,
                days,
                summary: summary.clone(),
                clusters_json: serde_json::to_string(&labeled)?,
                audio_url: audio_url.clone(),
                top_k: req.top_k,
                period: req.period,
                voice: req.voice,
            })
            .await?;

        let refs: Vec<PaperRef> = papers.iter().map(paper_to_ref).collect();
        self.citations.ensure_citations_for_papers(&refs).await?;

        Ok(DigestOutcome {
            digest_id,
            summary,
            clusters: labeled,
            audio_url,
            days,
            period: req.period,
            top_k: req.top_k,
            from_cache: false,
        })
    }
}

fn paper_to_ref(paper: &PaperRecord) -> PaperRef {
    PaperRef {
        id: paper.id.clone(),
        title: Some(paper.title.clone()),
        authors: paper.authors.clone(),
        url: Some(paper.url.clone()),
        published_at: paper.published_at.clone(),
        source: Some("arxiv".to_string()),
    }
}

fn outcome_from_digest(digest: Digest, from_cache: bool) -> Result<DigestOutcome, DigestError> {
    let clusters: Vec<LabeledCluster> = serde_json::from_str(&digest.clusters_json)?;
    Ok(DigestOutcome {
        digest_id: digest.id,
        summary: digest.summary,
        clusters,
        audio_url: digest.audio_url,
        days: digest.days,
        period: digest.period,
        top_k: digest.top_k,
        from_cache,
    })
}
