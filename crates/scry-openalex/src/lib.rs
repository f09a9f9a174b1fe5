//! # scry-openalex
//!
//! OpenAlex HTTP client for Scry.
//!
//! One JSON upstream serves two consumers: the digest pipeline's
//! recent-paper search and the citation sync engine's work lookups. The
//! citation-facing methods degrade to "no record" on any failure so a bad
//! fetch for one paper never aborts a batch; the paper search surfaces its
//! errors, because a failed search is a failed digest request.

mod error;
mod http;
mod work;

pub use error::OpenAlexError;
pub use work::{Author, Authorship, Location, OpenAccess, Work, WorkIds};

use chrono::{Duration, Utc};
use serde::Deserialize;

use scry_core::identity::normalize_arxiv_id;

use crate::http::check_response;

/// Per-page ceiling the API enforces on list queries.
const MAX_PER_PAGE: usize = 25;

/// A recent paper as consumed by the digest pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRecord {
    /// Normalized arXiv identity.
    pub id: String,
    pub title: String,
    pub abstract_text: String,
    pub url: String,
    pub published_at: Option<String>,
    pub authors: Option<String>,
}

/// Connection settings for [`OpenAlexClient::new`].
#[derive(Debug, Clone)]
pub struct OpenAlexOptions {
    pub base_url: String,
    /// Contact address for the polite pool; empty to omit.
    pub mailto: String,
    pub timeout_secs: u64,
    /// Ids per chunk in bulk work lookups.
    pub batch_size: usize,
}

impl Default for OpenAlexOptions {
    fn default() -> Self {
        Self {
            base_url: "https://api.openalex.org".to_string(),
            mailto: String::new(),
            timeout_secs: 10,
            batch_size: 25,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<Work>,
}

/// HTTP client for the OpenAlex API.
#[derive(Clone)]
pub struct OpenAlexClient {
    http: reqwest::Client,
    base_url: String,
    mailto: String,
    batch_size: usize,
}

impl OpenAlexClient {
    /// Create a new client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(options: OpenAlexOptions) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("scry/0.1")
                .timeout(std::time::Duration::from_secs(options.timeout_secs))
                .build()
                .expect("reqwest client should build"),
            base_url: options.base_url.trim_end_matches('/').to_string(),
            mailto: options.mailto,
            batch_size: options.batch_size.max(1),
        }
    }

    /// Fetch the canonical work for an arXiv id.
    ///
    /// Returns `None` on any transport, status, or parse failure — the
    /// citation refresh treats all of those as "no record found".
    pub async fn get_work(&self, arxiv_id: &str) -> Option<Work> {
        if arxiv_id.is_empty() {
            return None;
        }
        let path = format!("/works/arXiv:{}", urlencoding::encode(arxiv_id));
        match self.get_json::<Work>(&path, &[]).await {
            Ok(work) if !work.id.is_empty() => Some(work),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(arxiv_id, %e, "work lookup failed");
                None
            }
        }
    }

    /// Bulk-fetch works by OpenAlex id, chunked to respect the upstream
    /// query-size limit. Failed chunks contribute nothing; results are
    /// joined across chunks.
    pub async fn get_works_batch(&self, ids: &[String]) -> Vec<Work> {
        let cleaned: Vec<&String> = ids.iter().filter(|id| !id.is_empty()).collect();
        let mut results = Vec::new();
        for chunk in cleaned.chunks(self.batch_size) {
            let filter = batch_filter(chunk);
            let query = [
                ("filter", filter),
                ("per-page", chunk.len().to_string()),
            ];
            match self.get_json::<ListResponse>("/works", &query).await {
                Ok(list) => results.extend(list.results),
                Err(e) => tracing::warn!(chunk_len = chunk.len(), %e, "batch lookup failed"),
            }
        }
        results
    }

    /// Works citing `openalex_id`, most-cited first, capped at `limit`.
    ///
    /// Returns empty on failure or when `limit` is zero.
    pub async fn get_cited_by(&self, openalex_id: &str, limit: usize) -> Vec<Work> {
        if openalex_id.is_empty() || limit == 0 {
            return Vec::new();
        }
        let query = [
            ("filter", format!("cites:{openalex_id}")),
            ("per-page", limit.min(MAX_PER_PAGE).to_string()),
            ("sort", "cited_by_count:desc".to_string()),
        ];
        match self.get_json::<ListResponse>("/works", &query).await {
            Ok(mut list) => {
                list.results.truncate(limit);
                list.results
            }
            Err(e) => {
                tracing::warn!(openalex_id, %e, "cited-by lookup failed");
                Vec::new()
            }
        }
    }

    /// Search works published in the last `days` days matching `topic`.
    ///
    /// Only works carrying an arXiv id and an abstract become
    /// [`PaperRecord`]s; abstracts are reconstructed from the inverted
    /// index.
    ///
    /// # Errors
    ///
    /// Returns [`OpenAlexError`] if the request fails, the API returns a
    /// non-success status, or the response cannot be parsed — a failed
    /// search is a failed digest request.
    pub async fn search_recent(
        &self,
        topic: &str,
        days: i64,
        limit: usize,
    ) -> Result<Vec<PaperRecord>, OpenAlexError> {
        let cutoff = (Utc::now() - Duration::days(days.max(1))).date_naive();
        let query = [
            ("search", topic.to_string()),
            (
                "filter",
                format!("from_publication_date:{cutoff},has_abstract:true"),
            ),
            ("per-page", limit.clamp(1, MAX_PER_PAGE).to_string()),
            ("sort", "publication_date:desc".to_string()),
        ];
        let list: ListResponse = self.get_json("/works", &query).await?;

        let mut papers = Vec::new();
        for work in list.results {
            let Some(record) = work_to_paper_record(&work) else {
                continue;
            };
            papers.push(record);
            if papers.len() >= limit {
                break;
            }
        }
        Ok(papers)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, OpenAlexError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.get(&url).query(query);
        if !self.mailto.is_empty() {
            request = request.query(&[("mailto", self.mailto.as_str())]);
        }
        let resp = check_response(request.send().await?).await?;
        Ok(resp.json::<T>().await?)
    }
}

/// Build the `openalex_id` filter value for one chunk of ids.
fn batch_filter(chunk: &[&String]) -> String {
    let joined = chunk
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join("|");
    format!("openalex_id:{joined}")
}

/// Convert a work into a pipeline paper record, if it has an arXiv identity
/// and an abstract.
fn work_to_paper_record(work: &Work) -> Option<PaperRecord> {
    let arxiv_id = normalize_arxiv_id(work.ids.arxiv.as_deref()?)?;
    let abstract_text = work.abstract_text()?;
    Some(PaperRecord {
        url: work
            .best_url()
            .unwrap_or_else(|| format!("https://arxiv.org/abs/{arxiv_id}")),
        id: arxiv_id,
        title: work.display_name.clone().unwrap_or_default(),
        abstract_text,
        published_at: work.published(),
        authors: work.author_names(),
    })
}
