//! Digest pipeline error types.

use thiserror::Error;

use crate::llm::LlmError;

/// Errors surfaced by the digest pipeline.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The paper search returned nothing — the boundary's not-found signal.
    #[error("no papers found for topic")]
    NoPapers,

    /// Paper search failure (upstream fetch).
    #[error("paper search failed: {0}")]
    Papers(#[from] scry_openalex::OpenAlexError),

    /// LLM labeling or composition failure.
    #[error("language model call failed: {0}")]
    Llm(#[from] LlmError),

    /// Embedding engine failure.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// Cache read or write failure.
    #[error("cache error: {0}")]
    Cache(#[from] scry_cache::CacheError),

    /// Citation sync failure.
    #[error("citation sync error: {0}")]
    Citations(#[from] scry_citations::CitationError),

    /// Cluster payload serialization failure.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
