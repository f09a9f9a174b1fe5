//! Local embedding generation using fastembed (ONNX runtime).
//!
//! Produces 384-dimensional vectors for abstracts without external API keys.
//! The ONNX runtime is synchronous and `embed` takes `&mut self`; the
//! pipeline calls it from `tokio::task::spawn_blocking` territory or accepts
//! the blocking cost, which at a couple dozen abstracts per request is
//! negligible.

use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

use crate::error::DigestError;

/// Seam for the embedding engine, so pipeline tests run without ONNX.
pub trait Embedder {
    /// Embed a batch of texts. Returns one vector per input.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Embedding`] if inference fails.
    fn embed_batch(&mut self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DigestError>;
}

/// Embedding engine backed by `AllMiniLML6V2` (sentence-transformers
/// all-MiniLM-L6-v2): 384-dim output, mean pooling, ~80MB model cached at
/// `~/.scry/cache/fastembed/`.
pub struct FastEmbedder {
    model: TextEmbedding,
}

impl FastEmbedder {
    /// Create the engine, downloading the model on first run.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Embedding`] if model download or ONNX
    /// initialization fails.
    pub fn new() -> Result<Self, DigestError> {
        let cache_dir = dirs::home_dir().map_or_else(
            || std::path::PathBuf::from(".fastembed_cache"),
            |h| h.join(".scry").join("cache").join("fastembed"),
        );

        let model = TextEmbedding::try_new(
            TextInitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(true),
        )
        .map_err(|e| DigestError::Embedding(format!("init: {e}")))?;

        Ok(Self { model })
    }

    /// Embedding vector dimensionality (always 384 for `AllMiniLML6V2`).
    #[must_use]
    pub const fn dimension() -> usize {
        384
    }
}

impl Embedder for FastEmbedder {
    fn embed_batch(&mut self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DigestError> {
        self.model
            .embed(texts, None)
            .map_err(|e| DigestError::Embedding(e.to_string()))
    }
}
