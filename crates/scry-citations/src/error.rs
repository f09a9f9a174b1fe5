//! Citation sync error types.

use thiserror::Error;

/// Errors from the citation sync engine.
///
/// External-fetch failures never appear here — the engine downgrades them to
/// "no record found" per paper. What remains is storage.
#[derive(Debug, Error)]
pub enum CitationError {
    /// Underlying store failure.
    #[error("database error: {0}")]
    Database(#[from] scry_db::error::DatabaseError),
}
