//! Cache error types.

use thiserror::Error;

/// Errors from digest cache operations, whichever backend is active.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Relational backend failure.
    #[error("database error: {0}")]
    Database(#[from] scry_db::error::DatabaseError),

    /// The selected backend is missing required configuration.
    #[error("configuration error: {0}")]
    Config(#[from] scry_config::ConfigError),

    /// Vector backend transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Vector backend returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },
}
