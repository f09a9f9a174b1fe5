//! # scry-db
//!
//! libSQL database operations for Scry state.
//!
//! Handles all relational state: cached digests, denormalized paper
//! metadata, and the citation-edge table the sync engine refreshes.
//!
//! Uses the `libsql` crate (C `SQLite` fork) — stable API, native upsert
//! support, in-memory databases for tests.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Scry state operations.
///
/// Wraps a libSQL database and connection. Repository methods are
/// implemented on this type in the `repos` modules. Constructed once at
/// startup and shared by reference (`Arc`) between the cache facade, the
/// citation sync engine, and the pipeline.
#[derive(Debug)]
pub struct ScryDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl ScryDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs pending migrations on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let scry_db = Self { db, conn };
        scry_db.run_migrations().await?;
        Ok(scry_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
