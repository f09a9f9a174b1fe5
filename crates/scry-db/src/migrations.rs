//! Versioned database migration runner.
//!
//! Embeds the SQL migration files at compile time. Applied versions are
//! recorded in `schema_migrations`, so each migration runs exactly once per
//! database and re-opening is a no-op — no column-existence probing.

use crate::ScryDb;
use crate::error::DatabaseError;

const MIGRATIONS: [(i64, &str); 2] = [
    (1, include_str!("../migrations/001_initial.sql")),
    (2, include_str!("../migrations/002_digest_params.sql")),
];

impl ScryDb {
    /// Run all pending embedded migrations in version order.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS schema_migrations (
                   version INTEGER PRIMARY KEY,
                   applied_at TEXT NOT NULL
                 )",
                (),
            )
            .await
            .map_err(|e| DatabaseError::Migration(format!("schema_migrations: {e}")))?;

        for (version, sql) in MIGRATIONS {
            if self.migration_applied(version).await? {
                continue;
            }
            tracing::debug!(version, "applying migration");
            self.conn
                .execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{version:03}: {e}")))?;
            self.conn
                .execute(
                    "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                    libsql::params![version, chrono::Utc::now().to_rfc3339()],
                )
                .await
                .map_err(|e| DatabaseError::Migration(format!("record {version:03}: {e}")))?;
        }
        Ok(())
    }

    async fn migration_applied(&self, version: i64) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT 1 FROM schema_migrations WHERE version = ?1",
                [version],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }
}
