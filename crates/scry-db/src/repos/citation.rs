//! Citation edge repository — full edge-set replacement and capped reads.

use scry_core::entities::CitationEdge;

use crate::ScryDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_enum};

fn row_to_edge(row: &libsql::Row) -> Result<CitationEdge, DatabaseError> {
    Ok(CitationEdge {
        source_id: row.get::<String>(0)?,
        target_id: row.get::<String>(1)?,
        relation: parse_enum(&row.get::<String>(2)?)?,
        weight: row.get::<f64>(3)?,
        context: get_opt_string(row, 4)?,
        origin: get_opt_string(row, 5)?,
        updated_at: get_opt_string(row, 6)?,
    })
}

const EDGE_COLUMNS: &str = "source_id, target_id, relation, weight, context, origin, updated_at";

impl ScryDb {
    /// Replace the full edge set for `source_id` in one transaction.
    ///
    /// Delete-then-insert, never merge: stale edges cannot survive a
    /// refresh. An empty `edges` slice clears the set.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the transaction fails.
    pub async fn replace_citations_for_source(
        &self,
        source_id: &str,
        edges: &[CitationEdge],
    ) -> Result<(), DatabaseError> {
        let tx = self.conn().transaction().await?;
        tx.execute("DELETE FROM citations WHERE source_id = ?1", [source_id])
            .await?;
        for edge in edges {
            tx.execute(
                "INSERT OR REPLACE INTO citations
                   (source_id, target_id, relation, weight, context, origin, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    source_id,
                    edge.target_id.as_str(),
                    edge.relation.as_str(),
                    edge.weight,
                    edge.context.clone(),
                    edge.origin.clone(),
                    edge.updated_at.clone()
                ],
            )
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Outbound edges for each focus id, capped at `limit_per` per source.
    ///
    /// Results keep the focus-id order; within a source, heavier edges come
    /// first for a deterministic cut.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails or a row cannot be parsed.
    pub async fn get_citation_rows(
        &self,
        focus_ids: &[String],
        limit_per: usize,
    ) -> Result<Vec<CitationEdge>, DatabaseError> {
        let mut edges = Vec::new();
        let limit = i64::try_from(limit_per).unwrap_or(i64::MAX);
        for source_id in focus_ids {
            let mut rows = self
                .conn()
                .query(
                    &format!(
                        "SELECT {EDGE_COLUMNS} FROM citations
                         WHERE source_id = ?1
                         ORDER BY weight DESC, target_id
                         LIMIT ?2"
                    ),
                    libsql::params![source_id.as_str(), limit],
                )
                .await?;
            while let Some(row) = rows.next().await? {
                edges.push(row_to_edge(&row)?);
            }
        }
        Ok(edges)
    }
}
