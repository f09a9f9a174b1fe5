//! Paper metadata repository — merge upserts and bulk lookups.

use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;

use scry_core::entities::PaperMeta;

use crate::ScryDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_optional_json};

fn row_to_paper(row: &libsql::Row) -> Result<PaperMeta, DatabaseError> {
    let raw = get_opt_string(row, 8)?;
    Ok(PaperMeta {
        id: row.get::<String>(0)?,
        title: get_opt_string(row, 1)?,
        authors: get_opt_string(row, 2)?,
        url: get_opt_string(row, 3)?,
        published_at: get_opt_string(row, 4)?,
        source: get_opt_string(row, 5)?,
        external_id: get_opt_string(row, 6)?,
        doi: get_opt_string(row, 7)?,
        raw_json: parse_optional_json(raw.as_deref())?,
        citations_synced_at: get_opt_string(row, 9)?,
        cited_by_count: row.get::<Option<i64>>(10)?,
        referenced_count: row.get::<Option<i64>>(11)?,
    })
}

const PAPER_COLUMNS: &str = "id, title, authors, url, published_at, source, external_id, doi, \
                             raw_json, citations_synced_at, cited_by_count, referenced_count";

impl ScryDb {
    /// Upsert paper metadata rows, merging field by field.
    ///
    /// A NULL in the incoming row never overwrites a stored non-null value —
    /// partial records (e.g. citation-derived rows without authors) only add
    /// information.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a statement fails or `raw_json` cannot be
    /// serialized.
    pub async fn upsert_paper_metadata(&self, rows: &[PaperMeta]) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        for paper in rows {
            let raw_json = paper
                .raw_json
                .as_ref()
                .map(|v| serde_json::to_string(v).context("serialize raw_json"))
                .transpose()?;
            self.conn()
                .execute(
                    "INSERT INTO papers
                       (id, title, authors, url, published_at, source, external_id, doi,
                        raw_json, citations_synced_at, cited_by_count, referenced_count, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                     ON CONFLICT(id) DO UPDATE SET
                       title = COALESCE(excluded.title, papers.title),
                       authors = COALESCE(excluded.authors, papers.authors),
                       url = COALESCE(excluded.url, papers.url),
                       published_at = COALESCE(excluded.published_at, papers.published_at),
                       source = COALESCE(excluded.source, papers.source),
                       external_id = COALESCE(excluded.external_id, papers.external_id),
                       doi = COALESCE(excluded.doi, papers.doi),
                       raw_json = COALESCE(excluded.raw_json, papers.raw_json),
                       citations_synced_at = COALESCE(excluded.citations_synced_at, papers.citations_synced_at),
                       cited_by_count = COALESCE(excluded.cited_by_count, papers.cited_by_count),
                       referenced_count = COALESCE(excluded.referenced_count, papers.referenced_count),
                       updated_at = excluded.updated_at",
                    libsql::params![
                        paper.id.as_str(),
                        paper.title.clone(),
                        paper.authors.clone(),
                        paper.url.clone(),
                        paper.published_at.clone(),
                        paper.source.clone(),
                        paper.external_id.clone(),
                        paper.doi.clone(),
                        raw_json,
                        paper.citations_synced_at.clone(),
                        paper.cited_by_count,
                        paper.referenced_count,
                        now.as_str()
                    ],
                )
                .await?;
        }
        Ok(())
    }

    /// Fetch metadata for the given paper identities, keyed by id.
    ///
    /// Unknown ids are simply absent from the map.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row cannot be parsed.
    pub async fn get_paper_metadata_map(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, PaperMeta>, DatabaseError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = (1..=ids.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let params: Vec<libsql::Value> = ids
            .iter()
            .map(|id| libsql::Value::Text(id.clone()))
            .collect();

        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {PAPER_COLUMNS} FROM papers WHERE id IN ({placeholders})"),
                libsql::params_from_iter(params),
            )
            .await?;

        let mut map = HashMap::new();
        while let Some(row) = rows.next().await? {
            let paper = row_to_paper(&row)?;
            map.insert(paper.id.clone(), paper);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn test_db() -> ScryDb {
        ScryDb::open_local(":memory:").await.unwrap()
    }

    fn full_paper(id: &str) -> PaperMeta {
        PaperMeta {
            id: id.to_string(),
            title: Some("Attention Is All You Need".to_string()),
            authors: Some("Vaswani, Shazeer".to_string()),
            url: Some("https://arxiv.org/abs/1706.03762".to_string()),
            published_at: Some("2017-06-12".to_string()),
            source: Some("arxiv".to_string()),
            external_id: Some("https://openalex.org/W2741809807".to_string()),
            doi: Some("10.48550/arXiv.1706.03762".to_string()),
            raw_json: Some(serde_json::json!({"cited_by_count": 100_000})),
            citations_synced_at: None,
            cited_by_count: Some(100_000),
            referenced_count: Some(30),
        }
    }

    #[tokio::test]
    async fn upsert_and_lookup_roundtrip() {
        let db = test_db().await;
        db.upsert_paper_metadata(&[full_paper("1706.03762")])
            .await
            .unwrap();

        let map = db
            .get_paper_metadata_map(&["1706.03762".to_string()])
            .await
            .unwrap();
        let paper = &map["1706.03762"];
        assert_eq!(paper.title.as_deref(), Some("Attention Is All You Need"));
        assert_eq!(paper.cited_by_count, Some(100_000));
        assert_eq!(paper.raw_json.as_ref().unwrap()["cited_by_count"], 100_000);
    }

    #[tokio::test]
    async fn partial_upsert_preserves_known_fields() {
        let db = test_db().await;
        db.upsert_paper_metadata(&[full_paper("1706.03762")])
            .await
            .unwrap();

        // A citation-derived row without authors or title must not clobber
        // what we already know.
        let partial = PaperMeta {
            id: "1706.03762".to_string(),
            cited_by_count: Some(100_500),
            citations_synced_at: Some("2026-08-06T00:00:00+00:00".to_string()),
            ..Default::default()
        };
        db.upsert_paper_metadata(&[partial]).await.unwrap();

        let map = db
            .get_paper_metadata_map(&["1706.03762".to_string()])
            .await
            .unwrap();
        let paper = &map["1706.03762"];
        assert_eq!(
            paper.authors.as_deref(),
            Some("Vaswani, Shazeer"),
            "null must not overwrite stored authors"
        );
        assert_eq!(paper.title.as_deref(), Some("Attention Is All You Need"));
        assert_eq!(paper.cited_by_count, Some(100_500), "present fields win");
        assert_eq!(
            paper.citations_synced_at.as_deref(),
            Some("2026-08-06T00:00:00+00:00")
        );
    }

    #[tokio::test]
    async fn lookup_skips_unknown_ids() {
        let db = test_db().await;
        db.upsert_paper_metadata(&[full_paper("1706.03762")])
            .await
            .unwrap();

        let map = db
            .get_paper_metadata_map(&["1706.03762".to_string(), "2301.00001".to_string()])
            .await
            .unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("1706.03762"));
    }

    #[tokio::test]
    async fn empty_id_list_is_empty_map() {
        let db = test_db().await;
        let map = db.get_paper_metadata_map(&[]).await.unwrap();
        assert!(map.is_empty());
    }
}
