//! OpenAlex work → paper metadata conversion.

use scry_core::entities::PaperMeta;
use scry_core::identity::normalize_arxiv_id;
use scry_openalex::Work;

/// Derive a metadata row from a work record.
///
/// The paper identity prefers the normalized arXiv id and falls back to the
/// OpenAlex id — related works often have no arXiv presence but still belong
/// in the graph. Callers must skip rows whose id comes back empty.
pub fn work_to_metadata(
    work: &Work,
    source_label: &str,
    citations_synced_at: Option<String>,
) -> PaperMeta {
    let id = work
        .ids
        .arxiv
        .as_deref()
        .and_then(normalize_arxiv_id)
        .unwrap_or_else(|| work.id.clone());
    PaperMeta {
        id,
        title: work.display_name.clone(),
        authors: work.author_names(),
        url: work.best_url(),
        published_at: work.published(),
        source: Some(source_label.to_string()),
        external_id: if work.id.is_empty() {
            None
        } else {
            Some(work.id.clone())
        },
        doi: work.ids.doi.clone(),
        raw_json: serde_json::to_value(work).ok(),
        citations_synced_at,
        cited_by_count: work.cited_by_count,
        referenced_count: work.referenced_works_count,
    }
}
