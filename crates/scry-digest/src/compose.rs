//! Cluster labeling, top-paper enrichment, and digest composition.

use scry_core::entities::LabeledCluster;
use scry_core::enums::Period;
use scry_openalex::PaperRecord;

use crate::cluster::ClusterPayload;
use crate::llm::{Composer, LlmError};
use crate::prompts::{CLUSTER_PROMPT, DIGEST_PROMPT, MONTHLY_DIGEST_PROMPT, SYSTEM_PROMPT};

/// Clusters per labeling call; keeps each completion small enough to stay
/// inside the JSON-only contract.
const LABEL_BATCH_SIZE: usize = 2;

/// Ask the model to label clusters, in batches.
///
/// A batch whose answer fails to parse as a JSON array is skipped with a
/// warning — a half-labeled digest beats no digest. Transport errors still
/// propagate.
///
/// # Errors
///
/// Returns [`LlmError`] if a completion call itself fails.
pub async fn label_clusters<C: Composer>(
    composer: &C,
    payload: &[ClusterPayload],
) -> Result<Vec<LabeledCluster>, LlmError> {
    let mut labeled = Vec::new();
    for batch in payload.chunks(LABEL_BATCH_SIZE) {
        let clusters_json = serde_json::to_string(batch).unwrap_or_else(|_| "[]".to_string());
        let prompt = format!("{CLUSTER_PROMPT}\n\nCLUSTERS:\n{clusters_json}");
        let raw = composer.complete(SYSTEM_PROMPT, &prompt).await?;
        match serde_json::from_str::<Vec<LabeledCluster>>(raw.trim()) {
            Ok(batch_labels) => labeled.extend(batch_labels),
            Err(e) => {
                tracing::warn!(%e, "skipping unparsable labeling batch");
            }
        }
    }
    Ok(labeled)
}

/// Fill in paper URLs on labeled clusters from the fetched set.
///
/// The model only ever sees titles, so matching is by case-insensitive
/// title; unmatched entries keep whatever the model produced.
#[must_use]
pub fn enrich_top_papers(
    mut labeled: Vec<LabeledCluster>,
    papers: &[PaperRecord],
) -> Vec<LabeledCluster> {
    for cluster in &mut labeled {
        for top in &mut cluster.top_papers {
            if top.url.is_some() {
                continue;
            }
            let wanted = top.title.to_lowercase();
            if let Some(paper) = papers.iter().find(|p| p.title.to_lowercase() == wanted) {
                top.url = Some(paper.url.clone());
            }
        }
    }
    labeled
}

/// Compose the digest body from the labeled clusters.
///
/// # Errors
///
/// Returns [`LlmError`] if the completion call fails.
pub async fn compose_digest<C: Composer>(
    composer: &C,
    topic: &str,
    days: i64,
    top_k: i64,
    labeled: &[LabeledCluster],
    period: Period,
) -> Result<String, LlmError> {
    let template = match period {
        Period::Monthly => MONTHLY_DIGEST_PROMPT,
        Period::Weekly => DIGEST_PROMPT,
    };
    let prompt = template
        .replace("{topic}", topic)
        .replace("{days}", &days.to_string())
        .replace("{top_k}", &top_k.to_string());

    let compact: Vec<serde_json::Value> = labeled
        .iter()
        .map(|c| {
            serde_json::json!({
                "label": if c.label.is_empty() { "Cluster" } else { c.label.as_str() },
                "bullets": c.bullets,
            })
        })
        .collect();
    let clusters_json =
        serde_json::to_string(&compact).unwrap_or_else(|_| "[]".to_string());

    composer
        .complete(SYSTEM_PROMPT, &format!("{prompt}\n\nCLUSTERS:\n{clusters_json}"))
        .await
}
