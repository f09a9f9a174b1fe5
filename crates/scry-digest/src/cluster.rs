//! Deterministic k-means over abstract embeddings.
//!
//! No clustering crate in the stack, so this is plain vector math:
//! farthest-point seeding (deterministic, no RNG) followed by bounded Lloyd
//! iterations. Per-cluster representatives are the papers nearest the
//! centroid.

use serde::Serialize;

use scry_openalex::PaperRecord;

/// Lloyd iteration cap; small inputs converge far earlier.
const MAX_ITERATIONS: usize = 25;

/// One cluster's papers as handed to the labeling prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterPayload {
    pub cluster_id: usize,
    pub papers: Vec<ClusterPaper>,
}

/// A paper inside a cluster payload.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterPaper {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub url: String,
}

/// Assign each embedding to one of (at most) `k` clusters.
///
/// `k` is clamped to the input size; an empty input yields empty labels.
/// Deterministic for a given input.
#[must_use]
pub fn cluster_embeddings(embeds: &[Vec<f32>], k: usize) -> Vec<usize> {
    let n = embeds.len();
    if n == 0 {
        return Vec::new();
    }
    let k = k.clamp(1, n);
    if k == 1 {
        return vec![0; n];
    }

    let mut centroids = seed_centroids(embeds, k);
    let mut labels = vec![0usize; n];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (i, embed) in embeds.iter().enumerate() {
            let nearest = nearest_centroid(embed, &centroids);
            if labels[i] != nearest {
                labels[i] = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        for (cid, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&Vec<f32>> = embeds
                .iter()
                .zip(&labels)
                .filter(|(_, &label)| label == cid)
                .map(|(e, _)| e)
                .collect();
            // An emptied cluster keeps its centroid.
            if !members.is_empty() {
                *centroid = mean(&members);
            }
        }
    }

    labels
}

/// Build the per-cluster payload: up to `top_per_cluster` papers nearest
/// each cluster centroid, clusters ordered by id.
#[must_use]
pub fn clusters_to_payload(
    papers: &[PaperRecord],
    embeds: &[Vec<f32>],
    labels: &[usize],
    top_per_cluster: usize,
) -> Vec<ClusterPayload> {
    let Some(&max_label) = labels.iter().max() else {
        return Vec::new();
    };

    let mut payload = Vec::new();
    for cid in 0..=max_label {
        let member_idxs: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == cid)
            .map(|(i, _)| i)
            .collect();
        if member_idxs.is_empty() {
            continue;
        }

        let member_embeds: Vec<&Vec<f32>> = member_idxs.iter().map(|&i| &embeds[i]).collect();
        let centroid = mean(&member_embeds);

        let mut by_distance: Vec<(usize, f32)> = member_idxs
            .iter()
            .map(|&i| (i, squared_distance(&embeds[i], &centroid)))
            .collect();
        by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));

        payload.push(ClusterPayload {
            cluster_id: cid,
            papers: by_distance
                .into_iter()
                .take(top_per_cluster)
                .map(|(i, _)| ClusterPaper {
                    title: papers[i].title.clone(),
                    abstract_text: papers[i].abstract_text.clone(),
                    url: papers[i].url.clone(),
                })
                .collect(),
        });
    }
    payload
}

/// Farthest-point seeding: start from the first embedding, then repeatedly
/// pick the point farthest from every chosen centroid.
fn seed_centroids(embeds: &[Vec<f32>], k: usize) -> Vec<Vec<f32>> {
    let mut centroids = vec![embeds[0].clone()];
    while centroids.len() < k {
        let farthest = embeds
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let nearest = centroids
                    .iter()
                    .map(|c| squared_distance(e, c))
                    .fold(f32::INFINITY, f32::min);
                (i, nearest)
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(0, |(i, _)| i);
        centroids.push(embeds[farthest].clone());
    }
    centroids
}

fn nearest_centroid(embed: &[f32], centroids: &[Vec<f32>]) -> usize {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, squared_distance(embed, c)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(0, |(i, _)| i)
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[allow(clippy::cast_precision_loss)]
fn mean(vectors: &[&Vec<f32>]) -> Vec<f32> {
    let dim = vectors[0].len();
    let mut out = vec![0.0f32; dim];
    for v in vectors {
        for (acc, x) in out.iter_mut().zip(v.iter()) {
            *acc += x;
        }
    }
    let n = vectors.len() as f32;
    for acc in &mut out {
        *acc /= n;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paper(id: &str, title: &str) -> PaperRecord {
        PaperRecord {
            id: id.to_string(),
            title: title.to_string(),
            abstract_text: format!("abstract of {title}"),
            url: format!("https://arxiv.org/abs/{id}"),
            published_at: None,
            authors: None,
        }
    }

    /// Two tight groups at opposite corners.
    fn grouped_embeds() -> Vec<Vec<f32>> {
        vec![
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.95, 0.05],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
        ]
    }

    #[test]
    fn separates_obvious_groups() {
        let labels = cluster_embeddings(&grouped_embeds(), 2);
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn deterministic_across_calls() {
        let embeds = grouped_embeds();
        assert_eq!(cluster_embeddings(&embeds, 2), cluster_embeddings(&embeds, 2));
    }

    #[test]
    fn empty_input_yields_empty_labels() {
        assert!(cluster_embeddings(&[], 6).is_empty());
    }

    #[test]
    fn k_is_clamped_to_input_size() {
        let labels = cluster_embeddings(&[vec![1.0, 0.0]], 6);
        assert_eq!(labels, vec![0]);

        let labels = cluster_embeddings(&grouped_embeds(), 100);
        assert!(labels.iter().all(|&l| l < 5));
    }

    #[test]
    fn single_cluster_when_k_is_one() {
        let labels = cluster_embeddings(&grouped_embeds(), 1);
        assert!(labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn payload_caps_papers_per_cluster() {
        let embeds = grouped_embeds();
        let papers: Vec<PaperRecord> = (0..5)
            .map(|i| paper(&format!("2301.0000{i}"), &format!("Paper {i}")))
            .collect();
        let labels = cluster_embeddings(&embeds, 2);

        let payload = clusters_to_payload(&papers, &embeds, &labels, 2);
        assert_eq!(payload.len(), 2);
        for cluster in &payload {
            assert!(cluster.papers.len() <= 2);
        }
    }

    #[test]
    fn payload_prefers_papers_near_centroid() {
        // One group: centroid sits at the mean; the middle point is closest.
        let embeds = vec![vec![0.0, 0.0], vec![0.5, 0.5], vec![1.0, 1.0]];
        let papers = vec![
            paper("1", "Edge A"),
            paper("2", "Middle"),
            paper("3", "Edge B"),
        ];
        let labels = vec![0, 0, 0];

        let payload = clusters_to_payload(&papers, &embeds, &labels, 1);
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].papers[0].title, "Middle");
    }

    #[test]
    fn payload_serializes_abstract_key() {
        let payload = ClusterPayload {
            cluster_id: 0,
            papers: vec![ClusterPaper {
                title: "T".to_string(),
                abstract_text: "A".to_string(),
                url: "u".to_string(),
            }],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["papers"][0]["abstract"], "A");
    }
}
