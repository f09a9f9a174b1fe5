use serde::{Deserialize, Serialize};

use crate::enums::Relation;

/// A directed citation relation between two paper identities.
///
/// The edge set for a `source_id` is replaced wholesale on every refresh, so
/// rows here never outlive the sync that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationEdge {
    pub source_id: String,
    pub target_id: String,
    pub relation: Relation,
    pub weight: f64,
    pub context: Option<String>,
    pub origin: Option<String>,
    pub updated_at: Option<String>,
}

impl CitationEdge {
    /// Build an edge with the relation's default weight and provenance.
    #[must_use]
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relation: Relation,
        origin: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation,
            weight: relation.default_weight(),
            context: Some(relation.as_str().to_string()),
            origin: Some(origin.into()),
            updated_at: Some(updated_at.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Relation;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_edge_carries_relation_weight() {
        let edge = CitationEdge::new("a", "b", Relation::CitedBy, "openalex", "t");
        assert_eq!(edge.weight, 0.9);
        assert_eq!(edge.context.as_deref(), Some("cited_by"));
        assert_eq!(edge.origin.as_deref(), Some("openalex"));
    }
}
