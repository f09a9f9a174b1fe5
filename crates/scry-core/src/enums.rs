//! Period and relation enums for Scry.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`;
//! the same strings are used for SQL storage and document metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// Cadence of a digest request. Monthly requests widen the paper-search
/// window to at least 28 days before identity derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Weekly,
    Monthly,
}

impl Period {
    /// Return the string representation used in SQL storage and metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::Weekly
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown period '{other}' (expected weekly|monthly)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Relation
// ---------------------------------------------------------------------------

/// Direction of a citation edge.
///
/// References come from the canonical record itself and carry full weight;
/// cited-by rows come from a reverse query and are scored lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    References,
    CitedBy,
}

impl Relation {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::References => "references",
            Self::CitedBy => "cited_by",
        }
    }

    /// Default edge weight for this relation.
    #[must_use]
    pub const fn default_weight(self) -> f64 {
        match self {
            Self::References => 1.0,
            Self::CitedBy => 0.9,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn period_roundtrip() {
        assert_eq!(Period::Weekly.as_str(), "weekly");
        assert_eq!("monthly".parse::<Period>().unwrap(), Period::Monthly);
        assert!("fortnightly".parse::<Period>().is_err());
    }

    #[test]
    fn period_serde_snake_case() {
        let json = serde_json::to_string(&Period::Monthly).unwrap();
        assert_eq!(json, "\"monthly\"");
        let back: Period = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(back, Period::Weekly);
    }

    #[test]
    fn relation_weights() {
        assert_eq!(Relation::References.default_weight(), 1.0);
        assert_eq!(Relation::CitedBy.default_weight(), 0.9);
        assert_eq!(Relation::CitedBy.as_str(), "cited_by");
    }
}
