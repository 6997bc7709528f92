use serde::{Deserialize, Serialize};

use super::Property;

/// A property with its per-component and blended scores for one user
///
/// All score fields are derived and recomputed on every scoring call; they
/// are never stored as ground truth.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredProperty {
    #[serde(flatten)]
    pub property: Property,
    pub affordability_score: f64,
    pub environment_score: f64,
    pub affinity_score: f64,
    pub match_score: f64,
}

impl ScoredProperty {
    /// The match score as a human-readable percentage, e.g. `"46.3%"`
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.match_score * 100.0)
    }
}

/// Flat persisted form of one scored result
///
/// This is the record shape written to the snapshot file for the front end:
/// the listing fields plus the percent label under `score`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotRecord {
    pub property_id: String,
    pub location: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub nightly_price: f64,
    pub features: Vec<String>,
    pub tags: Vec<String>,
    pub score: String,
}

impl From<&ScoredProperty> for SnapshotRecord {
    fn from(scored: &ScoredProperty) -> Self {
        Self {
            property_id: scored.property.property_id.clone(),
            location: scored.property.location.clone(),
            property_type: scored.property.property_type.clone(),
            nightly_price: scored.property.nightly_price,
            features: scored.property.features.clone(),
            tags: scored.property.tags.clone(),
            score: scored.percent_label(),
        }
    }
}
