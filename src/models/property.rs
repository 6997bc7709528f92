use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A vacation-rental listing
///
/// Immutable once generated; owned by the property catalog. `features` and
/// `tags` are kept in their on-disk order so that catalog ordering stays
/// reproducible; set semantics only apply to the derived token view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub property_id: String,
    pub location: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub nightly_price: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub capacity: u32,
    pub lat: f64,
    pub lon: f64,
}

impl Property {
    /// The union of this property's features and tags as affinity tokens
    ///
    /// Tokens are trimmed and case-folded; empty tokens are dropped. The
    /// raw `tags` field is left untouched: the environment match compares
    /// against it verbatim.
    pub fn tokens(&self) -> BTreeSet<String> {
        self.features
            .iter()
            .chain(self.tags.iter())
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}
