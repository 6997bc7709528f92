pub mod affinity;
pub mod scoring;
pub mod weights;

pub use affinity::{build_affinity, AffinityMap};
pub use scoring::{score_properties, ScoringEngine, UserPrefs};
pub use weights::PreferenceWeights;
