use std::cmp::Ordering;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Property, ScoredProperty, SnapshotRecord, User};
use crate::store::{
    InteractionSource, JsonInteractionStore, JsonPropertyStore, JsonSnapshotStore, PropertySource,
    SnapshotSink,
};

use super::affinity::{build_affinity, AffinityMap};
use super::weights::PreferenceWeights;

/// Small positive floor preventing division by zero when the budget is 0
const BUDGET_EPSILON: f64 = 0.001;

/// The scoring-relevant slice of a user profile
#[derive(Debug, Clone)]
pub struct UserPrefs {
    pub budget_max: f64,
    pub preferred_env: Option<String>,
}

impl UserPrefs {
    /// Extracts the scoring inputs from a profile.
    ///
    /// A profile without `budget_max` violates the data contract for a
    /// scoring subject and is surfaced to the caller, never defaulted.
    pub fn from_user(user: &User) -> AppResult<Self> {
        let budget_max = user.budget_max.ok_or_else(|| {
            AppError::DataIntegrity(format!("user {} has no budget_max", user.id))
        })?;
        Ok(Self {
            budget_max,
            preferred_env: user.preferred_env.clone(),
        })
    }
}

/// Scores every property in the catalog for one user, descending by match
/// score.
///
/// The sort is stable: equal match scores preserve catalog input order, with
/// no secondary key. Weights are re-normalized before use, so passing raw
/// weights is tolerated.
pub fn score_properties(
    catalog: &[Property],
    prefs: &UserPrefs,
    weights: &PreferenceWeights,
    affinity: &AffinityMap,
) -> Vec<ScoredProperty> {
    let weights = weights.normalized();

    let mut scored: Vec<ScoredProperty> = catalog
        .iter()
        .map(|property| score_one(property, prefs, &weights, affinity))
        .collect();

    scored.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
    });

    scored
}

fn score_one(
    property: &Property,
    prefs: &UserPrefs,
    weights: &PreferenceWeights,
    affinity: &AffinityMap,
) -> ScoredProperty {
    // Linear in price relative to budget: 0 at or above budget, 1 when free.
    let affordability_score = ((prefs.budget_max - property.nightly_price)
        / prefs.budget_max.max(BUDGET_EPSILON))
    .clamp(0.0, 1.0);

    // Exact string membership against the raw tags. The preferred
    // environment is NOT case-folded, unlike affinity tokens.
    let environment_score = match prefs.preferred_env.as_deref() {
        Some(env) if !env.is_empty() && property.tags.iter().any(|t| t == env) => 1.0,
        _ => 0.0,
    };

    // Mean affinity over the property's tokens that the user has a learned
    // preference for; tokens absent from the map contribute to neither the
    // numerator nor the denominator.
    let mut sum = 0.0;
    let mut matched = 0usize;
    for token in property.tokens() {
        if let Some(value) = affinity.get(&token) {
            sum += value;
            matched += 1;
        }
    }
    let affinity_score = if matched > 0 { sum / matched as f64 } else { 0.0 };

    let match_score = weights.affordability * affordability_score
        + weights.environment * environment_score
        + weights.affinity * affinity_score;

    ScoredProperty {
        property: property.clone(),
        affordability_score,
        environment_score,
        affinity_score,
        match_score,
    }
}

/// Recommendation engine over the catalog, interaction, and snapshot
/// collaborators.
///
/// Each `top_matches` call is a self-contained, synchronous computation over
/// freshly loaded inputs; nothing is cached between calls.
pub struct ScoringEngine {
    properties: Arc<dyn PropertySource>,
    interactions: Arc<dyn InteractionSource>,
    snapshots: Arc<dyn SnapshotSink>,
    weights: PreferenceWeights,
}

impl ScoringEngine {
    pub fn new(
        properties: Arc<dyn PropertySource>,
        interactions: Arc<dyn InteractionSource>,
        snapshots: Arc<dyn SnapshotSink>,
    ) -> Self {
        Self {
            properties,
            interactions,
            snapshots,
            weights: PreferenceWeights::default(),
        }
    }

    /// Engine wired to the flat-file stores at the configured paths
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(JsonPropertyStore::from_config(config)),
            Arc::new(JsonInteractionStore::from_config(config)),
            Arc::new(JsonSnapshotStore::from_config(config)),
        )
    }

    /// Overrides the raw scoring weights
    pub fn with_weights(mut self, weights: PreferenceWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Computes the top `n` matches for a user.
    ///
    /// Loads the catalog and the user's interaction-derived affinity, scores
    /// and ranks every property, and truncates to `n` (a shorter catalog
    /// returns all of it). The truncated list is written to the snapshot
    /// sink unconditionally on every call; an empty catalog writes an empty
    /// snapshot and is not an error.
    pub fn top_matches(&self, user: &User, n: usize) -> AppResult<Vec<ScoredProperty>> {
        let prefs = UserPrefs::from_user(user)?;
        let catalog = self.properties.load_properties()?;
        let interactions = self.interactions.load_interactions()?;
        let affinity = build_affinity(&user.id, &interactions, &catalog);

        let mut scored = score_properties(&catalog, &prefs, &self.weights, &affinity);
        scored.truncate(n);

        let records: Vec<SnapshotRecord> = scored.iter().map(SnapshotRecord::from).collect();
        self.snapshots.save(&records)?;

        tracing::info!(
            user_id = %user.id,
            returned = scored.len(),
            catalog_size = catalog.len(),
            "Top matches computed"
        );

        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventKind, InteractionEvent};
    use crate::store::{MockInteractionSource, MockPropertySource, MockSnapshotSink};
    use chrono::Utc;

    fn property(id: &str, price: f64, tags: &[&str]) -> Property {
        Property {
            property_id: id.to_string(),
            location: "Tofino".to_string(),
            property_type: "cabin".to_string(),
            nightly_price: price,
            features: vec![],
            tags: tags.iter().map(|s| s.to_string()).collect(),
            capacity: 4,
            lat: 49.152,
            lon: -125.906,
        }
    }

    fn user(budget_max: Option<f64>, preferred_env: Option<&str>) -> User {
        User {
            id: "u1".to_string(),
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            group_size: None,
            preferred_env: preferred_env.map(|s| s.to_string()),
            budget_min: None,
            budget_max,
            travel_start: None,
            travel_end: None,
        }
    }

    fn prefs(budget_max: f64, preferred_env: Option<&str>) -> UserPrefs {
        UserPrefs {
            budget_max,
            preferred_env: preferred_env.map(|s| s.to_string()),
        }
    }

    fn save_event(user_id: &str, property_id: &str) -> InteractionEvent {
        InteractionEvent {
            ts: Utc::now(),
            user_id: user_id.to_string(),
            property_id: property_id.to_string(),
            event: EventKind::Save,
            weight: Some(3.0),
        }
    }

    // Two properties, budget 300, preferred env "lake", no interactions:
    // P2 wins on the environment term.
    #[test]
    fn test_weighted_blend_without_interactions() {
        let catalog = vec![
            property("P1", 150.0, &["beach"]),
            property("P2", 200.0, &["lake"]),
        ];
        let scored = score_properties(
            &catalog,
            &prefs(300.0, Some("lake")),
            &PreferenceWeights::default(),
            &AffinityMap::new(),
        );

        assert_eq!(scored[0].property.property_id, "P2");
        assert_eq!(scored[1].property.property_id, "P1");

        let p2 = &scored[0];
        let p1 = &scored[1];
        assert!((p1.affordability_score - 0.5).abs() < 1e-9);
        assert!((p2.affordability_score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(p1.environment_score, 0.0);
        assert_eq!(p2.environment_score, 1.0);
        assert_eq!(p1.affinity_score, 0.0);
        assert_eq!(p2.affinity_score, 0.0);
        assert!((p1.match_score - 0.2778).abs() < 1e-3);
        assert!((p2.match_score - 0.4630).abs() < 1e-3);
    }

    // A saved property's tokens dominate the affinity map and raise its
    // match score relative to the no-interaction case.
    #[test]
    fn test_affinity_term_raises_saved_property() {
        let catalog = vec![
            property("P1", 150.0, &["beach"]),
            property("P2", 200.0, &["lake"]),
        ];
        let interactions = vec![save_event("u1", "P1")];
        let affinity = build_affinity("u1", &interactions, &catalog);
        assert_eq!(affinity["beach"], 1.0);

        let user_prefs = prefs(300.0, Some("lake"));
        let weights = PreferenceWeights::default();

        let without = score_properties(&catalog, &user_prefs, &weights, &AffinityMap::new());
        let with = score_properties(&catalog, &user_prefs, &weights, &affinity);

        let p1_without = without.iter().find(|s| s.property.property_id == "P1").unwrap();
        let p1_with = with.iter().find(|s| s.property.property_id == "P1").unwrap();
        assert_eq!(p1_with.affinity_score, 1.0);
        assert!(p1_with.match_score > p1_without.match_score);
    }

    #[test]
    fn test_environment_match_is_case_sensitive() {
        // Tags are compared verbatim; affinity tokens are folded, the
        // environment term is not.
        let catalog = vec![property("P1", 150.0, &["Lake"])];
        let scored = score_properties(
            &catalog,
            &prefs(300.0, Some("lake")),
            &PreferenceWeights::default(),
            &AffinityMap::new(),
        );
        assert_eq!(scored[0].environment_score, 0.0);
    }

    #[test]
    fn test_no_preferred_environment_scores_zero_everywhere() {
        let catalog = vec![property("P1", 150.0, &["lake"])];
        for env in [None, Some("")] {
            let scored = score_properties(
                &catalog,
                &prefs(300.0, env),
                &PreferenceWeights::default(),
                &AffinityMap::new(),
            );
            assert_eq!(scored[0].environment_score, 0.0);
        }
    }

    // A zero budget clamps every affordability score to 0 instead of
    // dividing by zero.
    #[test]
    fn test_zero_budget_clamps_affordability() {
        let catalog = vec![property("P1", 150.0, &[]), property("P2", 0.0, &[])];
        let scored = score_properties(
            &catalog,
            &prefs(0.0, None),
            &PreferenceWeights::default(),
            &AffinityMap::new(),
        );
        for s in &scored {
            assert_eq!(s.affordability_score, 0.0);
        }
    }

    #[test]
    fn test_affordability_bounds_and_monotonicity() {
        let budget = 200.0;
        let scores: Vec<f64> = [0.0, 100.0, 200.0, 500.0]
            .iter()
            .map(|&price| {
                let catalog = vec![property("P", price, &[])];
                score_properties(
                    &catalog,
                    &prefs(budget, None),
                    &PreferenceWeights::default(),
                    &AffinityMap::new(),
                )[0]
                .affordability_score
            })
            .collect();

        assert_eq!(scores[0], 1.0); // free
        assert!((scores[1] - 0.5).abs() < 1e-9);
        assert_eq!(scores[2], 0.0); // at budget
        assert_eq!(scores[3], 0.0); // above budget
        // Lower price never scores lower
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_match_scores_bounded_with_normalized_weights() {
        let catalog = vec![
            property("P1", 0.0, &["lake"]),
            property("P2", 150.0, &["beach"]),
            property("P3", 999.0, &[]),
        ];
        let mut affinity = AffinityMap::new();
        affinity.insert("beach".to_string(), 1.0);
        affinity.insert("lake".to_string(), 0.5);

        let scored = score_properties(
            &catalog,
            &prefs(300.0, Some("lake")),
            &PreferenceWeights::default(),
            &affinity,
        );
        for s in &scored {
            assert!((0.0..=1.0).contains(&s.affordability_score));
            assert!(s.environment_score == 0.0 || s.environment_score == 1.0);
            assert!((0.0..=1.0).contains(&s.affinity_score));
            assert!((0.0..=1.0).contains(&s.match_score));
        }
    }

    #[test]
    fn test_raw_weights_are_normalized_before_scoring() {
        let catalog = vec![property("P1", 150.0, &["lake"])];
        let user_prefs = prefs(300.0, Some("lake"));
        let raw = score_properties(
            &catalog,
            &user_prefs,
            &PreferenceWeights::new(10.0, 5.0, 3.0),
            &AffinityMap::new(),
        );
        let pre_normalized = score_properties(
            &catalog,
            &user_prefs,
            &PreferenceWeights::new(10.0, 5.0, 3.0).normalized(),
            &AffinityMap::new(),
        );
        assert!((raw[0].match_score - pre_normalized[0].match_score).abs() < 1e-12);
    }

    #[test]
    fn test_equal_scores_preserve_catalog_order() {
        // Identical listings tie exactly; the stable sort must keep the
        // catalog input order with no secondary key.
        let catalog = vec![
            property("P1", 150.0, &[]),
            property("P2", 150.0, &[]),
            property("P3", 150.0, &[]),
        ];
        let scored = score_properties(
            &catalog,
            &prefs(300.0, None),
            &PreferenceWeights::default(),
            &AffinityMap::new(),
        );
        let order: Vec<&str> = scored.iter().map(|s| s.property.property_id.as_str()).collect();
        assert_eq!(order, vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn test_affinity_average_ignores_unknown_tokens() {
        // P1 tokens: beach (0.8 in map) and surf (absent) → mean is 0.8,
        // not 0.4.
        let catalog = vec![property("P1", 150.0, &["beach", "surf"])];
        let mut affinity = AffinityMap::new();
        affinity.insert("beach".to_string(), 0.8);

        let scored = score_properties(
            &catalog,
            &prefs(300.0, None),
            &PreferenceWeights::default(),
            &affinity,
        );
        assert!((scored[0].affinity_score - 0.8).abs() < 1e-12);
    }

    // ---- Engine tests over mocked collaborators ----

    fn mock_catalog(catalog: Vec<Property>) -> MockPropertySource {
        let mut properties = MockPropertySource::new();
        properties
            .expect_load_properties()
            .returning(move || Ok(catalog.clone()));
        properties
    }

    fn mock_interactions(rows: Vec<InteractionEvent>) -> MockInteractionSource {
        let mut interactions = MockInteractionSource::new();
        interactions
            .expect_load_interactions()
            .returning(move || Ok(rows.clone()));
        interactions
    }

    #[test]
    fn test_top_matches_truncates_and_snapshots() {
        let catalog = vec![
            property("P1", 150.0, &["beach"]),
            property("P2", 200.0, &["lake"]),
        ];

        let mut snapshots = MockSnapshotSink::new();
        snapshots
            .expect_save()
            .times(1)
            .withf(|records: &[SnapshotRecord]| {
                records.len() == 1 && records[0].property_id == "P2" && records[0].score == "46.3%"
            })
            .returning(|_| Ok(()));

        let engine = ScoringEngine::new(
            Arc::new(mock_catalog(catalog)),
            Arc::new(mock_interactions(vec![])),
            Arc::new(snapshots),
        );

        let top = engine.top_matches(&user(Some(300.0), Some("lake")), 1).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].property.property_id, "P2");
    }

    #[test]
    fn test_top_matches_returns_whole_catalog_when_short() {
        let catalog = vec![property("P1", 150.0, &[])];

        let mut snapshots = MockSnapshotSink::new();
        snapshots
            .expect_save()
            .times(1)
            .withf(|records: &[SnapshotRecord]| records.len() == 1)
            .returning(|_| Ok(()));

        let engine = ScoringEngine::new(
            Arc::new(mock_catalog(catalog)),
            Arc::new(mock_interactions(vec![])),
            Arc::new(snapshots),
        );

        let top = engine.top_matches(&user(Some(300.0), None), 10).unwrap();
        assert_eq!(top.len(), 1);
    }

    // An empty catalog yields an empty result and the snapshot is still
    // overwritten, with an empty list.
    #[test]
    fn test_empty_catalog_overwrites_snapshot_with_empty_list() {
        let mut snapshots = MockSnapshotSink::new();
        snapshots
            .expect_save()
            .times(1)
            .withf(|records: &[SnapshotRecord]| records.is_empty())
            .returning(|_| Ok(()));

        let engine = ScoringEngine::new(
            Arc::new(mock_catalog(vec![])),
            Arc::new(mock_interactions(vec![])),
            Arc::new(snapshots),
        );

        let top = engine.top_matches(&user(Some(300.0), None), 5).unwrap();
        assert!(top.is_empty());
    }

    #[test]
    fn test_missing_budget_is_a_data_integrity_error() {
        let mut snapshots = MockSnapshotSink::new();
        snapshots.expect_save().times(0);

        let engine = ScoringEngine::new(
            Arc::new(mock_catalog(vec![property("P1", 150.0, &[])])),
            Arc::new(mock_interactions(vec![])),
            Arc::new(snapshots),
        );

        let result = engine.top_matches(&user(None, None), 5);
        assert!(matches!(result, Err(AppError::DataIntegrity(_))));
    }

    #[test]
    fn test_interactions_feed_affinity_through_engine() {
        let catalog = vec![
            property("P1", 150.0, &["beach"]),
            property("P2", 200.0, &["lake"]),
        ];

        let mut snapshots = MockSnapshotSink::new();
        snapshots.expect_save().returning(|_| Ok(()));

        let engine = ScoringEngine::new(
            Arc::new(mock_catalog(catalog)),
            Arc::new(mock_interactions(vec![save_event("u1", "P1")])),
            Arc::new(snapshots),
        );

        // No preferred env: the affinity term alone decides, and the saved
        // property's affordability edge compounds it.
        let top = engine.top_matches(&user(Some(300.0), None), 2).unwrap();
        assert_eq!(top[0].property.property_id, "P1");
        assert_eq!(top[0].affinity_score, 1.0);
    }
}
