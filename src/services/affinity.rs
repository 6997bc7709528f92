use std::collections::{BTreeSet, HashMap};

use crate::models::{InteractionEvent, Property};

/// Per-token, per-user preference strength in [0, 1] learned from
/// interaction history. Derived and recomputed on every scoring call;
/// never persisted.
pub type AffinityMap = HashMap<String, f64>;

/// Builds the token-preference map for one user.
///
/// Every retained interaction adds its weight to each token (feature ∪ tag)
/// of the referenced property; additive accumulation across repeated events
/// captures both frequency and type-of-engagement signal. The totals are
/// then max-normalized so the strongest token is exactly 1.0 regardless of
/// the user's total interaction volume, keeping the affinity term on the
/// same [0, 1] scale as the other score components.
///
/// Interactions referencing properties absent from the catalog are skipped.
/// A user with no usable interactions yields an empty map.
pub fn build_affinity(
    user_id: &str,
    interactions: &[InteractionEvent],
    catalog: &[Property],
) -> AffinityMap {
    let token_lookup: HashMap<&str, BTreeSet<String>> = catalog
        .iter()
        .map(|p| (p.property_id.as_str(), p.tokens()))
        .collect();

    let mut totals = AffinityMap::new();
    for event in interactions.iter().filter(|e| e.user_id == user_id) {
        let Some(tokens) = token_lookup.get(event.property_id.as_str()) else {
            tracing::debug!(
                property_id = %event.property_id,
                "Skipping interaction with unknown property"
            );
            continue;
        };
        let weight = event.effective_weight();
        for token in tokens {
            *totals.entry(token.clone()).or_insert(0.0) += weight;
        }
    }

    if totals.is_empty() {
        return totals;
    }

    // Guard against a zero divisor (all-zero stored weights) by dividing by 1.
    let max = totals.values().fold(0.0_f64, |acc, &v| acc.max(v));
    let divisor = if max > 0.0 { max } else { 1.0 };
    for value in totals.values_mut() {
        *value /= divisor;
    }

    totals
}
