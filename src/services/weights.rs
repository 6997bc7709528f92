/// Raw default weights, prior to normalization. Relative magnitudes only.
pub const DEFAULT_AFFORDABILITY_WEIGHT: f64 = 10.0;
pub const DEFAULT_ENVIRONMENT_WEIGHT: f64 = 5.0;
pub const DEFAULT_AFFINITY_WEIGHT: f64 = 3.0;

/// The three scoring weights: affordability, environment match, affinity
///
/// Constructed from non-negative raw weights and normalized into
/// per-component shares summing to 1 before scoring. The scoring engine
/// re-normalizes on every call; normalizing already-normalized weights is a
/// no-op up to floating-point tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreferenceWeights {
    pub affordability: f64,
    pub environment: f64,
    pub affinity: f64,
}

impl Default for PreferenceWeights {
    fn default() -> Self {
        Self::new(
            DEFAULT_AFFORDABILITY_WEIGHT,
            DEFAULT_ENVIRONMENT_WEIGHT,
            DEFAULT_AFFINITY_WEIGHT,
        )
    }
}

impl PreferenceWeights {
    pub fn new(affordability: f64, environment: f64, affinity: f64) -> Self {
        Self {
            affordability,
            environment,
            affinity,
        }
    }

    /// Normalizes the weights in place into shares summing to 1.0.
    ///
    /// When the raw sum is 0, affordability alone receives weight 1.0.
    pub fn normalize(&mut self) {
        let total = self.affordability + self.environment + self.affinity;
        if total == 0.0 {
            self.affordability = 1.0;
            self.environment = 0.0;
            self.affinity = 0.0;
        } else {
            self.affordability /= total;
            self.environment /= total;
            self.affinity /= total;
        }
    }

    /// Returns a normalized copy
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn sum(&self) -> f64 {
        self.affordability + self.environment + self.affinity
    }
}
