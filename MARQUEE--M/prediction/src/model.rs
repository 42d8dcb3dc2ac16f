use serde::{Deserialize, Serialize};

use crate::features::EngineeredFeatures;

/// Lowest probability the model will ever report.
pub const MIN_PROBABILITY: f64 = 5.0;
/// Highest probability the model will ever report.
pub const MAX_PROBABILITY: f64 = 98.0;
/// Runtimes at or below this many minutes are penalized.
pub const RUNTIME_FLOOR: f64 = 80.0;
/// Runtimes above this many minutes are penalized.
pub const RUNTIME_CEILING: f64 = 180.0;
/// Multiplier applied to runtimes outside the accepted window.
pub const RUNTIME_PENALTY: f64 = 0.9;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Linear weights of the nine scored signals. Language reach is applied as
/// a separate multiplier and has no weight here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelWeights {
    /// Genre success index.
    pub genre: f64,
    /// Lead actor impact.
    pub actor: f64,
    /// Director consistency.
    pub director: f64,
    /// Budget-risk ratio.
    pub budget_risk: f64,
    /// Release timing.
    pub timing: f64,
    /// Normalized trailer sentiment.
    pub sentiment: f64,
    /// Normalized social buzz.
    pub buzz: f64,
    /// Franchise flag.
    pub franchise: f64,
    /// Award-winning crew flag.
    pub award_crew: f64,
}

impl Default for ModelWeights {
    fn default() -> Self {
        Self {
            genre: 0.15,
            actor: 0.18,
            director: 0.12,
            budget_risk: 0.10,
            timing: 0.12,
            sentiment: 0.15,
            buzz: 0.10,
            franchise: 0.05,
            award_crew: 0.03,
        }
    }
}

impl ModelWeights {
    fn as_array(&self) -> [(&'static str, f64); 9] {
        [
            ("genre", self.genre),
            ("actor", self.actor),
            ("director", self.director),
            ("budget_risk", self.budget_risk),
            ("timing", self.timing),
            ("sentiment", self.sentiment),
            ("buzz", self.buzz),
            ("franchise", self.franchise),
            ("award_crew", self.award_crew),
        ]
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.as_array().iter().map(|(_, w)| w).sum()
    }

    /// Checks each weight is finite and non-negative and that they sum to 1.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, weight) in self.as_array() {
            anyhow::ensure!(
                weight.is_finite() && weight >= 0.0,
                "weight {name} must be a non-negative number (got {weight})"
            );
        }
        let total = self.total();
        anyhow::ensure!(
            (total - 1.0).abs() <= WEIGHT_SUM_TOLERANCE,
            "weights must sum to 1.0 (got {total})"
        );
        Ok(())
    }

    /// Weighted sum of the engineered signals, before any adjustment.
    ///
    /// Summed left to right in listing order, without fused multiply-add.
    #[must_use]
    #[allow(clippy::suboptimal_flops)]
    pub fn base_score(&self, features: &EngineeredFeatures) -> f64 {
        features.genre_index * self.genre
            + features.actor_impact * self.actor
            + features.director_consistency * self.director
            + features.budget_risk * self.budget_risk
            + features.release_timing * self.timing
            + features.trailer_sentiment * self.sentiment
            + features.social_buzz * self.buzz
            + features.franchise_bonus * self.franchise
            + features.award_crew_bonus * self.award_crew
    }
}

/// Scale applied for language reach; a zero-reach language keeps half.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn language_reach(language_multiplier: f64) -> f64 {
    0.5 + 0.5 * language_multiplier
}

/// Whether a runtime falls outside the accepted window.
#[must_use]
pub fn runtime_penalized(runtime: f64) -> bool {
    runtime <= RUNTIME_FLOOR || runtime > RUNTIME_CEILING
}

/// Success probability on the 5..98 scale, unrounded.
///
/// NaN collapses to the lower bound so garbage input can never escape the
/// clamp.
#[must_use]
pub fn success_probability(
    features: &EngineeredFeatures,
    weights: &ModelWeights,
    runtime: f64,
) -> f64 {
    let mut score = weights.base_score(features) * language_reach(features.language_multiplier);
    if runtime_penalized(runtime) {
        score *= RUNTIME_PENALTY;
    }
    (score * 100.0).max(MIN_PROBABILITY).min(MAX_PROBABILITY)
}

/// Rounds to one decimal place, halves rounding up.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
