use anyhow::Result;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_logging::LogLevel;

use crate::{
    config::EngineConfig,
    error::PredictionError,
    explain::{explain, Explanation, FeatureContribution},
    features::{engineer_features, EngineeredFeatures},
    financial::{estimate_revenue, revenue_at_risk, risk_level, RevenueRange, RiskLevel, SuccessBand},
    input::MovieInput,
    model::{round_to_tenth, success_probability, ModelWeights},
    reference::ReferenceTables,
    telemetry::PredictionTelemetry,
};

static DEFAULT_ENGINE: Lazy<PredictionEngine> = Lazy::new(PredictionEngine::default);

/// Scored outcome of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Success probability, 5..98 with one decimal.
    pub success_probability: f64,
    /// Budget-adjusted risk tier.
    pub risk_level: RiskLevel,
    /// Revenue band in millions.
    pub estimated_revenue: RevenueRange,
    /// Expected capital loss in the failure scenario, millions.
    pub revenue_at_risk: u64,
    /// Contributions ranked by absolute impact.
    pub feature_importance: Vec<FeatureContribution>,
    /// Narrative explanation; never empty.
    pub explanation: Vec<String>,
    /// Recommendations; never empty.
    pub recommendations: Vec<String>,
}

impl PredictionResult {
    /// Coarse reading of the probability.
    #[must_use]
    pub fn band(&self) -> SuccessBand {
        SuccessBand::of(self.success_probability)
    }

    /// The `n` most influential contributions.
    #[must_use]
    pub fn top_features(&self, n: usize) -> &[FeatureContribution] {
        &self.feature_importance[..n.min(self.feature_importance.len())]
    }
}

/// Scoring engine. Immutable once built; share it freely across threads.
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    config: EngineConfig,
    telemetry: Option<PredictionTelemetry>,
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            telemetry: None,
        }
    }
}

impl PredictionEngine {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> PredictionEngineBuilder {
        PredictionEngineBuilder::default()
    }

    /// Engine with the built-in tables and weights.
    #[must_use]
    pub fn shared() -> &'static Self {
        &DEFAULT_ENGINE
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns telemetry handle.
    #[must_use]
    pub const fn telemetry(&self) -> Option<&PredictionTelemetry> {
        self.telemetry.as_ref()
    }

    /// Engineered signals for a movie under this engine's tables.
    #[must_use]
    pub fn features(&self, movie: &MovieInput) -> EngineeredFeatures {
        engineer_features(movie, &self.config.tables)
    }

    /// Scores a movie. Never fails: unknown categories and out-of-range
    /// months take neutral defaults.
    #[must_use]
    pub fn predict(&self, movie: &MovieInput) -> PredictionResult {
        let features = self.features(movie);
        let probability = success_probability(&features, &self.config.weights, movie.runtime);
        let Explanation {
            feature_importance,
            explanation,
            recommendations,
        } = explain(movie, &features, probability);
        let result = PredictionResult {
            success_probability: round_to_tenth(probability),
            risk_level: risk_level(probability, movie.budget),
            estimated_revenue: estimate_revenue(probability, movie.budget),
            revenue_at_risk: revenue_at_risk(probability, movie.budget),
            feature_importance,
            explanation,
            recommendations,
        };
        self.record(movie, &result);
        result
    }

    /// Validates the record first, then scores it.
    pub fn try_predict(&self, movie: &MovieInput) -> Result<PredictionResult, PredictionError> {
        if let Err(err) = movie.validate() {
            tracing::warn!(title = %movie.title, error = %err, "rejecting movie input");
            if let Some(tel) = &self.telemetry {
                let _ = tel.log(
                    LogLevel::Warn,
                    "prediction.rejected",
                    json!({ "title": movie.title, "field": err.field(), "reason": err.to_string() }),
                );
            }
            return Err(err.into());
        }
        Ok(self.predict(movie))
    }

    fn record(&self, movie: &MovieInput, result: &PredictionResult) {
        let tables = &self.config.tables;
        let mut fallbacks = Vec::new();
        if !tables.knows_genre(&movie.genre) {
            fallbacks.push("genre");
        }
        if !tables.knows_language(&movie.language) {
            fallbacks.push("language");
        }
        if !(1..=12).contains(&movie.release_month) {
            fallbacks.push("releaseMonth");
        }
        tracing::debug!(
            title = %movie.title,
            probability = result.success_probability,
            risk = %result.risk_level,
            "prediction completed"
        );
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Info,
                "prediction.completed",
                json!({
                    "title": movie.title,
                    "probability": result.success_probability,
                    "risk": result.risk_level,
                    "expected_revenue": result.estimated_revenue.expected,
                    "fallbacks": fallbacks,
                }),
            );
        }
    }
}

/// Builder for `PredictionEngine`.
#[derive(Default)]
pub struct PredictionEngineBuilder {
    config: Option<EngineConfig>,
    weights: Option<ModelWeights>,
    tables: Option<ReferenceTables>,
    telemetry: Option<PredictionTelemetry>,
}

impl PredictionEngineBuilder {
    /// Uses a loaded configuration as the base.
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the model weights.
    #[must_use]
    pub fn weights(mut self, weights: ModelWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Overrides the reference tables.
    #[must_use]
    pub fn tables(mut self, tables: ReferenceTables) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Sets telemetry.
    #[must_use]
    pub fn telemetry(mut self, telemetry: PredictionTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Builds the engine, validating the effective configuration.
    pub fn build(self) -> Result<PredictionEngine> {
        let mut config = self.config.unwrap_or_default();
        if let Some(weights) = self.weights {
            config.weights = weights;
        }
        if let Some(tables) = self.tables {
            config.tables = tables;
        }
        config.validate()?;
        Ok(PredictionEngine {
            config,
            telemetry: self.telemetry,
        })
    }
}

/// Scores a movie with the built-in tables and weights.
#[must_use]
pub fn predict(movie: &MovieInput) -> PredictionResult {
    PredictionEngine::shared().predict(movie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::sample_by_title;

    fn memory_telemetry() -> PredictionTelemetry {
        PredictionTelemetry::builder("prediction-engine")
            .in_memory()
            .build()
            .unwrap()
    }

    #[test]
    fn engine_scores_reference_movie() {
        let movie = sample_by_title("Horizon's Edge").unwrap();
        let result = predict(&movie);
        assert!((result.success_probability - 73.6).abs() < 1e-9);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.band(), SuccessBand::Strong);
        assert_eq!(result.top_features(3).len(), 3);
        assert_eq!(result.top_features(20).len(), 8);
    }

    #[test]
    fn completed_predictions_are_logged() {
        let engine = PredictionEngine::builder()
            .telemetry(memory_telemetry())
            .build()
            .unwrap();
        let movie = MovieInput {
            genre: "Musical".into(),
            ..MovieInput::default()
        };
        let result = engine.predict(&movie);
        let records = engine.telemetry().unwrap().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "prediction.completed");
        assert_eq!(records[0].metadata["fallbacks"], json!(["genre"]));
        assert_eq!(records[0].metadata["risk"], json!(result.risk_level));
    }

    #[test]
    fn strict_mode_rejects_and_logs() {
        let engine = PredictionEngine::builder()
            .telemetry(memory_telemetry())
            .build()
            .unwrap();
        let movie = MovieInput {
            budget: 0.0,
            ..MovieInput::default()
        };
        let err = engine.try_predict(&movie).unwrap_err();
        assert_eq!(err.field(), "budget");
        let records = engine.telemetry().unwrap().records();
        assert_eq!(records[0].message, "prediction.rejected");
        assert!(engine.try_predict(&MovieInput::default()).is_ok());
    }

    #[test]
    fn builder_rejects_invalid_weights() {
        let weights = ModelWeights {
            actor: 0.5,
            ..ModelWeights::default()
        };
        assert!(PredictionEngine::builder().weights(weights).build().is_err());
    }

    #[test]
    fn custom_tables_change_the_score() {
        let mut tables = ReferenceTables::builtin().clone();
        tables.genres.insert("Musical".into(), 0.9);
        let engine = PredictionEngine::builder().tables(tables).build().unwrap();
        let movie = MovieInput {
            genre: "Musical".into(),
            ..MovieInput::default()
        };
        let tuned = engine.predict(&movie).success_probability;
        let neutral = predict(&movie).success_probability;
        assert!(tuned > neutral);
    }
}
