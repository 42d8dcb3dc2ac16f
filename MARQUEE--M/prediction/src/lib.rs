#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms,
    missing_docs
)]

//! Marquee prediction engine – scores a movie's commercial prospects from its
//! production attributes and explains the score.
//!
//! The pipeline runs forward only: raw input is engineered into normalized
//! signals once, the probability model and the explainability stage both
//! read those signals, and the financial estimates derive from the
//! probability.

/// Strict-mode validation errors.
pub mod error;

/// Caller-supplied movie record.
pub mod input;

/// Static reference tables and their total lookups.
pub mod reference;

/// Feature engineering.
pub mod features;

/// Weighted probability model.
pub mod model;

/// Risk tier and revenue estimates.
pub mod financial;

pub mod explain;

/// TOML configuration of weights and tables.
pub mod config;

/// Telemetry for the prediction engine.
pub mod telemetry;

/// Reference movies.
pub mod samples;

/// Engine wiring the stages together.
pub mod engine;

pub use config::EngineConfig;
pub use engine::{predict, PredictionEngine, PredictionEngineBuilder, PredictionResult};
pub use error::{PredictionError, ValidationError};
pub use explain::{explain, feature_importance, explanations, recommendations, FeatureContribution};
pub use features::{engineer_features, EngineeredFeatures};
pub use financial::{
    estimate_revenue, format_millions, revenue_at_risk, risk_level, RevenueRange, RiskLevel,
    SuccessBand,
};
pub use input::MovieInput;
pub use model::{success_probability, ModelWeights};
pub use reference::ReferenceTables;
pub use samples::sample_movies;
pub use telemetry::{PredictionTelemetry, PredictionTelemetryBuilder};
