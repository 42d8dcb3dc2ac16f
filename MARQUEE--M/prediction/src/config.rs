use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    model::ModelWeights,
    reference::{BudgetTier, ReferenceTables},
};

/// Tunable model configuration: weights plus reference tables.
///
/// Loaded from TOML. Every section is optional and falls back to the
/// built-in values:
///
/// ```toml
/// release_months = [0.5, 0.55, 0.6, 0.55, 0.8, 0.85, 0.9, 0.7, 0.55, 0.6, 0.85, 0.95]
///
/// [weights]
/// genre = 0.15
/// actor = 0.18
///
/// [genres]
/// Musical = 0.57
///
/// [[budget_tiers]]
/// below = 20.0
/// ratio = 0.75
/// ```
///
/// `[genres]` and `[languages]` entries are merged over the built-in tables;
/// `release_months` and `budget_tiers` replace theirs wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Model weights.
    pub weights: ModelWeights,
    /// Reference tables.
    pub tables: ReferenceTables,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EngineConfigSerde {
    #[serde(default)]
    weights: Option<ModelWeights>,
    #[serde(default)]
    genres: IndexMap<String, f64>,
    #[serde(default)]
    languages: IndexMap<String, f64>,
    #[serde(default)]
    release_months: Option<Vec<f64>>,
    #[serde(default)]
    budget_tiers: Option<Vec<BudgetTier>>,
    #[serde(default)]
    budget_ceiling_ratio: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ModelWeights::default(),
            tables: ReferenceTables::builtin().clone(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading engine config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let document: EngineConfigSerde = toml::from_str(raw)?;
        let mut config = Self::default();
        if let Some(weights) = document.weights {
            config.weights = weights;
        }
        config.tables.genres.extend(document.genres);
        config.tables.languages.extend(document.languages);
        if let Some(months) = document.release_months {
            config.tables.release_months = months;
        }
        if let Some(tiers) = document.budget_tiers {
            config.tables.budget_tiers = tiers;
        }
        if let Some(ratio) = document.budget_ceiling_ratio {
            config.tables.budget_ceiling_ratio = ratio;
        }
        config.validate()?;
        Ok(config)
    }

    /// Rejects weights and tables the model cannot use.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        let tables = &self.tables;
        for (name, value) in tables.genres.iter().chain(tables.languages.iter()) {
            ensure_unit("table entry", name, *value)?;
        }
        ensure!(
            tables.release_months.len() == 12,
            "release_months must list 12 values (got {})",
            tables.release_months.len()
        );
        for (idx, value) in tables.release_months.iter().enumerate() {
            ensure_unit("release month", &(idx + 1).to_string(), *value)?;
        }
        let mut previous = f64::NEG_INFINITY;
        for tier in &tables.budget_tiers {
            ensure!(
                tier.below > previous,
                "budget tiers must be strictly ascending (at {})",
                tier.below
            );
            ensure_unit("budget tier", &tier.below.to_string(), tier.ratio)?;
            previous = tier.below;
        }
        ensure_unit("budget ceiling", "ratio", tables.budget_ceiling_ratio)?;
        Ok(())
    }

    /// Borrowed view for printing.
    #[must_use]
    pub const fn view(&self) -> ConfigView<'_> {
        ConfigView {
            weights: &self.weights,
            tables: &self.tables,
        }
    }
}

/// Serializable snapshot of the effective configuration.
#[derive(Debug, Serialize)]
pub struct ConfigView<'a> {
    /// Active weights.
    pub weights: &'a ModelWeights,
    /// Active tables.
    pub tables: &'a ReferenceTables,
}

fn ensure_unit(kind: &str, name: &str, value: f64) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&value),
        "{kind} {name} must be within 0..=1 (got {value})"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_document_is_builtin() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn merges_tables_and_replaces_weights() {
        let raw = r#"
            [weights]
            genre = 0.20
            actor = 0.13

            [genres]
            Musical = 0.57
            Western = 0.40
        "#;
        let config = EngineConfig::from_toml_str(raw).unwrap();
        assert!((config.weights.genre - 0.20).abs() < f64::EPSILON);
        assert!((config.weights.director - 0.12).abs() < f64::EPSILON);
        assert!((config.tables.genre_index("Musical") - 0.57).abs() < f64::EPSILON);
        assert!((config.tables.genre_index("Western") - 0.40).abs() < f64::EPSILON);
        assert_eq!(config.tables.genres.len(), 17);
    }

    #[test]
    fn rejects_invalid_documents() {
        assert!(EngineConfig::from_toml_str("[weights]\ngenre = 0.9\n").is_err());
        assert!(EngineConfig::from_toml_str("release_months = [0.5, 0.5]\n").is_err());
        assert!(EngineConfig::from_toml_str("[languages]\nEnglish = 1.5\n").is_err());
        let descending = r#"
            [[budget_tiers]]
            below = 50.0
            ratio = 0.6

            [[budget_tiers]]
            below = 20.0
            ratio = 0.7
        "#;
        assert!(EngineConfig::from_toml_str(descending).is_err());
        assert!(EngineConfig::from_toml_str("unknown_key = 1\n").is_err());
    }

    #[test]
    fn loads_from_file_with_context() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "budget_ceiling_ratio = 0.2\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert!((config.tables.budget_risk(500.0) - 0.2).abs() < f64::EPSILON);

        let missing = EngineConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(missing.to_string().contains("reading engine config"));
    }
}
