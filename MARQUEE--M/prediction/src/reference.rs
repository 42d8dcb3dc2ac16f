use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Value returned by every lookup that misses its table.
pub const NEUTRAL_DEFAULT: f64 = 0.5;

static BUILTIN: Lazy<ReferenceTables> = Lazy::new(ReferenceTables::build_builtin);

/// Upper-exclusive budget bracket of the budget-risk step function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetTier {
    /// Budgets strictly below this value (millions) fall in the tier.
    pub below: f64,
    /// Risk ratio assigned to the tier.
    pub ratio: f64,
}

/// Static reference data the feature engineer reads from.
///
/// Genre and language names are matched exactly (case-sensitive). Insertion
/// order is kept so listings come out in the order the tables were written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    /// Genre name to historical success index.
    pub genres: IndexMap<String, f64>,
    /// Language name to market-size multiplier.
    pub languages: IndexMap<String, f64>,
    /// Timing advantage per release month, January first.
    pub release_months: Vec<f64>,
    /// Budget brackets, ascending by `below`.
    pub budget_tiers: Vec<BudgetTier>,
    /// Ratio for budgets at or above the last bracket.
    pub budget_ceiling_ratio: f64,
}

impl ReferenceTables {
    /// Shared built-in tables, initialised on first use.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    fn build_builtin() -> Self {
        let genres = [
            ("Action", 0.72),
            ("Adventure", 0.68),
            ("Animation", 0.75),
            ("Comedy", 0.58),
            ("Crime", 0.52),
            ("Documentary", 0.45),
            ("Drama", 0.48),
            ("Family", 0.70),
            ("Fantasy", 0.65),
            ("Horror", 0.62),
            ("Mystery", 0.50),
            ("Romance", 0.45),
            ("Sci-Fi", 0.70),
            ("Thriller", 0.55),
            ("War", 0.42),
            ("Western", 0.35),
        ];
        let languages = [
            ("English", 1.0),
            ("Spanish", 0.65),
            ("French", 0.55),
            ("German", 0.45),
            ("Japanese", 0.60),
            ("Korean", 0.55),
            ("Hindi", 0.70),
            ("Mandarin", 0.75),
            ("Italian", 0.40),
            ("Portuguese", 0.45),
        ];
        Self {
            genres: genres
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect(),
            languages: languages
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect(),
            // Jan dump month, May-Jul summer run, Nov-Dec holiday peak.
            release_months: vec![
                0.50, 0.55, 0.60, 0.55, 0.80, 0.85, 0.90, 0.70, 0.55, 0.60, 0.85, 0.95,
            ],
            budget_tiers: vec![
                BudgetTier { below: 20.0, ratio: 0.75 },
                BudgetTier { below: 50.0, ratio: 0.65 },
                BudgetTier { below: 100.0, ratio: 0.55 },
                BudgetTier { below: 150.0, ratio: 0.45 },
                BudgetTier { below: 200.0, ratio: 0.35 },
            ],
            budget_ceiling_ratio: 0.25,
        }
    }

    /// Historical success index for a genre, neutral when unknown.
    #[must_use]
    pub fn genre_index(&self, genre: &str) -> f64 {
        self.genres.get(genre).copied().unwrap_or(NEUTRAL_DEFAULT)
    }

    /// Market multiplier for a language, neutral when unknown.
    #[must_use]
    pub fn language_multiplier(&self, language: &str) -> f64 {
        self.languages
            .get(language)
            .copied()
            .unwrap_or(NEUTRAL_DEFAULT)
    }

    /// Timing advantage for a 1-based month, neutral outside 1..=12.
    #[must_use]
    pub fn release_timing(&self, month: i32) -> f64 {
        usize::try_from(month)
            .ok()
            .and_then(|m| m.checked_sub(1))
            .and_then(|idx| self.release_months.get(idx))
            .copied()
            .unwrap_or(NEUTRAL_DEFAULT)
    }

    /// Budget-risk ratio; larger budgets carry more break-even pressure.
    #[must_use]
    pub fn budget_risk(&self, budget: f64) -> f64 {
        self.budget_tiers
            .iter()
            .find(|tier| budget < tier.below)
            .map_or(self.budget_ceiling_ratio, |tier| tier.ratio)
    }

    /// Whether the genre has an entry of its own.
    #[must_use]
    pub fn knows_genre(&self, genre: &str) -> bool {
        self.genres.contains_key(genre)
    }

    /// Whether the language has an entry of its own.
    #[must_use]
    pub fn knows_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// Known genre names in table order.
    pub fn genre_names(&self) -> impl Iterator<Item = &str> {
        self.genres.keys().map(String::as_str)
    }

    /// Known language names in table order.
    pub fn language_names(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
