use serde::{Deserialize, Serialize};

use crate::{input::MovieInput, reference::ReferenceTables};

/// Normalized signals derived once per prediction.
///
/// Every field is in [0, 1] for valid input; the two flags are exactly 0.0
/// or 1.0. The probability model and the explainability stage both read
/// from the same instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineeredFeatures {
    /// Historical success index of the genre.
    pub genre_index: f64,
    /// Market-size multiplier of the language.
    pub language_multiplier: f64,
    /// Lead actor popularity / 100.
    pub actor_impact: f64,
    /// Director score / 100.
    pub director_consistency: f64,
    /// Budget-risk ratio from the step function.
    pub budget_risk: f64,
    /// Release-month timing advantage.
    pub release_timing: f64,
    /// Trailer sentiment remapped from -1..1 to 0..1.
    pub trailer_sentiment: f64,
    /// Social buzz / 100.
    pub social_buzz: f64,
    /// 1.0 for sequels and franchise entries.
    pub franchise_bonus: f64,
    /// 1.0 when the crew holds awards.
    pub award_crew_bonus: f64,
}

impl EngineeredFeatures {
    /// Whether the franchise flag was set.
    #[must_use]
    pub fn is_franchise(&self) -> bool {
        self.franchise_bonus >= 1.0
    }
}

/// Maps raw attributes onto normalized signals. Never fails; categorical
/// misses take the neutral default.
#[must_use]
pub fn engineer_features(movie: &MovieInput, tables: &ReferenceTables) -> EngineeredFeatures {
    if !tables.knows_genre(&movie.genre) {
        tracing::debug!(genre = %movie.genre, "unknown genre, using neutral success index");
    }
    if !tables.knows_language(&movie.language) {
        tracing::debug!(language = %movie.language, "unknown language, using neutral multiplier");
    }
    if !(1..=12).contains(&movie.release_month) {
        tracing::debug!(month = movie.release_month, "release month out of range, using neutral timing");
    }

    EngineeredFeatures {
        genre_index: tables.genre_index(&movie.genre),
        language_multiplier: tables.language_multiplier(&movie.language),
        actor_impact: movie.lead_actor_popularity / 100.0,
        director_consistency: movie.director_score / 100.0,
        budget_risk: tables.budget_risk(movie.budget),
        release_timing: tables.release_timing(movie.release_month),
        trailer_sentiment: (movie.trailer_sentiment + 1.0) / 2.0,
        social_buzz: movie.social_buzz / 100.0,
        franchise_bonus: flag(movie.sequel_or_franchise),
        award_crew_bonus: flag(movie.has_award_winning_crew),
    }
}

const fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::NEUTRAL_DEFAULT;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn normalizes_ratings_and_flags() {
        let movie = MovieInput {
            genre: "Sci-Fi".into(),
            budget: 180.0,
            lead_actor_popularity: 85.0,
            director_score: 78.0,
            trailer_sentiment: 0.72,
            social_buzz: 82.0,
            has_award_winning_crew: true,
            ..MovieInput::default()
        };
        let features = engineer_features(&movie, ReferenceTables::builtin());
        assert!(close(features.genre_index, 0.70));
        assert!(close(features.language_multiplier, 1.0));
        assert!(close(features.actor_impact, 0.85));
        assert!(close(features.director_consistency, 0.78));
        assert!(close(features.budget_risk, 0.35));
        assert!(close(features.release_timing, 0.90));
        assert!(close(features.trailer_sentiment, 0.86));
        assert!(close(features.social_buzz, 0.82));
        assert!(close(features.franchise_bonus, 0.0));
        assert!(close(features.award_crew_bonus, 1.0));
        assert!(!features.is_franchise());
    }

    #[test]
    fn sentiment_extremes_map_to_unit_interval() {
        let tables = ReferenceTables::builtin();
        let low = engineer_features(
            &MovieInput {
                trailer_sentiment: -1.0,
                ..MovieInput::default()
            },
            tables,
        );
        let high = engineer_features(
            &MovieInput {
                trailer_sentiment: 1.0,
                ..MovieInput::default()
            },
            tables,
        );
        assert!(close(low.trailer_sentiment, 0.0));
        assert!(close(high.trailer_sentiment, 1.0));
    }

    #[test]
    fn unknown_categories_fall_back_to_neutral() {
        let movie = MovieInput {
            genre: "Musical".into(),
            language: "Esperanto".into(),
            release_month: 0,
            ..MovieInput::default()
        };
        let features = engineer_features(&movie, ReferenceTables::builtin());
        assert!(close(features.genre_index, NEUTRAL_DEFAULT));
        assert!(close(features.language_multiplier, NEUTRAL_DEFAULT));
        assert!(close(features.release_timing, NEUTRAL_DEFAULT));
    }
}
