use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Production attributes of a movie, as supplied by the caller.
///
/// Field names serialize in camelCase so records produced by the web form
/// deserialize unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    /// Working title. Not used in scoring.
    #[serde(default)]
    pub title: String,
    /// Genre name, e.g. `Sci-Fi`.
    pub genre: String,
    /// Primary language, e.g. `English`.
    pub language: String,
    /// Production budget in millions.
    pub budget: f64,
    /// Runtime in minutes.
    pub runtime: f64,
    /// Calendar month of release, 1-based.
    pub release_month: i32,
    /// Lead actor popularity, 0-100.
    pub lead_actor_popularity: f64,
    /// Director track record, 0-100.
    pub director_score: f64,
    /// Trailer sentiment, -1 (hostile) to +1 (enthusiastic).
    pub trailer_sentiment: f64,
    /// Social media buzz, 0-100.
    pub social_buzz: f64,
    /// Sequel or part of an existing franchise.
    #[serde(default)]
    pub sequel_or_franchise: bool,
    /// Crew includes award winners.
    #[serde(default)]
    pub has_award_winning_crew: bool,
}

impl Default for MovieInput {
    fn default() -> Self {
        Self {
            title: String::new(),
            genre: "Action".into(),
            language: "English".into(),
            budget: 80.0,
            runtime: 120.0,
            release_month: 7,
            lead_actor_popularity: 65.0,
            director_score: 60.0,
            trailer_sentiment: 0.5,
            social_buzz: 55.0,
            sequel_or_franchise: false,
            has_award_winning_crew: false,
        }
    }
}

impl MovieInput {
    /// Checks the numeric fields against their documented domains.
    ///
    /// Genre and language are not checked; unknown names keep their neutral
    /// fallback in both lenient and strict scoring.
    pub fn validate(&self) -> Result<(), ValidationError> {
        positive("budget", self.budget)?;
        positive("runtime", self.runtime)?;
        if !(1..=12).contains(&self.release_month) {
            return Err(ValidationError::ReleaseMonth(self.release_month));
        }
        within("leadActorPopularity", self.lead_actor_popularity, 0.0, 100.0)?;
        within("directorScore", self.director_score, 0.0, 100.0)?;
        within("trailerSentiment", self.trailer_sentiment, -1.0, 1.0)?;
        within("socialBuzz", self.social_buzz, 0.0, 100.0)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
