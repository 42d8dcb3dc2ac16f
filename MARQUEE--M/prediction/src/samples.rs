use crate::input::MovieInput;

/// Reference movies used for demos and regression checks.
#[must_use]
pub fn sample_movies() -> Vec<MovieInput> {
    vec![
        MovieInput {
            title: "Horizon's Edge".into(),
            genre: "Sci-Fi".into(),
            language: "English".into(),
            budget: 180.0,
            runtime: 148.0,
            release_month: 7,
            lead_actor_popularity: 85.0,
            director_score: 78.0,
            trailer_sentiment: 0.72,
            social_buzz: 82.0,
            sequel_or_franchise: false,
            has_award_winning_crew: true,
        },
        MovieInput {
            title: "The Last Kingdom".into(),
            genre: "Action".into(),
            language: "English".into(),
            budget: 95.0,
            runtime: 132.0,
            release_month: 12,
            lead_actor_popularity: 72.0,
            director_score: 65.0,
            trailer_sentiment: 0.58,
            social_buzz: 68.0,
            sequel_or_franchise: true,
            has_award_winning_crew: false,
        },
        MovieInput {
            title: "Whispers in the Dark".into(),
            genre: "Horror".into(),
            language: "English".into(),
            budget: 25.0,
            runtime: 98.0,
            release_month: 10,
            lead_actor_popularity: 45.0,
            director_score: 55.0,
            trailer_sentiment: 0.65,
            social_buzz: 72.0,
            sequel_or_franchise: false,
            has_award_winning_crew: false,
        },
    ]
}

/// Looks a sample up by exact title.
#[must_use]
pub fn sample_by_title(title: &str) -> Option<MovieInput> {
    sample_movies().into_iter().find(|movie| movie.title == title)
}
