//! Feature contributions, narrative explanations and recommendations.
//!
//! Cut-offs stated on a rated signal (actor impact, release timing, genre
//! index) read the [`EngineeredFeatures`] the probability model scored.
//! Cut-offs stated on a raw attribute (trailer sentiment, social buzz,
//! popularity and director ratings in descriptions) compare the raw input,
//! so no boundary depends on a lossy rescale.

use serde::{Deserialize, Serialize};

use crate::{features::EngineeredFeatures, input::MovieInput};

// Engineered-scale cut-offs.
const STAR_POWER: f64 = 0.7;
const PRIME_WINDOW: f64 = 0.8;
const WEAK_WINDOW: f64 = 0.6;
const STRONG_GENRE: f64 = 0.6;
const WEAK_ACTOR: f64 = 0.5;

// Raw-scale cut-offs.
const STRONG_RATING: f64 = 70.0;
const LOW_BUZZ: f64 = 60.0;
const TRAILER_LANDING: f64 = 0.5;
const TRAILER_ANTICIPATION: f64 = 0.6;
const TRAILER_WEAK: f64 = 0.4;
const BLOCKBUSTER_BUDGET: f64 = 150.0;
const TALENT_BUDGET: f64 = 80.0;
const MODEST_BUDGET: f64 = 100.0;

const STRONG_TIER: f64 = 70.0;
const MODERATE_TIER: f64 = 50.0;
const BREAK_EVEN_CONCERN: f64 = 60.0;

const FALLBACK_RECOMMENDATION: &str = "Current strategy appears well-aligned with success factors.";

/// Signed influence of one input on the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureContribution {
    /// Display name of the feature.
    pub feature: String,
    /// Signed impact, roughly -1..1.
    pub impact: f64,
    /// One-line reading of the feature.
    pub description: String,
    /// Whether the feature helps the movie.
    pub is_positive: bool,
}

impl FeatureContribution {
    fn new(feature: &str, impact: f64, description: impl Into<String>, is_positive: bool) -> Self {
        Self {
            feature: feature.to_string(),
            impact,
            description: description.into(),
            is_positive,
        }
    }
}

/// The three explainability artifacts of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    /// Contributions ranked by absolute impact.
    pub feature_importance: Vec<FeatureContribution>,
    /// Narrative sentences, tier sentence first.
    pub explanation: Vec<String>,
    /// Actionable suggestions; never empty.
    pub recommendations: Vec<String>,
}

/// Values a rule may inspect.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Raw record, for display text and raw-scale cut-offs.
    pub movie: &'a MovieInput,
    /// Shared engineered signals.
    pub features: &'a EngineeredFeatures,
    /// Clamped, unrounded success probability.
    pub probability: f64,
}

struct Rule {
    applies: fn(&RuleContext<'_>) -> bool,
    render: fn(&RuleContext<'_>) -> String,
}

const EXPLANATION_RULES: &[Rule] = &[
    Rule {
        applies: |ctx| ctx.features.actor_impact >= STAR_POWER,
        render: |ctx| {
            format!(
                "Star power from lead actor ({}% popularity) significantly boosts audience draw.",
                ctx.movie.lead_actor_popularity
            )
        },
    },
    Rule {
        applies: |ctx| ctx.features.release_timing >= PRIME_WINDOW,
        render: |ctx| {
            format!(
                "Release in month {} captures peak moviegoing season.",
                ctx.movie.release_month
            )
        },
    },
    Rule {
        applies: |ctx| ctx.movie.trailer_sentiment > TRAILER_ANTICIPATION,
        render: |ctx| {
            let positive = (ctx.movie.trailer_sentiment * 100.0 + 0.5).floor();
            format!(
                "Early trailer sentiment ({positive}% positive) indicates strong audience anticipation."
            )
        },
    },
    Rule {
        applies: |ctx| ctx.movie.budget > BLOCKBUSTER_BUDGET && ctx.probability < BREAK_EVEN_CONCERN,
        render: |ctx| {
            format!(
                "High budget (${}M) requires exceptional performance to break even.",
                ctx.movie.budget
            )
        },
    },
];

const RECOMMENDATION_RULES: &[Rule] = &[
    Rule {
        applies: |ctx| ctx.features.release_timing < WEAK_WINDOW,
        render: |_| {
            "Consider moving release to summer or holiday window for maximum audience availability."
                .to_string()
        },
    },
    Rule {
        applies: |ctx| ctx.movie.social_buzz < LOW_BUZZ,
        render: |_| {
            "Increase social media marketing investment to build pre-release awareness.".to_string()
        },
    },
    Rule {
        applies: |ctx| ctx.movie.trailer_sentiment < TRAILER_WEAK,
        render: |_| {
            "Review trailer cut - consider A/B testing different versions to improve reception."
                .to_string()
        },
    },
    Rule {
        applies: |ctx| ctx.features.actor_impact < WEAK_ACTOR && ctx.movie.budget > TALENT_BUDGET,
        render: |_| {
            "For this budget level, consider adding recognizable talent to boost opening weekend."
                .to_string()
        },
    },
    Rule {
        applies: |ctx| ctx.probability >= STRONG_TIER && ctx.movie.budget < MODEST_BUDGET,
        render: |_| {
            "Strong indicators suggest potential for additional marketing investment.".to_string()
        },
    },
];

fn fire<'a>(rules: &'a [Rule], ctx: RuleContext<'a>) -> impl Iterator<Item = String> + 'a {
    rules
        .iter()
        .filter(move |rule| (rule.applies)(&ctx))
        .map(move |rule| (rule.render)(&ctx))
}

/// Contributions of the eight explained features, ranked by absolute
/// impact. Ties keep their listing order.
#[must_use]
pub fn feature_importance(movie: &MovieInput, features: &EngineeredFeatures) -> Vec<FeatureContribution> {
    let franchise = features.is_franchise();
    let mut contributions = vec![
        FeatureContribution::new(
            "Lead Actor Popularity",
            (features.actor_impact - 0.5) * 2.0,
            if movie.lead_actor_popularity >= STRONG_RATING {
                "Star power drives audience interest"
            } else {
                "Consider casting more recognizable talent"
            },
            features.actor_impact >= 0.5,
        ),
        FeatureContribution::new(
            "Genre Success Index",
            (features.genre_index - 0.5) * 1.5,
            format!(
                "{} films have {} historical performance",
                movie.genre,
                if features.genre_index > STRONG_GENRE {
                    "strong"
                } else {
                    "moderate"
                }
            ),
            features.genre_index >= 0.5,
        ),
        FeatureContribution::new(
            "Trailer Sentiment",
            movie.trailer_sentiment,
            if movie.trailer_sentiment > TRAILER_LANDING {
                "Trailer is generating positive buzz"
            } else {
                "Trailer reception needs improvement"
            },
            movie.trailer_sentiment > 0.0,
        ),
        FeatureContribution::new(
            "Release Timing",
            (features.release_timing - 0.5) * 1.5,
            if features.release_timing >= PRIME_WINDOW {
                "Prime release window maximizes potential"
            } else {
                "Consider adjusting release date"
            },
            features.release_timing >= WEAK_WINDOW,
        ),
        FeatureContribution::new(
            "Social Media Buzz",
            (features.social_buzz - 0.5) * 1.5,
            if movie.social_buzz >= STRONG_RATING {
                "Strong social media engagement"
            } else {
                "Marketing push recommended"
            },
            features.social_buzz >= 0.5,
        ),
        FeatureContribution::new(
            "Director Track Record",
            (features.director_consistency - 0.5) * 1.2,
            if movie.director_score >= STRONG_RATING {
                "Proven director with consistent delivery"
            } else {
                "Director reliability is a concern"
            },
            features.director_consistency >= 0.5,
        ),
        FeatureContribution::new(
            "Budget Risk",
            0.5 - features.budget_risk,
            if movie.budget > MODEST_BUDGET {
                "High budget increases break-even pressure"
            } else {
                "Manageable budget level"
            },
            features.budget_risk >= 0.5,
        ),
        FeatureContribution::new(
            "Franchise Factor",
            if franchise { 0.4 } else { -0.1 },
            if franchise {
                "Built-in audience from existing IP"
            } else {
                "Original IP has higher uncertainty"
            },
            franchise,
        ),
    ];
    // sort_by is stable.
    contributions.sort_by(|a, b| b.impact.abs().total_cmp(&a.impact.abs()));
    contributions
}

/// Narrative explanation. Exactly one tier sentence always leads.
#[must_use]
pub fn explanations(ctx: &RuleContext<'_>) -> Vec<String> {
    let tier = if ctx.probability >= STRONG_TIER {
        format!(
            "Strong success indicators present. The combination of {} genre appeal and lead actor popularity creates solid foundation.",
            ctx.movie.genre
        )
    } else if ctx.probability >= MODERATE_TIER {
        "Moderate success probability with mixed signals. Key strengths are partially offset by risk factors."
            .to_string()
    } else {
        "Elevated risk profile detected. Multiple factors suggest challenging market conditions."
            .to_string()
    };
    std::iter::once(tier)
        .chain(fire(EXPLANATION_RULES, *ctx))
        .collect()
}

/// Recommendations; falls back to a single steady-course sentence.
#[must_use]
pub fn recommendations(ctx: &RuleContext<'_>) -> Vec<String> {
    let fired: Vec<String> = fire(RECOMMENDATION_RULES, *ctx).collect();
    if fired.is_empty() {
        vec![FALLBACK_RECOMMENDATION.to_string()]
    } else {
        fired
    }
}

/// Builds all three artifacts from one set of features.
#[must_use]
pub fn explain(movie: &MovieInput, features: &EngineeredFeatures, probability: f64) -> Explanation {
    let ctx = RuleContext {
        movie,
        features,
        probability,
    };
    Explanation {
        feature_importance: feature_importance(movie, features),
        explanation: explanations(&ctx),
        recommendations: recommendations(&ctx),
    }
}
