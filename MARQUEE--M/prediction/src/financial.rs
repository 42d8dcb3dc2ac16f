use std::fmt;

use serde::{Deserialize, Serialize};

/// Probability (percent) that breaks even on the revenue multiplier.
const BREAK_EVEN_PROBABILITY: f64 = 50.0;
/// Uplift on the break-even multiplier for the expected case.
const REVENUE_UPLIFT: f64 = 1.2;
/// Half-width of the revenue band, as a fraction of the expected figure.
const REVENUE_VARIANCE: f64 = 0.4;
/// Share of the budget assumed lost in the failure scenario.
const LOSS_ON_FAILURE: f64 = 0.8;

/// Categorical risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Probability clears the budget-adjusted upper bar.
    Low,
    /// Probability clears only the lower bar.
    Medium,
    /// Probability below both bars.
    High,
}

impl RiskLevel {
    /// Display label, e.g. `Low Risk`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(name)
    }
}

/// Coarse reading of the probability used for gauges and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuccessBand {
    /// 70 and above.
    Strong,
    /// 45 up to 70.
    Moderate,
    /// Below 45.
    Weak,
}

impl SuccessBand {
    /// Band for a probability on the 0..100 scale.
    #[must_use]
    pub fn of(probability: f64) -> Self {
        if probability >= 70.0 {
            Self::Strong
        } else if probability >= 45.0 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

/// Revenue band in millions, rounded to whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevenueRange {
    /// Pessimistic figure.
    pub min: u64,
    /// Optimistic figure.
    pub max: u64,
    /// Central estimate.
    pub expected: u64,
}

/// Budget-adjusted risk tier. Bigger budgets need a higher probability for
/// the same tier; the adjustment saturates at a 1.5x budget factor.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn risk_level(probability: f64, budget: f64) -> RiskLevel {
    let budget_factor = (budget / 100.0).min(1.5);
    // Unfused, so a probability sitting exactly on a bar lands the same way
    // on every target.
    let low_bar = 65.0 + budget_factor * 5.0;
    let medium_bar = 45.0 + budget_factor * 5.0;
    if probability >= low_bar {
        RiskLevel::Low
    } else if probability >= medium_bar {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Expected revenue with a symmetric variance band.
#[must_use]
pub fn estimate_revenue(probability: f64, budget: f64) -> RevenueRange {
    let multiplier = probability / BREAK_EVEN_PROBABILITY;
    let expected = budget * multiplier * REVENUE_UPLIFT;
    RevenueRange {
        min: whole(expected * (1.0 - REVENUE_VARIANCE)),
        max: whole(expected * (1.0 + REVENUE_VARIANCE)),
        expected: whole(expected),
    }
}

/// Capital expected to be lost, weighted by the failure probability.
#[must_use]
pub fn revenue_at_risk(probability: f64, budget: f64) -> u64 {
    let failure = (100.0 - probability) / 100.0;
    whole(budget * failure * LOSS_ON_FAILURE)
}

/// Formats a figure in millions the way reports show it: `$540M`, `$1.2B`.
/// Billions carry one decimal, halves rounding up.
#[must_use]
pub fn format_millions(value: u64) -> String {
    if value >= 1000 {
        let tenths = value.saturating_add(50) / 100;
        format!("${}.{}B", tenths / 10, tenths % 10)
    } else {
        format!("${value}M")
    }
}

// Rounds half up. Float-to-int casts saturate: negatives and NaN become 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole(value: f64) -> u64 {
    (value + 0.5).floor() as u64
}
