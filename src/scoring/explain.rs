use serde::Serialize;
use std::fmt;

use super::engine::ScoreResult;

/// Lower bound for the normalizing magnitude, so near-zero breakdowns do not
/// blow up into full-width bars.
pub const MIN_SCALE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedContribution {
    pub feature: String,
    pub contribution: f64,
    /// `|contribution|` relative to the largest magnitude, in [0, 1].
    pub relative: f64,
}

impl RankedContribution {
    pub fn increases_risk(&self) -> bool {
        self.contribution > 0.0
    }
}

/// Rank contributions by descending magnitude for display.
///
/// Ties are broken by feature name, so the order depends only on the values.
/// Purely presentational; nothing here feeds back into the score.
pub fn rank_contributions(result: &ScoreResult) -> Vec<RankedContribution> {
    let scale = result
        .contributions
        .values()
        .map(|c| c.abs())
        .fold(MIN_SCALE, f64::max);

    let mut ranked: Vec<RankedContribution> = result
        .contributions
        .iter()
        .map(|(feature, &contribution)| RankedContribution {
            feature: feature.clone(),
            contribution,
            relative: contribution.abs() / scale,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.contribution
            .abs()
            .total_cmp(&a.contribution.abs())
            .then_with(|| a.feature.cmp(&b.feature))
    });
    ranked
}

/// Coarse label for a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskBand {
    pub fn from_probability(probability: f64) -> Self {
        if probability < 0.3 {
            RiskBand::Low
        } else if probability < 0.6 {
            RiskBand::Moderate
        } else if probability < 0.8 {
            RiskBand::High
        } else {
            RiskBand::VeryHigh
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskBand::Low => "LOW RISK",
            RiskBand::Moderate => "MODERATE",
            RiskBand::High => "HIGH RISK",
            RiskBand::VeryHigh => "VERY HIGH",
        };
        f.write_str(label)
    }
}
