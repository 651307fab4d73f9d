use serde::Serialize;
use std::collections::BTreeMap;

use super::config::{CoefficientTable, FeatureRecord, FeatureStat, FeatureStatistics, ModelConfig};
use super::error::ScoringError;
use super::validation::{validate_model, validate_tables};

/// Log-odds beyond this magnitude saturate the sigmoid in f64. Clamping keeps
/// the probability strictly inside (0, 1).
pub const LOGIT_CLAMP: f64 = 36.0;

/// One regression term with its standardization resolved at construction.
#[derive(Debug, Clone)]
struct ModelTerm {
    feature: String,
    coefficient: f64,
    stat: FeatureStat,
}

/// Outcome of a single evaluation.
///
/// `intercept + sum(contributions) == log_odds` and
/// `probability == sigmoid(log_odds)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub probability: f64,
    pub log_odds: f64,
    pub intercept: f64,
    /// Feature -> `coefficient * standardized value`. Order is not meaningful.
    pub contributions: BTreeMap<String, f64>,
}

/// Logistic-regression scorer over validated, immutable tables.
///
/// A `Scorer` can only be obtained through validation, so every coefficient
/// has a usable standardization entry and [`Scorer::score`] cannot fail. It
/// holds no interior mutability and is freely shared across threads.
#[derive(Debug, Clone)]
pub struct Scorer {
    statistics: FeatureStatistics,
    intercept: f64,
    terms: Vec<ModelTerm>,
}

impl Scorer {
    pub fn new(
        statistics: FeatureStatistics,
        coefficients: CoefficientTable,
    ) -> Result<Self, ScoringError> {
        validate_tables(&statistics, &coefficients).map_err(ScoringError::Configuration)?;

        let mut terms = Vec::with_capacity(coefficients.coefficients.len());
        for (feature, coefficient) in coefficients.coefficients {
            // Presence checked by validate_tables above
            let stat = statistics[&feature];
            terms.push(ModelTerm {
                feature,
                coefficient,
                stat,
            });
        }

        log::debug!(
            "Scorer ready: {} coefficients over {} scaled features",
            terms.len(),
            statistics.len()
        );

        Ok(Self {
            statistics,
            intercept: coefficients.intercept,
            terms,
        })
    }

    /// Build from a model definition, validating its default record as well.
    pub fn from_config(config: &ModelConfig) -> Result<Self, ScoringError> {
        validate_model(config).map_err(ScoringError::Configuration)?;
        Self::new(config.statistics.clone(), config.coefficient_table())
    }

    /// The built-in dementia model.
    pub fn builtin() -> Result<Self, ScoringError> {
        Self::from_config(&ModelConfig::default())
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn statistics(&self) -> &FeatureStatistics {
        &self.statistics
    }

    /// Features carrying a coefficient, in evaluation order.
    pub fn model_features(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.feature.as_str())
    }

    pub fn coefficient(&self, feature: &str) -> Option<f64> {
        self.terms
            .iter()
            .find(|t| t.feature == feature)
            .map(|t| t.coefficient)
    }

    /// Whether `feature` is accepted as input (it has statistics), whether or
    /// not it affects the score.
    pub fn accepts(&self, feature: &str) -> bool {
        self.statistics.contains_key(feature)
    }

    /// `(value - mean) / std` for a feature with statistics.
    pub fn standardize(&self, feature: &str, value: f64) -> Result<f64, ScoringError> {
        self.statistics
            .get(feature)
            .map(|stat| stat.standardize(value))
            .ok_or_else(|| ScoringError::UnknownFeature(feature.to_string()))
    }

    /// Score one record.
    ///
    /// Features absent from `record` are taken as raw value 0 before
    /// standardization, not as the cohort mean. Keys without a coefficient are
    /// ignored. Raw values are not range checked.
    pub fn score(&self, record: &FeatureRecord) -> ScoreResult {
        let mut log_odds = self.intercept;
        let mut contributions = BTreeMap::new();

        for term in &self.terms {
            let value = record.get(&term.feature).copied().unwrap_or(0.0);
            let contribution = term.coefficient * term.stat.standardize(value);
            contributions.insert(term.feature.clone(), contribution);
            log_odds += contribution;
        }

        ScoreResult {
            probability: sigmoid(log_odds),
            log_odds,
            intercept: self.intercept,
            contributions,
        }
    }
}

/// Logistic function, evaluated without overflowing `exp` for either sign.
pub fn sigmoid(x: f64) -> f64 {
    let x = x.clamp(-LOGIT_CLAMP, LOGIT_CLAMP);
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
