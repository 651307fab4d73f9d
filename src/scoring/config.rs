use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Standardization statistics for one feature.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FeatureStat {
    pub mean: f64,
    pub std: f64,
}

impl FeatureStat {
    pub fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }

    /// `(value - mean) / std`
    pub fn standardize(&self, value: f64) -> f64 {
        (value - self.mean) / self.std
    }
}

/// Feature name -> (mean, std). Every feature the model can accept as input
/// has an entry, including covariates that carry no coefficient.
pub type FeatureStatistics = BTreeMap<String, FeatureStat>;

/// Feature name -> raw value, as supplied by a caller for one evaluation.
pub type FeatureRecord = BTreeMap<String, f64>;

/// Intercept plus per-feature coefficients. Its key set is exactly the set of
/// features that move the score.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    pub intercept: f64,
    pub coefficients: BTreeMap<String, f64>,
}

/// Serializable model definition.
///
/// Example YAML:
/// ```yaml
/// intercept: -1.0782
/// statistics:
///   age: { mean: 65.794, std: 8.952 }
///   gender: { mean: 0.527, std: 0.499 }
/// coefficients:
///   age: 0.8202
///   gender: -0.0153
/// defaults:
///   age: 65
///   gender: 0
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub intercept: f64,

    pub statistics: FeatureStatistics,

    pub coefficients: BTreeMap<String, f64>,

    /// Starting record for interactive use. Not consulted by the scorer,
    /// which treats absent features as 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<FeatureRecord>,
}

impl ModelConfig {
    pub fn coefficient_table(&self) -> CoefficientTable {
        CoefficientTable {
            intercept: self.intercept,
            coefficients: self.coefficients.clone(),
        }
    }

    pub fn default_record(&self) -> FeatureRecord {
        self.defaults.clone().unwrap_or_default()
    }
}

// Fitted on the pooled cohorts; `EF` and `PS` are scaled but unused by the
// regression.
const STATISTICS: [(&str, f64, f64); 15] = [
    ("age", 65.794, 8.952),
    ("gender", 0.527, 0.499),
    ("educationyears", 11.203, 2.997),
    ("EF", -0.042, 0.739),
    ("PS", -0.068, 0.806),
    ("Global", -0.025, 0.622),
    ("diabetes", 0.12, 0.325),
    ("hypertension", 0.675, 0.468),
    ("hypercholesterolemia", 0.738, 0.44),
    ("smoking", 0.647, 0.708),
    ("Fazekas", 1.311, 0.797),
    ("lac_count", 0.257, 0.631),
    ("CMB_count", 0.109, 0.311),
    ("study1_rundmc", 0.266, 0.442),
    ("study1_scans", 0.068, 0.253),
];

const INTERCEPT: f64 = -1.0782;

const COEFFICIENTS: [(&str, f64); 13] = [
    ("age", 0.8202),
    ("gender", -0.0153),
    ("educationyears", -0.1896),
    ("Global", -0.5022),
    ("diabetes", 0.1853),
    ("hypertension", 0.2878),
    ("hypercholesterolemia", 0.2012),
    ("smoking", 0.2127),
    ("Fazekas", 0.2589),
    ("lac_count", 0.0852),
    ("CMB_count", 0.2868),
    ("study1_rundmc", 0.314),
    ("study1_scans", 0.0586),
];

const DEFAULTS: [(&str, f64); 13] = [
    ("age", 65.0),
    ("gender", 0.0),
    ("educationyears", 12.0),
    ("Global", 0.0),
    ("diabetes", 0.0),
    ("hypertension", 0.0),
    ("hypercholesterolemia", 0.0),
    ("smoking", 0.0),
    ("Fazekas", 1.0),
    ("lac_count", 0.0),
    ("CMB_count", 0.0),
    ("study1_rundmc", 0.0),
    ("study1_scans", 0.0),
];

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            intercept: INTERCEPT,
            statistics: STATISTICS
                .iter()
                .map(|&(name, mean, std)| (name.to_string(), FeatureStat::new(mean, std)))
                .collect(),
            coefficients: COEFFICIENTS
                .iter()
                .map(|&(name, coef)| (name.to_string(), coef))
                .collect(),
            defaults: Some(
                DEFAULTS
                    .iter()
                    .map(|&(name, value)| (name.to_string(), value))
                    .collect(),
            ),
        }
    }
}
