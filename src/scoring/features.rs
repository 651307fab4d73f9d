use std::fmt;

use super::engine::Scorer;
use super::error::ScoringError;

/// Inputs the calculator collects from a user.
///
/// Study covariates (`study1_rundmc`, `study1_scans`) and the unused `EF`/`PS`
/// scores are model features too, but not part of this catalogue; they are
/// reachable by key only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Age,
    Gender,
    EducationYears,
    GlobalCognition,
    Diabetes,
    Hypertension,
    Hypercholesterolemia,
    Smoking,
    Fazekas,
    LacuneCount,
    Microbleeds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureGroup {
    Demographics,
    CognitiveFunction,
    SvdMarkers,
    VascularRisk,
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureGroup::Demographics => "Demographics",
            FeatureGroup::CognitiveFunction => "Cognitive Function",
            FeatureGroup::SvdMarkers => "SVD / MRI Markers",
            FeatureGroup::VascularRisk => "Lifestyle & Vascular Risk",
        };
        f.write_str(name)
    }
}

/// Input range a front end should offer. Advisory only: the scorer accepts
/// any value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Domain {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

const BINARY: Domain = Domain::new(0.0, 1.0, 1.0);

impl Feature {
    pub const ALL: [Feature; 11] = [
        Feature::Age,
        Feature::Gender,
        Feature::EducationYears,
        Feature::GlobalCognition,
        Feature::Diabetes,
        Feature::Hypertension,
        Feature::Hypercholesterolemia,
        Feature::Smoking,
        Feature::Fazekas,
        Feature::LacuneCount,
        Feature::Microbleeds,
    ];

    /// Key used by the model tables.
    pub fn key(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::Gender => "gender",
            Feature::EducationYears => "educationyears",
            Feature::GlobalCognition => "Global",
            Feature::Diabetes => "diabetes",
            Feature::Hypertension => "hypertension",
            Feature::Hypercholesterolemia => "hypercholesterolemia",
            Feature::Smoking => "smoking",
            Feature::Fazekas => "Fazekas",
            Feature::LacuneCount => "lac_count",
            Feature::Microbleeds => "CMB_count",
        }
    }

    pub fn from_key(key: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Feature::Age => "Age (years)",
            Feature::Gender => "Gender",
            Feature::EducationYears => "Education (years)",
            Feature::GlobalCognition => "Global Cognition Score",
            Feature::Diabetes => "Diabetes",
            Feature::Hypertension => "Hypertension",
            Feature::Hypercholesterolemia => "Hypercholesterolaemia",
            Feature::Smoking => "Smoking Status",
            Feature::Fazekas => "Fazekas Score (WMH)",
            Feature::LacuneCount => "Lacune Count",
            Feature::Microbleeds => "Cerebral Microbleeds",
        }
    }

    pub fn group(self) -> FeatureGroup {
        match self {
            Feature::Age | Feature::Gender | Feature::EducationYears => FeatureGroup::Demographics,
            Feature::GlobalCognition => FeatureGroup::CognitiveFunction,
            Feature::Fazekas | Feature::LacuneCount | Feature::Microbleeds => {
                FeatureGroup::SvdMarkers
            }
            Feature::Diabetes
            | Feature::Hypertension
            | Feature::Hypercholesterolemia
            | Feature::Smoking => FeatureGroup::VascularRisk,
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            Feature::Age => Domain::new(40.0, 90.0, 1.0),
            Feature::EducationYears => Domain::new(0.0, 20.0, 1.0),
            Feature::GlobalCognition => Domain::new(-4.0, 3.0, 0.1),
            Feature::Smoking => Domain::new(0.0, 2.0, 1.0),
            Feature::Fazekas | Feature::LacuneCount => Domain::new(0.0, 3.0, 1.0),
            Feature::Gender
            | Feature::Diabetes
            | Feature::Hypertension
            | Feature::Hypercholesterolemia
            | Feature::Microbleeds => BINARY,
        }
    }

    /// How raw values are coded.
    pub fn encoding(self) -> &'static str {
        match self {
            Feature::Age | Feature::EducationYears => "years",
            Feature::Gender => "0 = male, 1 = female",
            Feature::GlobalCognition => "standardised score, negative = below average",
            Feature::Smoking => "0 = never, 1 = ex, 2 = current",
            Feature::Fazekas => "0 = none, 1 = mild, 2 = moderate, 3 = severe",
            Feature::LacuneCount => "0, 1, 2, 3+",
            Feature::Microbleeds => "0 = absent, 1 = present",
            Feature::Diabetes | Feature::Hypertension | Feature::Hypercholesterolemia => {
                "0 = no, 1 = yes"
            }
        }
    }
}

/// Display label for a model key, falling back to the key itself.
pub fn label_for(key: &str) -> &str {
    match Feature::from_key(key) {
        Some(feature) => feature.label(),
        None => key,
    }
}

/// Parse a `NAME=VALUE` assignment. `NAME` must be a feature the scorer
/// accepts as input.
pub fn parse_assignment(s: &str, scorer: &Scorer) -> Result<(String, f64), ScoringError> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| ScoringError::InvalidAssignment(s.to_string()))?;
    let name = name.trim();
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| ScoringError::InvalidAssignment(s.to_string()))?;

    if name.is_empty() || !value.is_finite() {
        return Err(ScoringError::InvalidAssignment(s.to_string()));
    }
    if !scorer.accepts(name) {
        return Err(ScoringError::UnknownFeature(name.to_string()));
    }
    Ok((name.to_string(), value))
}
