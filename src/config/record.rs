use anyhow::Result;
use clap::ValueEnum;

use crate::scoring::{parse_assignment, Feature, FeatureRecord, ModelConfig, Scorer};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn code(self) -> f64 {
        match self {
            Gender::Male => 0.0,
            Gender::Female => 1.0,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Smoking {
    Never,
    Ex,
    Current,
}

impl Smoking {
    pub fn code(self) -> f64 {
        match self {
            Smoking::Never => 0.0,
            Smoking::Ex => 1.0,
            Smoking::Current => 2.0,
        }
    }
}

/// Binary flag as a 0/1 feature value.
pub fn flag_code(set: bool) -> f64 {
    if set {
        1.0
    } else {
        0.0
    }
}

/// Sources for one record, applied in field order: model defaults, file,
/// typed values, then `NAME=VALUE` assignments. Later sources win.
#[derive(Debug, Default)]
pub struct RecordLayers {
    pub use_defaults: bool,
    pub file: Option<FeatureRecord>,
    pub values: Vec<(Feature, f64)>,
    pub assignments: Vec<String>,
}

/// Merge the layers into a single record.
///
/// Typed values must be finite; file records are checked by
/// [`load_record`](super::load_record) and assignments by `parse_assignment`.
pub fn build_record(
    config: &ModelConfig,
    scorer: &Scorer,
    layers: &RecordLayers,
) -> Result<FeatureRecord> {
    let mut record = if layers.use_defaults {
        config.default_record()
    } else {
        FeatureRecord::new()
    };

    if let Some(ref from_file) = layers.file {
        for key in from_file.keys() {
            if !scorer.accepts(key) {
                log::warn!("Ignoring unknown feature '{}' in input file", key);
            }
        }
        record.extend(from_file.iter().map(|(k, v)| (k.clone(), *v)));
    }

    for &(feature, value) in &layers.values {
        if !value.is_finite() {
            anyhow::bail!(
                "Invalid value for {}: must be finite, got {}",
                feature.key(),
                value
            );
        }
        record.insert(feature.key().to_string(), value);
    }

    for assignment in &layers.assignments {
        let (name, value) = parse_assignment(assignment, scorer)?;
        record.insert(name, value);
    }

    for warning in out_of_domain(&record) {
        log::warn!("{}", warning);
    }

    Ok(record)
}

/// Describe every catalogued feature whose value falls outside its usual range.
pub fn out_of_domain(record: &FeatureRecord) -> Vec<String> {
    record
        .iter()
        .filter_map(|(key, &value)| {
            let feature = Feature::from_key(key)?;
            let domain = feature.domain();
            if domain.contains(value) {
                None
            } else {
                Some(format!(
                    "{} = {} is outside the usual range {}..={}",
                    feature.label(),
                    value,
                    domain.min,
                    domain.max
                ))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ModelConfig, Scorer) {
        let config = ModelConfig::default();
        let scorer = Scorer::from_config(&config).unwrap();
        (config, scorer)
    }

    fn with_defaults() -> RecordLayers {
        RecordLayers {
            use_defaults: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_only() {
        let (config, scorer) = setup();
        let record = build_record(&config, &scorer, &with_defaults()).unwrap();
        assert_eq!(record, config.default_record());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let (config, scorer) = setup();
        let layers = RecordLayers {
            file: Some(FeatureRecord::from([
                ("age".to_string(), 80.0),
                ("diabetes".to_string(), 1.0),
            ])),
            ..with_defaults()
        };
        let record = build_record(&config, &scorer, &layers).unwrap();
        assert_eq!(record["age"], 80.0);
        assert_eq!(record["diabetes"], 1.0);
        // Untouched defaults survive
        assert_eq!(record["Fazekas"], 1.0);
    }

    #[test]
    fn test_typed_values_override_file() {
        let (config, scorer) = setup();
        let layers = RecordLayers {
            file: Some(FeatureRecord::from([
                ("age".to_string(), 80.0),
                ("diabetes".to_string(), 1.0),
            ])),
            values: vec![(Feature::Age, 70.0), (Feature::Diabetes, flag_code(false))],
            ..with_defaults()
        };
        let record = build_record(&config, &scorer, &layers).unwrap();
        assert_eq!(record["age"], 70.0);
        // A flag can clear a value set by the file
        assert_eq!(record["diabetes"], 0.0);
    }

    #[test]
    fn test_assignments_override_typed_values() {
        let (config, scorer) = setup();
        let layers = RecordLayers {
            file: Some(FeatureRecord::from([("age".to_string(), 80.0)])),
            values: vec![(Feature::Age, 70.0)],
            assignments: vec!["age=75".to_string(), "study1_rundmc=1".to_string()],
            ..with_defaults()
        };
        let record = build_record(&config, &scorer, &layers).unwrap();
        assert_eq!(record["age"], 75.0);
        assert_eq!(record["study1_rundmc"], 1.0);
    }

    #[test]
    fn test_without_defaults_unset_features_are_absent() {
        let (config, scorer) = setup();
        let layers = RecordLayers {
            use_defaults: false,
            values: vec![(Feature::Age, 70.0)],
            ..Default::default()
        };
        let record = build_record(&config, &scorer, &layers).unwrap();
        assert_eq!(record.len(), 1);
        assert!(!record.contains_key("Fazekas"));

        // Absent features score as raw 0
        let result = scorer.score(&record);
        let fazekas_at_zero = scorer.coefficient("Fazekas").unwrap()
            * scorer.standardize("Fazekas", 0.0).unwrap();
        assert_eq!(result.contributions["Fazekas"], fazekas_at_zero);
        assert_ne!(
            result.contributions["Fazekas"],
            scorer.score(&config.default_record()).contributions["Fazekas"]
        );
    }

    #[test]
    fn test_non_finite_typed_value_rejected() {
        let (config, scorer) = setup();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let layers = RecordLayers {
                values: vec![(Feature::Age, bad)],
                ..with_defaults()
            };
            let err = build_record(&config, &scorer, &layers).unwrap_err();
            assert!(err.to_string().contains("age"));
            assert!(err.to_string().contains("must be finite"));
        }
    }

    #[test]
    fn test_unknown_assignment_rejected() {
        let (config, scorer) = setup();
        let layers = RecordLayers {
            assignments: vec!["bmi=25".to_string()],
            ..with_defaults()
        };
        let err = build_record(&config, &scorer, &layers).unwrap_err();
        assert!(err.to_string().contains("unknown feature 'bmi'"));
    }

    #[test]
    fn test_unknown_file_keys_kept_but_ignored_by_score() {
        let (config, scorer) = setup();
        let layers = RecordLayers {
            file: Some(FeatureRecord::from([("bmi".to_string(), 25.0)])),
            ..with_defaults()
        };
        let record = build_record(&config, &scorer, &layers).unwrap();
        assert_eq!(
            scorer.score(&record),
            scorer.score(&config.default_record())
        );
    }

    #[test]
    fn test_code_mappings() {
        assert_eq!(Gender::Male.code(), 0.0);
        assert_eq!(Gender::Female.code(), 1.0);
        assert_eq!(Smoking::Never.code(), 0.0);
        assert_eq!(Smoking::Ex.code(), 1.0);
        assert_eq!(Smoking::Current.code(), 2.0);
        assert_eq!(flag_code(true), 1.0);
        assert_eq!(flag_code(false), 0.0);
    }

    #[test]
    fn test_out_of_domain() {
        let record = FeatureRecord::from([
            ("age".to_string(), 30.0),
            ("smoking".to_string(), 1.0),
            ("Fazekas".to_string(), 4.0),
            ("study1_scans".to_string(), 9.0),
        ]);
        let warnings = out_of_domain(&record);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.starts_with("Age (years) = 30")));
        assert!(warnings
            .iter()
            .any(|w| w.starts_with("Fazekas Score (WMH) = 4 is outside the usual range 0..=3")));
        assert!(out_of_domain(&ModelConfig::default().default_record()).is_empty());
    }
}
