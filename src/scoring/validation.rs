use super::config::{CoefficientTable, FeatureStatistics, ModelConfig};

/// Validate the statistics and coefficient tables against each other.
/// Returns all validation errors at once (not just the first).
pub fn validate_tables(
    statistics: &FeatureStatistics,
    coefficients: &CoefficientTable,
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !coefficients.intercept.is_finite() {
        errors.push(format!(
            "intercept: must be finite, got {}",
            coefficients.intercept
        ));
    }

    for (name, stat) in statistics {
        if !stat.mean.is_finite() {
            errors.push(format!("statistics.{}.mean: must be finite, got {}", name, stat.mean));
        }
        // Zero std would divide by zero; negative std is never a fitted value
        if !stat.std.is_finite() || stat.std <= 0.0 {
            errors.push(format!(
                "statistics.{}.std: must be positive and finite, got {}",
                name, stat.std
            ));
        }
    }

    for (name, coef) in &coefficients.coefficients {
        if !statistics.contains_key(name) {
            errors.push(format!(
                "coefficients.{}: no matching statistics entry",
                name
            ));
        }
        if !coef.is_finite() {
            errors.push(format!("coefficients.{}: must be finite, got {}", name, coef));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a full model definition, including its default record.
pub fn validate_model(config: &ModelConfig) -> Result<(), Vec<String>> {
    let mut errors = match validate_tables(&config.statistics, &config.coefficient_table()) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    if let Some(ref defaults) = config.defaults {
        for (name, value) in defaults {
            if !config.statistics.contains_key(name) {
                errors.push(format!("defaults.{}: unknown feature", name));
            }
            if !value.is_finite() {
                errors.push(format!("defaults.{}: must be finite, got {}", name, value));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
