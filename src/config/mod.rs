mod init;
mod record;

pub use init::write_default_model;
pub use record::{build_record, flag_code, out_of_domain, Gender, RecordLayers, Smoking};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scoring::{FeatureRecord, ModelConfig};

/// Get the config directory path (~/.config/dementia-risk/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("dementia-risk"))
}

/// Get the default model file path (~/.config/dementia-risk/model.yaml)
pub fn get_model_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("model.yaml"))
}

/// Load the model definition.
///
/// An explicit `path` must exist. Without one, the default path is used if a
/// file is present there, otherwise the built-in model.
///
/// The returned model is parsed but not validated; build a `Scorer` from it
/// to validate.
pub fn load_model(path: Option<PathBuf>) -> Result<ModelConfig> {
    let model_path = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Model file not found at {}", path.display());
            }
            path
        }
        None => match get_model_path() {
            Ok(path) if path.exists() => path,
            _ => {
                log::debug!("No model file found, using built-in model");
                return Ok(ModelConfig::default());
            }
        },
    };

    let content = fs::read_to_string(&model_path)
        .with_context(|| format!("Failed to read model file at {}", model_path.display()))?;

    let config: ModelConfig = serde_saphyr::from_str(&content).with_context(|| {
        format!("Failed to parse model: invalid YAML in {}", model_path.display())
    })?;

    log::debug!(
        "Loaded model from {} ({} coefficients)",
        model_path.display(),
        config.coefficients.len()
    );
    Ok(config)
}

/// Load a feature record from a JSON or YAML file, chosen by extension.
pub fn load_record(path: &Path) -> Result<FeatureRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read record file at {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let record: FeatureRecord = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse record: invalid JSON in {}", path.display()))?,
        Some("yaml") | Some("yml") => serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse record: invalid YAML in {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported record file {}: expected .json, .yaml or .yml",
            path.display()
        ),
    };

    for (key, value) in &record {
        if !value.is_finite() {
            anyhow::bail!(
                "Invalid value for '{}' in {}: must be finite, got {}",
                key,
                path.display(),
                value
            );
        }
    }

    Ok(record)
}
