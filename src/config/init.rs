use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use crate::scoring::ModelConfig;

const HEADER: &str = "\
# Dementia risk model.
# statistics: per-feature mean/std used to standardize raw inputs.
# coefficients: logistic-regression weights on the standardized values.
# defaults: starting record for the CLI; the scorer treats missing inputs as 0.
";

/// Write the built-in model to `path` as YAML.
///
/// Refuses to replace an existing file unless `force` is set. The file is
/// written atomically, so an interrupted write never leaves a partial model.
pub fn write_default_model(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Model file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let yaml = serde_saphyr::to_string(&ModelConfig::default())
        .context("Failed to serialize built-in model")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(HEADER.as_bytes())
        .with_context(|| format!("Failed to write model to {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write model to {}", path.display()))?;
    file.commit().context("Failed to save model file")?;

    log::info!("Wrote built-in model to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_model;
    use std::env;

    #[test]
    fn test_write_then_load_roundtrip() {
        let temp_path = env::temp_dir().join("dementia_risk_test_init/model.yaml");
        let _ = std::fs::remove_file(&temp_path);

        write_default_model(&temp_path, false).unwrap();
        let loaded = load_model(Some(temp_path.clone())).unwrap();
        assert_eq!(loaded, ModelConfig::default());

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let temp_path = env::temp_dir().join("dementia_risk_test_init_existing.yaml");
        std::fs::write(&temp_path, "intercept: 0\n").unwrap();

        let err = write_default_model(&temp_path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        // Untouched
        assert_eq!(std::fs::read_to_string(&temp_path).unwrap(), "intercept: 0\n");

        write_default_model(&temp_path, true).unwrap();
        assert_eq!(
            load_model(Some(temp_path.clone())).unwrap(),
            ModelConfig::default()
        );

        let _ = std::fs::remove_file(&temp_path);
    }
}
