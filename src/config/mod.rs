pub mod init;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::scoring::RubricSetConfig;

/// Get the config directory path (~/.config/clarus-index/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string())))
        .join(".config")
        .join("clarus-index")
}

/// Get the default rubric file path (~/.config/clarus-index/rubrics.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("rubrics.yaml")
}

/// Ensure the directory holding `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Parse rubric configuration from YAML text
pub fn parse_config(content: &str) -> Result<RubricSetConfig> {
    serde_saphyr::from_str(content).context("Failed to parse rubric config: invalid YAML")
}

/// Load rubric configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to the rubric file. If None, uses the default path
///   and falls back to the built-in rubrics when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given file does not exist
/// - The file cannot be read
/// - The YAML cannot be parsed
///
/// The loaded rubrics are not validated here; `RubricRegistry::load` does that.
pub fn load_config(path: Option<PathBuf>) -> Result<RubricSetConfig> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Rubric config not found at {}", config_path.display());
        }
        warn!(
            path = %config_path.display(),
            "no rubric config found, using built-in placeholder rubrics (run `clarus-index init` to customize)"
        );
        return Ok(RubricSetConfig::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read rubric config at {}", config_path.display()))?;

    let config = parse_config(&content)
        .with_context(|| format!("Invalid rubric config in {}", config_path.display()))?;

    info!(path = %config_path.display(), rubrics = config.rubrics.len(), "loaded rubric config");
    Ok(config)
}
