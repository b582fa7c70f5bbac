use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{ensure_parent_dir, get_config_path};
use crate::scoring::{validate_rubrics, RubricSetConfig};

const CONFIG_HEADER: &str = "\
# Clarus Index rubrics.
#
# Each entry is one version of one tier's rubric. The highest version of a
# tier is used for new scores; keep older versions so stored scores stay
# reproducible. Dimension weights must add up to total_weight (default 100).
# Thresholds are inclusive lower bounds; anything below `notable` is CURATED.
#
# The built-in weights are placeholders until the editorial rubric is final.

";

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    print!("{} [{}]: ", message, hint);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Render a rubric config as commented YAML.
pub fn render_config(config: &RubricSetConfig) -> Result<String> {
    let yaml = serde_saphyr::to_string(config).context("Failed to serialize rubric config")?;
    Ok(format!("{}{}", CONFIG_HEADER, yaml))
}

/// Write `config` to `path` atomically, creating parent directories.
pub fn write_config(path: &Path, config: &RubricSetConfig) -> Result<()> {
    if let Err(errors) = validate_rubrics(config) {
        anyhow::bail!("Refusing to write invalid rubrics ({} errors)", errors.len());
    }

    ensure_parent_dir(path)?;
    let content = render_config(config)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(content.as_bytes())
        .context("Failed to write rubric config")?;
    file.commit().context("Failed to save rubric config")?;

    Ok(())
}

/// Write the built-in rubrics to `path` (or the default config path).
///
/// An existing file is only replaced with `force` or after confirmation.
/// Returns the path written, or None if the user kept the existing file.
pub fn run_init(path: Option<PathBuf>, force: bool) -> Result<Option<PathBuf>> {
    let config_path = path.unwrap_or_else(get_config_path);

    if config_path.exists() && !force {
        let overwrite = prompt_yes_no(
            &format!("{} already exists. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            return Ok(None);
        }
    }

    write_config(&config_path, &RubricSetConfig::default())?;
    info!(path = %config_path.display(), "wrote default rubric config");
    Ok(Some(config_path))
}
