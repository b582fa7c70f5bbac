use super::types::{HistoryState, HISTORY_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// `history.json` next to the rubric config.
pub fn get_history_path() -> PathBuf {
    crate::config::get_config_dir().join("history.json")
}

/// Read every stored score record.
///
/// No file yet means no scores have been saved. A file written by another
/// format version is refused rather than guessed at.
pub fn load_history(path: &Path) -> Result<HistoryState> {
    if !path.exists() {
        return Ok(HistoryState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Cannot read score history {}", path.display()))?;

    let state: HistoryState =
        serde_json::from_reader(file).context("Cannot parse score history")?;

    if state.version != HISTORY_VERSION {
        anyhow::bail!(
            "Score history format v{} is not supported (expected v{})",
            state.version,
            HISTORY_VERSION
        );
    }

    Ok(state)
}

/// Replace the history file with `state`.
///
/// Goes through a temporary file that is renamed into place on commit, so a
/// crash mid-write keeps the earlier records intact.
pub fn save_history(path: &Path, state: &HistoryState) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Cannot write score history {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Cannot encode score history")?;

    file.commit()
        .with_context(|| format!("Cannot commit score history {}", path.display()))?;

    Ok(())
}
