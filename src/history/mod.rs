pub mod storage;
pub mod types;

pub use storage::{get_history_path, load_history, save_history};
pub use types::HistoryState;

use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

use crate::scoring::CompositeScore;

/// Persistence for computed scores.
///
/// Stores are append-only: a rescore adds a new record and never touches
/// earlier ones.
pub trait ScoreStore {
    fn save_score(&mut self, record: &CompositeScore) -> Result<()>;

    /// Every stored record for a property, oldest first
    fn history(&self, property_id: &str) -> Result<Vec<CompositeScore>>;
}

/// Score history kept in a JSON file, rewritten atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default location (~/.config/clarus-index/history.json)
    pub fn default_location() -> Self {
        Self::new(get_history_path())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ScoreStore for JsonHistoryStore {
    fn save_score(&mut self, record: &CompositeScore) -> Result<()> {
        let mut state = load_history(&self.path)?;
        state.append(record.clone());
        save_history(&self.path, &state)?;
        debug!(
            property = %record.property_id,
            records = state.records.len(),
            path = %self.path.display(),
            "appended score to history"
        );
        Ok(())
    }

    fn history(&self, property_id: &str) -> Result<Vec<CompositeScore>> {
        let state = load_history(&self.path)?;
        let records = state.for_property(property_id).cloned().collect();
        Ok(records)
    }
}

/// In-memory store for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: HistoryState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn save_score(&mut self, record: &CompositeScore) -> Result<()> {
        self.state.append(record.clone());
        Ok(())
    }

    fn history(&self, property_id: &str) -> Result<Vec<CompositeScore>> {
        Ok(self.state.for_property(property_id).cloned().collect())
    }
}
