use serde::{Deserialize, Serialize};

use crate::scoring::CompositeScore;

pub const HISTORY_VERSION: u32 = 1;

/// On-disk score history. Records are only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryState {
    pub version: u32,
    #[serde(default)]
    pub records: Vec<CompositeScore>,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryState {
    /// Create a new empty history with the current format version
    pub fn new() -> Self {
        Self {
            version: HISTORY_VERSION,
            records: Vec::new(),
        }
    }

    pub fn append(&mut self, record: CompositeScore) {
        self.records.push(record);
    }

    /// Records for one property, oldest first
    pub fn for_property<'a>(&'a self, property_id: &'a str) -> impl Iterator<Item = &'a CompositeScore> + 'a {
        self.records.iter().filter(move |r| r.property_id == property_id)
    }
}
