use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::config::ThresholdConfig;

/// Discrete quality band derived from the composite value.
///
/// Ordered from lowest to highest so `min` picks the more conservative tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexTier {
    Curated,
    Notable,
    Distinguished,
    Exceptional,
}

impl IndexTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexTier::Curated => "CURATED",
            IndexTier::Notable => "NOTABLE",
            IndexTier::Distinguished => "DISTINGUISHED",
            IndexTier::Exceptional => "EXCEPTIONAL",
        }
    }

    /// Inclusive lower bound of this tier under the given thresholds.
    pub fn lower_bound(&self, thresholds: &Thresholds) -> f64 {
        match self {
            IndexTier::Curated => 0.0,
            IndexTier::Notable => thresholds.notable,
            IndexTier::Distinguished => thresholds.distinguished,
            IndexTier::Exceptional => thresholds.exceptional,
        }
    }
}

impl fmt::Display for IndexTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CURATED" => Ok(IndexTier::Curated),
            "NOTABLE" => Ok(IndexTier::Notable),
            "DISTINGUISHED" => Ok(IndexTier::Distinguished),
            "EXCEPTIONAL" => Ok(IndexTier::Exceptional),
            _ => Err(format!("unknown index tier '{}'", s)),
        }
    }
}

/// Inclusive lower bounds for NOTABLE, DISTINGUISHED and EXCEPTIONAL.
/// Must satisfy `0 < notable < distinguished < exceptional <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub exceptional: f64,
    pub distinguished: f64,
    pub notable: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from(ThresholdConfig::default())
    }
}

impl From<ThresholdConfig> for Thresholds {
    fn from(config: ThresholdConfig) -> Self {
        Self {
            exceptional: config.exceptional,
            distinguished: config.distinguished,
            notable: config.notable,
        }
    }
}

/// Editorial cap on a property's index tier.
///
/// The effective tier is the lower of the computed tier and `max_tier`; the
/// composite value is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorialOverride {
    pub max_tier: IndexTier,
    pub reason: String,
}

/// Map a composite value to its index tier. Total over all inputs: anything
/// below the NOTABLE bound, including NaN, is CURATED.
pub fn classify(value: f64, thresholds: &Thresholds) -> IndexTier {
    if value >= thresholds.exceptional {
        IndexTier::Exceptional
    } else if value >= thresholds.distinguished {
        IndexTier::Distinguished
    } else if value >= thresholds.notable {
        IndexTier::Notable
    } else {
        IndexTier::Curated
    }
}

/// Resolve the published tier from the computed one and an optional override.
pub fn apply_override(computed: IndexTier, editorial: Option<&EditorialOverride>) -> IndexTier {
    match editorial {
        Some(o) => computed.min(o.max_tier),
        None => computed,
    }
}
