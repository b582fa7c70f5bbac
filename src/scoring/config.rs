use serde::{Deserialize, Serialize};

use super::tier::PropertyTier;

/// Rubric configuration for every property tier.
///
/// Each entry is one version of one tier's rubric. The highest version of a
/// tier is the live rubric; older versions stay registered so historical
/// scores can be reproduced.
///
/// Example YAML:
/// ```yaml
/// rubrics:
///   - tier: tier_3
///     version: 1
///     total_weight: 100
///     thresholds: { exceptional: 90, distinguished: 75, notable: 60 }
///     dimensions:
///       - { name: ambiance, weight: 40, min: 0, max: 10 }
///       - { name: service, weight: 60, min: 0, max: 10 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RubricSetConfig {
    pub rubrics: Vec<RubricConfig>,
}

/// One version of a tier's rubric.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RubricConfig {
    pub tier: PropertyTier,

    /// Rubric version, recorded on every score computed with it (default: 1)
    #[serde(default = "default_version")]
    pub version: u32,

    /// Declared sum of all dimension weights (default: 100.0)
    #[serde(default)]
    pub total_weight: Option<f64>,

    /// Index tier boundaries (default: 90 / 75 / 60)
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,

    /// Scored dimensions, in display order
    pub dimensions: Vec<DimensionConfig>,
}

/// A scored dimension with its weight and valid raw-score range.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DimensionConfig {
    pub name: String,
    pub weight: f64,
    /// Lowest valid raw score (default: 0.0)
    #[serde(default)]
    pub min: f64,
    pub max: f64,
}

/// Inclusive lower bounds of the index tiers. Anything below `notable` is
/// CURATED.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    pub exceptional: f64,
    pub distinguished: f64,
    pub notable: f64,
}

pub const DEFAULT_TOTAL_WEIGHT: f64 = 100.0;

fn default_version() -> u32 {
    1
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            exceptional: 90.0,
            distinguished: 75.0,
            notable: 60.0,
        }
    }
}

impl RubricConfig {
    pub fn effective_total_weight(&self) -> f64 {
        self.total_weight.unwrap_or(DEFAULT_TOTAL_WEIGHT)
    }

    pub fn effective_thresholds(&self) -> ThresholdConfig {
        self.thresholds.unwrap_or_default()
    }
}

fn dimension(name: &str, weight: f64) -> DimensionConfig {
    DimensionConfig {
        name: name.to_string(),
        weight,
        min: 0.0,
        max: 10.0,
    }
}

// Placeholder weights until the editorial team publishes the business rubric.
impl Default for RubricSetConfig {
    fn default() -> Self {
        Self {
            rubrics: vec![
                RubricConfig {
                    tier: PropertyTier::Tier1,
                    version: 1,
                    total_weight: None,
                    thresholds: None,
                    dimensions: vec![
                        dimension("medical_credentials", 30.0),
                        dimension("diagnostics", 25.0),
                        dimension("protocol_evidence", 25.0),
                        dimension("aftercare", 10.0),
                        dimension("hospitality", 10.0),
                    ],
                },
                RubricConfig {
                    tier: PropertyTier::Tier2,
                    version: 1,
                    total_weight: None,
                    thresholds: None,
                    dimensions: vec![
                        dimension("program_design", 25.0),
                        dimension("practitioners", 25.0),
                        dimension("nutrition", 20.0),
                        dimension("facilities", 15.0),
                        dimension("service", 15.0),
                    ],
                },
                RubricConfig {
                    tier: PropertyTier::Tier3,
                    version: 1,
                    total_weight: None,
                    thresholds: None,
                    dimensions: vec![dimension("ambiance", 40.0), dimension("service", 60.0)],
                },
            ],
        }
    }
}
