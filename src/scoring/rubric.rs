use serde::{Deserialize, Serialize};

use super::classifier::Thresholds;
use super::config::RubricConfig;
use super::tier::PropertyTier;

/// Inclusive range of valid raw scores for a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// NaN never matches.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub name: String,
    pub weight: f64,
    pub range: ScoreRange,
}

/// A validated, immutable rubric for one tier at one version.
#[derive(Debug, Clone, PartialEq)]
pub struct RubricDefinition {
    pub tier: PropertyTier,
    pub version: u32,
    pub total_weight: f64,
    pub dimensions: Vec<Dimension>,
    pub thresholds: Thresholds,
}

impl RubricDefinition {
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.dimension(name).is_some()
    }
}

impl From<&RubricConfig> for RubricDefinition {
    /// Callers must run `validate_rubrics` first; this conversion does not
    /// re-check weights or ranges.
    fn from(config: &RubricConfig) -> Self {
        Self {
            tier: config.tier,
            version: config.version,
            total_weight: config.effective_total_weight(),
            dimensions: config
                .dimensions
                .iter()
                .map(|d| Dimension {
                    name: d.name.clone(),
                    weight: d.weight,
                    range: ScoreRange::new(d.min, d.max),
                })
                .collect(),
            thresholds: Thresholds::from(config.effective_thresholds()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::DimensionConfig;

    #[test]
    fn test_range_contains_bounds() {
        let range = ScoreRange::new(0.0, 10.0);
        assert!(range.contains(0.0));
        assert!(range.contains(10.0));
        assert!(!range.contains(10.5));
        assert!(!range.contains(-0.1));
        assert!(!range.contains(f64::NAN));
        assert!(!range.contains(f64::INFINITY));
    }

    #[test]
    fn test_range_span() {
        assert_eq!(ScoreRange::new(0.0, 10.0).span(), 10.0);
        assert_eq!(ScoreRange::new(1.0, 5.0).span(), 4.0);
    }

    #[test]
    fn test_definition_from_config_keeps_order() {
        let config = RubricConfig {
            tier: PropertyTier::Tier3,
            version: 4,
            total_weight: None,
            thresholds: None,
            dimensions: vec![
                DimensionConfig { name: "service".to_string(), weight: 60.0, min: 0.0, max: 10.0 },
                DimensionConfig { name: "ambiance".to_string(), weight: 40.0, min: 0.0, max: 10.0 },
            ],
        };
        let rubric = RubricDefinition::from(&config);
        assert_eq!(rubric.version, 4);
        assert_eq!(rubric.total_weight, 100.0);
        assert_eq!(rubric.dimensions[0].name, "service");
        assert!(rubric.declares("ambiance"));
        assert!(!rubric.declares("spa"));
        assert_eq!(rubric.thresholds, Thresholds::default());
    }
}
