use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::config::RubricSetConfig;
use super::rubric::RubricDefinition;
use super::tier::PropertyTier;
use super::validation::validate_rubrics;
use crate::error::{RubricLoadError, ScoringError};

/// Immutable set of every registered rubric version, per tier.
#[derive(Debug, Default)]
pub struct RubricTable {
    rubrics: HashMap<PropertyTier, BTreeMap<u32, Arc<RubricDefinition>>>,
}

impl RubricTable {
    /// Validate `config` and build a table from it.
    pub fn from_config(config: &RubricSetConfig) -> Result<Self, RubricLoadError> {
        validate_rubrics(config)?;

        let mut rubrics: HashMap<PropertyTier, BTreeMap<u32, Arc<RubricDefinition>>> = HashMap::new();
        for rubric in &config.rubrics {
            rubrics
                .entry(rubric.tier)
                .or_default()
                .insert(rubric.version, Arc::new(RubricDefinition::from(rubric)));
        }
        Ok(Self { rubrics })
    }

    /// Live rubric for `tier`: the highest registered version.
    pub fn get_rubric(&self, tier: PropertyTier) -> Result<Arc<RubricDefinition>, ScoringError> {
        self.rubrics
            .get(&tier)
            .and_then(|versions| versions.values().next_back())
            .cloned()
            .ok_or(ScoringError::UnknownTier(tier))
    }

    pub fn get_rubric_version(
        &self,
        tier: PropertyTier,
        version: u32,
    ) -> Result<Arc<RubricDefinition>, ScoringError> {
        let versions = self.rubrics.get(&tier).ok_or(ScoringError::UnknownTier(tier))?;
        versions
            .get(&version)
            .cloned()
            .ok_or(ScoringError::UnknownRubricVersion { tier, version })
    }

    /// Resolve a specific version when given, the live rubric otherwise.
    pub fn resolve(
        &self,
        tier: PropertyTier,
        version: Option<u32>,
    ) -> Result<Arc<RubricDefinition>, ScoringError> {
        match version {
            Some(v) => self.get_rubric_version(tier, v),
            None => self.get_rubric(tier),
        }
    }

    /// Registered tiers in tier order.
    pub fn tiers(&self) -> Vec<PropertyTier> {
        let mut tiers: Vec<_> = self.rubrics.keys().copied().collect();
        tiers.sort();
        tiers
    }

    /// Registered versions of `tier`, oldest first.
    pub fn versions(&self, tier: PropertyTier) -> Vec<u32> {
        self.rubrics
            .get(&tier)
            .map(|versions| versions.keys().copied().collect())
            .unwrap_or_default()
    }

    fn rubric_count(&self) -> usize {
        self.rubrics.values().map(|v| v.len()).sum()
    }
}

/// Process-wide rubric configuration.
///
/// Created once at startup with [`RubricRegistry::load`] and shared by
/// reference. [`RubricRegistry::reload`] swaps the whole table at once, so a
/// reader holding a [`RubricRegistry::snapshot`] sees either the old or the
/// new rubrics in full.
#[derive(Debug)]
pub struct RubricRegistry {
    table: RwLock<Arc<RubricTable>>,
}

impl RubricRegistry {
    pub fn load(config: &RubricSetConfig) -> Result<Self, RubricLoadError> {
        let table = RubricTable::from_config(config)?;
        info!(rubrics = table.rubric_count(), tiers = table.tiers().len(), "rubrics loaded");
        Ok(Self {
            table: RwLock::new(Arc::new(table)),
        })
    }

    /// Replace every rubric at once. An invalid config leaves the current
    /// table in place.
    pub fn reload(&self, config: &RubricSetConfig) -> Result<(), RubricLoadError> {
        let table = Arc::new(RubricTable::from_config(config)?);
        let count = table.rubric_count();
        // A poisoned lock still holds a complete table: only whole Arcs are ever stored
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = table;
        info!(rubrics = count, "rubrics reloaded");
        Ok(())
    }

    pub fn snapshot(&self) -> Arc<RubricTable> {
        let guard = self.table.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    pub fn get_rubric(&self, tier: PropertyTier) -> Result<Arc<RubricDefinition>, ScoringError> {
        self.snapshot().get_rubric(tier)
    }

    pub fn get_rubric_version(
        &self,
        tier: PropertyTier,
        version: u32,
    ) -> Result<Arc<RubricDefinition>, ScoringError> {
        self.snapshot().get_rubric_version(tier, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RubricError;
    use crate::scoring::{DimensionConfig, RubricConfig};

    fn tier3(version: u32, ambiance: f64, service: f64) -> RubricConfig {
        RubricConfig {
            tier: PropertyTier::Tier3,
            version,
            total_weight: None,
            thresholds: None,
            dimensions: vec![
                DimensionConfig { name: "ambiance".to_string(), weight: ambiance, min: 0.0, max: 10.0 },
                DimensionConfig { name: "service".to_string(), weight: service, min: 0.0, max: 10.0 },
            ],
        }
    }

    #[test]
    fn test_get_rubric_returns_latest_version() {
        let config = RubricSetConfig {
            rubrics: vec![tier3(2, 50.0, 50.0), tier3(1, 40.0, 60.0)],
        };
        let registry = RubricRegistry::load(&config).unwrap();
        let live = registry.get_rubric(PropertyTier::Tier3).unwrap();
        assert_eq!(live.version, 2);
        let old = registry.get_rubric_version(PropertyTier::Tier3, 1).unwrap();
        assert_eq!(old.dimensions[0].weight, 40.0);
    }

    #[test]
    fn test_unknown_tier() {
        let config = RubricSetConfig {
            rubrics: vec![tier3(1, 40.0, 60.0)],
        };
        let registry = RubricRegistry::load(&config).unwrap();
        assert_eq!(
            registry.get_rubric(PropertyTier::Tier1).unwrap_err(),
            ScoringError::UnknownTier(PropertyTier::Tier1)
        );
        assert_eq!(
            registry.get_rubric_version(PropertyTier::Tier3, 9).unwrap_err(),
            ScoringError::UnknownRubricVersion {
                tier: PropertyTier::Tier3,
                version: 9
            }
        );
    }

    #[test]
    fn test_load_rejects_bad_weights() {
        let config = RubricSetConfig {
            rubrics: vec![tier3(1, 40.0, 40.0)],
        };
        let err = RubricRegistry::load(&config).unwrap_err();
        assert!(matches!(err.errors[0], RubricError::WeightsInvalid { .. }));
    }

    #[test]
    fn test_reload_swaps_whole_table() {
        let registry = RubricRegistry::load(&RubricSetConfig::default()).unwrap();
        let before = registry.snapshot();
        assert_eq!(before.tiers().len(), 3);

        registry
            .reload(&RubricSetConfig {
                rubrics: vec![tier3(7, 50.0, 50.0)],
            })
            .unwrap();

        // The earlier snapshot is untouched
        assert_eq!(before.tiers().len(), 3);
        assert_eq!(before.get_rubric(PropertyTier::Tier3).unwrap().version, 1);

        let after = registry.snapshot();
        assert_eq!(after.tiers(), vec![PropertyTier::Tier3]);
        assert_eq!(after.versions(PropertyTier::Tier3), vec![7]);
    }

    #[test]
    fn test_failed_reload_keeps_current_table() {
        let registry = RubricRegistry::load(&RubricSetConfig::default()).unwrap();
        let result = registry.reload(&RubricSetConfig {
            rubrics: vec![tier3(2, 10.0, 10.0)],
        });
        assert!(result.is_err());
        assert_eq!(registry.get_rubric(PropertyTier::Tier3).unwrap().version, 1);
        assert!(registry.get_rubric(PropertyTier::Tier1).is_ok());
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        let registry = Arc::new(RubricRegistry::load(&RubricSetConfig::default()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get_rubric(PropertyTier::Tier2).unwrap().version)
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}
