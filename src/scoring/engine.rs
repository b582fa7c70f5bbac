use tracing::debug;

use super::classifier::{apply_override, classify, EditorialOverride};
use super::inputs::{validate_scores, ValidatedScores};
use super::record::{build, Clock, CompositeScore, Contribution, FixedClock, RecordParts, SystemClock};
use super::registry::RubricRegistry;
use super::tier::TierScores;
use crate::error::ScoringError;

/// Weighted contributions and the composite they add up to.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    pub contributions: Vec<Contribution>,
    pub composite_value: f64,
}

/// A request to score one property.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRequest {
    pub property_id: String,
    pub scores: TierScores,
    /// Score against this rubric version instead of the live one
    pub rubric_version: Option<u32>,
    pub editorial_override: Option<EditorialOverride>,
}

impl ScoreRequest {
    pub fn new(property_id: impl Into<String>, scores: TierScores) -> Self {
        Self {
            property_id: property_id.into(),
            scores,
            rubric_version: None,
            editorial_override: None,
        }
    }

    pub fn with_rubric_version(mut self, version: u32) -> Self {
        self.rubric_version = Some(version);
        self
    }

    pub fn with_override(mut self, editorial: EditorialOverride) -> Self {
        self.editorial_override = Some(editorial);
        self
    }
}

/// Round to one decimal place, ties to even.
pub fn round_half_even_1dp(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Combine validated scores into the composite index value, using the
/// rubric they were validated against.
///
/// Each contribution is `(raw - min) * weight / (max - min)`, which lies in
/// `[0, weight]`. The sum is rescaled to 100 points and rounded once.
pub fn compute(validated: &ValidatedScores<'_>) -> Composite {
    let rubric = validated.rubric();
    let contributions: Vec<Contribution> = validated
        .iter()
        .map(|(dim, raw)| Contribution {
            dimension: dim.name.clone(),
            raw,
            weight: dim.weight,
            contribution: (raw - dim.range.min) * dim.weight / dim.range.span(),
        })
        .collect();

    let sum: f64 = contributions.iter().map(|c| c.contribution).sum();
    let composite_value = round_half_even_1dp(sum * 100.0 / rubric.total_weight).clamp(0.0, 100.0);

    Composite {
        contributions,
        composite_value,
    }
}

/// Score a property against the registry's rubrics.
///
/// The rubric is resolved from a single registry snapshot, so a concurrent
/// reload never mixes two rubric tables within one run.
pub fn score_property(
    registry: &RubricRegistry,
    request: &ScoreRequest,
    clock: &dyn Clock,
) -> Result<CompositeScore, ScoringError> {
    let table = registry.snapshot();
    let tier = request.scores.tier();
    let rubric = table.resolve(tier, request.rubric_version)?;

    let validated = validate_scores(&rubric, &request.scores)?;
    let composite = compute(&validated);
    let computed_tier = classify(composite.composite_value, &rubric.thresholds);
    let index_tier = apply_override(computed_tier, request.editorial_override.as_ref());

    debug!(
        property = %request.property_id,
        %tier,
        rubric_version = rubric.version,
        composite = composite.composite_value,
        %computed_tier,
        %index_tier,
        "scored property"
    );

    Ok(build(
        RecordParts {
            property_id: &request.property_id,
            tier,
            rubric_version: rubric.version,
            validated_scores: validated.scores(),
            contributions: composite.contributions,
            composite_value: composite.composite_value,
            computed_tier,
            index_tier,
            editorial_override: request.editorial_override.clone(),
        },
        clock,
    ))
}

/// [`score_property`] stamped with the current time.
pub fn score_property_now(
    registry: &RubricRegistry,
    request: &ScoreRequest,
) -> Result<CompositeScore, ScoringError> {
    score_property(registry, request, &SystemClock)
}

/// Recompute a stored record under its own recorded rubric version,
/// never the live one.
pub fn reproduce(registry: &RubricRegistry, record: &CompositeScore) -> Result<CompositeScore, ScoringError> {
    let request = ScoreRequest {
        property_id: record.property_id.clone(),
        scores: TierScores::new(record.tier, record.raw_scores.clone()),
        rubric_version: Some(record.rubric_version),
        editorial_override: record.editorial_override.clone(),
    };
    score_property(registry, &request, &FixedClock(record.computed_at))
}

/// Whether a stored record's outcome is what its rubric version produces
/// today: same version, composite value and tiers.
pub fn verify(registry: &RubricRegistry, record: &CompositeScore) -> Result<bool, ScoringError> {
    let reproduced = reproduce(registry, record)?;
    Ok(reproduced.rubric_version == record.rubric_version
        && reproduced.composite_value == record.composite_value
        && reproduced.computed_tier == record.computed_tier
        && reproduced.index_tier == record.index_tier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{
        DimensionConfig, IndexTier, PropertyTier, RubricConfig, RubricSetConfig,
    };
    use chrono::{TimeZone, Utc};

    fn tier3_config(version: u32, ambiance: f64, service: f64) -> RubricConfig {
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

    fn registry() -> RubricRegistry {
        RubricRegistry::load(&RubricSetConfig {
            rubrics: vec![tier3_config(1, 40.0, 60.0)],
        })
        .unwrap()
    }

    fn tier3(ambiance: f64, service: f64) -> TierScores {
        TierScores::Tier3(
            [("ambiance".to_string(), ambiance), ("service".to_string(), service)]
                .into_iter()
                .collect(),
        )
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap())
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even_1dp(86.25), 86.2);
        assert_eq!(round_half_even_1dp(86.75), 86.8);
        assert_eq!(round_half_even_1dp(86.0), 86.0);
        assert_eq!(round_half_even_1dp(0.0), 0.0);
    }

    #[test]
    fn test_worked_example() {
        let record = score_property(&registry(), &ScoreRequest::new("villa-1", tier3(8.0, 9.0)), &clock()).unwrap();

        assert_eq!(record.contributions[0].dimension, "ambiance");
        assert_eq!(record.contributions[0].contribution, 32.0);
        assert_eq!(record.contributions[1].dimension, "service");
        assert_eq!(record.contributions[1].contribution, 54.0);
        assert_eq!(record.composite_value, 86.0);
        assert_eq!(record.computed_tier, IndexTier::Distinguished);
        assert_eq!(record.index_tier, IndexTier::Distinguished);
        assert_eq!(record.rubric_version, 1);
        assert_eq!(record.computed_at, clock().0);
    }

    #[test]
    fn test_rounds_once_at_the_end() {
        // 33.0 + 53.25 = 86.25, which rounds to 86.2 (ties to even)
        let record = score_property(&registry(), &ScoreRequest::new("villa-1", tier3(8.25, 8.875)), &clock()).unwrap();
        assert_eq!(record.contributions[0].contribution, 33.0);
        assert_eq!(record.contributions[1].contribution, 53.25);
        assert_eq!(record.composite_value, 86.2);
    }

    #[test]
    fn test_non_zero_minimum_and_fractional_total() {
        let registry = RubricRegistry::load(&RubricSetConfig {
            rubrics: vec![RubricConfig {
                tier: PropertyTier::Tier1,
                version: 1,
                total_weight: Some(1.0),
                thresholds: None,
                dimensions: vec![
                    DimensionConfig { name: "diagnostics".to_string(), weight: 0.5, min: 1.0, max: 5.0 },
                    DimensionConfig { name: "aftercare".to_string(), weight: 0.5, min: 1.0, max: 5.0 },
                ],
            }],
        })
        .unwrap();
        let scores = TierScores::Tier1(
            [("diagnostics".to_string(), 1.0), ("aftercare".to_string(), 5.0)]
                .into_iter()
                .collect(),
        );
        let record = score_property(&registry, &ScoreRequest::new("clinic-9", scores), &clock()).unwrap();
        assert_eq!(record.contributions[0].contribution, 0.0);
        assert_eq!(record.contributions[1].contribution, 0.5);
        assert_eq!(record.composite_value, 50.0);
        assert_eq!(record.computed_tier, IndexTier::Curated);
    }

    #[test]
    fn test_composite_stays_within_bounds() {
        let registry = registry();
        let low = score_property(&registry, &ScoreRequest::new("p", tier3(0.0, 0.0)), &clock()).unwrap();
        let high = score_property(&registry, &ScoreRequest::new("p", tier3(10.0, 10.0)), &clock()).unwrap();
        assert_eq!(low.composite_value, 0.0);
        assert_eq!(high.composite_value, 100.0);
        assert_eq!(high.computed_tier, IndexTier::Exceptional);
    }

    #[test]
    fn test_deterministic() {
        let registry = registry();
        let request = ScoreRequest::new("villa-1", tier3(7.3, 6.1));
        let a = score_property(&registry, &request, &clock()).unwrap();
        let b = score_property(&registry, &request, &clock()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.composite_value.to_bits(), b.composite_value.to_bits());
    }

    #[test]
    fn test_out_of_range_example() {
        let err = score_property(&registry(), &ScoreRequest::new("villa-1", tier3(11.0, 9.0)), &clock()).unwrap_err();
        assert_eq!(
            err,
            ScoringError::OutOfRange {
                dimension: "ambiance".to_string(),
                value: 11.0,
                min: 0.0,
                max: 10.0,
            }
        );
    }

    #[test]
    fn test_missing_dimension_example() {
        let scores = TierScores::Tier3([("ambiance".to_string(), 8.0)].into_iter().collect());
        let err = score_property(&registry(), &ScoreRequest::new("villa-1", scores), &clock()).unwrap_err();
        assert_eq!(err, ScoringError::MissingDimension("service".to_string()));
    }

    #[test]
    fn test_unregistered_tier() {
        let scores = TierScores::Tier2(Default::default());
        let err = score_property(&registry(), &ScoreRequest::new("resort-2", scores), &clock()).unwrap_err();
        assert_eq!(err, ScoringError::UnknownTier(PropertyTier::Tier2));
    }

    #[test]
    fn test_override_vetoes_tier_but_not_value() {
        let request = ScoreRequest::new("villa-1", tier3(9.5, 9.5)).with_override(EditorialOverride {
            max_tier: IndexTier::Notable,
            reason: "ownership change".to_string(),
        });
        let record = score_property(&registry(), &request, &clock()).unwrap();
        assert_eq!(record.composite_value, 95.0);
        assert_eq!(record.computed_tier, IndexTier::Exceptional);
        assert_eq!(record.index_tier, IndexTier::Notable);
        assert!(record.is_overridden());
    }

    #[test]
    fn test_rescoring_keeps_old_record_reproducible() {
        let registry = registry();
        let first = score_property(&registry, &ScoreRequest::new("villa-1", tier3(8.0, 9.0)), &clock()).unwrap();

        registry
            .reload(&RubricSetConfig {
                rubrics: vec![tier3_config(1, 40.0, 60.0), tier3_config(2, 70.0, 30.0)],
            })
            .unwrap();

        let second = score_property(&registry, &ScoreRequest::new("villa-1", tier3(8.0, 9.0)), &clock()).unwrap();
        assert_eq!(second.rubric_version, 2);
        assert_eq!(second.composite_value, 83.0);

        assert_eq!(first.rubric_version, 1);
        assert_eq!(first.composite_value, 86.0);
        assert!(verify(&registry, &first).unwrap());
        assert!(verify(&registry, &second).unwrap());
    }

    #[test]
    fn test_verify_detects_tampered_record() {
        let registry = registry();
        let mut record = score_property(&registry, &ScoreRequest::new("villa-1", tier3(8.0, 9.0)), &clock()).unwrap();
        record.composite_value = 91.0;
        assert!(!verify(&registry, &record).unwrap());
    }

    #[test]
    fn test_compute_uses_values_from_validation() {
        let registry = registry();
        let rubric = registry.get_rubric(PropertyTier::Tier3).unwrap();

        let partial = TierScores::Tier3([("ambiance".to_string(), 8.0)].into_iter().collect());
        assert_eq!(
            validate_scores(&rubric, &partial).unwrap_err(),
            ScoringError::MissingDimension("service".to_string())
        );

        let full = tier3(8.0, 9.0);
        let composite = compute(&validate_scores(&rubric, &full).unwrap());
        let raws: Vec<f64> = composite.contributions.iter().map(|c| c.raw).collect();
        assert_eq!(raws, vec![8.0, 9.0]);
        assert_eq!(composite.composite_value, 86.0);
    }

    #[test]
    fn test_verify_detects_changed_tier() {
        let registry = registry();
        let mut record = score_property(&registry, &ScoreRequest::new("villa-1", tier3(8.0, 9.0)), &clock()).unwrap();
        record.index_tier = IndexTier::Exceptional;
        assert!(!verify(&registry, &record).unwrap());
    }

    #[test]
    fn test_explicit_rubric_version() {
        let registry = registry();
        let err = score_property(
            &registry,
            &ScoreRequest::new("villa-1", tier3(8.0, 9.0)).with_rubric_version(3),
            &clock(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ScoringError::UnknownRubricVersion {
                tier: PropertyTier::Tier3,
                version: 3
            }
        );
    }
}
