use std::collections::HashSet;

use super::config::{RubricConfig, RubricSetConfig};
use crate::error::RubricError;

/// Tolerance for the weight-sum check.
pub const WEIGHT_EPSILON: f64 = 1e-6;

/// Validate rubric configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_rubrics(config: &RubricSetConfig) -> Result<(), Vec<RubricError>> {
    let mut errors = Vec::new();
    let mut seen_versions = HashSet::new();

    for (i, rubric) in config.rubrics.iter().enumerate() {
        let context = format!("rubrics[{}]", i);

        if !seen_versions.insert((rubric.tier, rubric.version)) {
            errors.push(RubricError::DuplicateVersion {
                context: context.clone(),
                tier: rubric.tier,
                version: rubric.version,
            });
        }

        validate_rubric(rubric, &context, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_rubric(rubric: &RubricConfig, context: &str, errors: &mut Vec<RubricError>) {
    let total = rubric.effective_total_weight();
    let total_ok = total.is_finite() && total > 0.0;
    if !total_ok {
        errors.push(RubricError::InvalidTotal {
            context: context.to_string(),
            value: total,
        });
    }

    if rubric.dimensions.is_empty() {
        errors.push(RubricError::NoDimensions {
            context: context.to_string(),
        });
    }

    let mut names = HashSet::new();
    let mut weights_ok = true;
    for (j, dim) in rubric.dimensions.iter().enumerate() {
        let dim_context = format!("{}.dimensions[{}]", context, j);

        if dim.name.trim().is_empty() {
            errors.push(RubricError::EmptyDimensionName {
                context: dim_context.clone(),
            });
        } else if !names.insert(dim.name.as_str()) {
            errors.push(RubricError::DuplicateDimension {
                context: context.to_string(),
                name: dim.name.clone(),
            });
        }

        if !dim.weight.is_finite() || dim.weight < 0.0 {
            weights_ok = false;
            errors.push(RubricError::InvalidWeight {
                context: dim_context.clone(),
                value: dim.weight,
            });
        }

        if !dim.min.is_finite() || !dim.max.is_finite() || dim.min >= dim.max {
            errors.push(RubricError::InvalidRange {
                context: dim_context,
                min: dim.min,
                max: dim.max,
            });
        }
    }

    // Only meaningful once the individual weights and total are sane
    if total_ok && weights_ok && !rubric.dimensions.is_empty() {
        let sum: f64 = rubric.dimensions.iter().map(|d| d.weight).sum();
        if (sum - total).abs() > WEIGHT_EPSILON {
            errors.push(RubricError::WeightsInvalid {
                context: context.to_string(),
                expected: total,
                actual: sum,
            });
        }
    }

    let t = rubric.effective_thresholds();
    let ordered = t.notable > 0.0
        && t.notable < t.distinguished
        && t.distinguished < t.exceptional
        && t.exceptional <= 100.0;
    if !ordered {
        errors.push(RubricError::InvalidThresholds {
            context: context.to_string(),
            notable: t.notable,
            distinguished: t.distinguished,
            exceptional: t.exceptional,
        });
    }
}
