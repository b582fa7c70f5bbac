use super::rubric::{Dimension, RubricDefinition};
use super::tier::{DimensionScores, TierScores};
use crate::error::ScoringError;

/// Raw scores that passed [`validate_scores`] against a specific rubric.
///
/// Only `validate_scores` builds one, so every rubric dimension is known to
/// be present and in range.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedScores<'a> {
    rubric: &'a RubricDefinition,
    scores: &'a DimensionScores,
    // One value per rubric dimension, in rubric order
    values: Vec<f64>,
}

impl<'a> ValidatedScores<'a> {
    pub fn rubric(&self) -> &'a RubricDefinition {
        self.rubric
    }

    /// The input mapping, unchanged
    pub fn scores(&self) -> &'a DimensionScores {
        self.scores
    }

    /// Rubric dimensions paired with their raw scores
    pub fn iter(&self) -> impl Iterator<Item = (&'a Dimension, f64)> + '_ {
        self.rubric.dimensions.iter().zip(self.values.iter().copied())
    }
}

/// Check raw scores against the rubric of their tier.
///
/// Dimensions are checked in rubric order, so the first missing or
/// out-of-range dimension is the one reported. Values are never clamped.
pub fn validate_scores<'a>(
    rubric: &'a RubricDefinition,
    scores: &'a TierScores,
) -> Result<ValidatedScores<'a>, ScoringError> {
    if scores.tier() != rubric.tier {
        return Err(ScoringError::TierMismatch {
            scores: scores.tier(),
            rubric: rubric.tier,
        });
    }

    let raw = scores.scores();
    let mut values = Vec::with_capacity(rubric.dimensions.len());

    for dim in &rubric.dimensions {
        let value = *raw
            .get(&dim.name)
            .ok_or_else(|| ScoringError::MissingDimension(dim.name.clone()))?;

        if !dim.range.contains(value) {
            return Err(ScoringError::OutOfRange {
                dimension: dim.name.clone(),
                value,
                min: dim.range.min,
                max: dim.range.max,
            });
        }
        values.push(value);
    }

    if let Some(extra) = raw.keys().find(|name| !rubric.declares(name)) {
        return Err(ScoringError::UnexpectedDimension(extra.clone()));
    }

    Ok(ValidatedScores {
        rubric,
        scores: raw,
        values,
    })
}
