use std::fmt;

use thiserror::Error;

use crate::scoring::PropertyTier;

/// Per-call scoring failure.
///
/// Every variant is a validation error on the caller's input: scoring is a
/// pure computation, so retrying with the same input always fails the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("no rubric registered for {0}")]
    UnknownTier(PropertyTier),

    #[error("no rubric version {version} registered for {tier}")]
    UnknownRubricVersion { tier: PropertyTier, version: u32 },

    #[error("missing score for dimension '{0}'")]
    MissingDimension(String),

    #[error("unexpected dimension '{0}' is not part of the rubric")]
    UnexpectedDimension(String),

    #[error("score {value} for dimension '{dimension}' is outside [{min}, {max}]")]
    OutOfRange {
        dimension: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{scores} scores cannot be evaluated with the {rubric} rubric")]
    TierMismatch {
        scores: PropertyTier,
        rubric: PropertyTier,
    },
}

/// A single problem found while validating rubric configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RubricError {
    #[error("{context}: weights sum to {actual}, expected {expected}")]
    WeightsInvalid {
        context: String,
        expected: f64,
        actual: f64,
    },

    #[error("{context}: total_weight must be positive, got {value}")]
    InvalidTotal { context: String, value: f64 },

    #[error("{context}.weight: must be a non-negative number, got {value}")]
    InvalidWeight { context: String, value: f64 },

    #[error("{context}: range [{min}, {max}] is empty or not finite")]
    InvalidRange { context: String, min: f64, max: f64 },

    #[error("{context}.name: must not be empty")]
    EmptyDimensionName { context: String },

    #[error("{context}: dimension '{name}' is declared more than once")]
    DuplicateDimension { context: String, name: String },

    #[error("{context}: rubric declares no dimensions")]
    NoDimensions { context: String },

    #[error("{context}.thresholds: expected 0 < notable < distinguished < exceptional <= 100, got {notable}/{distinguished}/{exceptional}")]
    InvalidThresholds {
        context: String,
        notable: f64,
        distinguished: f64,
        exceptional: f64,
    },

    #[error("{context}: version {version} of {tier} is declared more than once")]
    DuplicateVersion {
        context: String,
        tier: PropertyTier,
        version: u32,
    },
}

/// Rubric configuration rejected at load time. Holds every problem found,
/// not just the first.
#[derive(Debug, Clone, PartialEq)]
pub struct RubricLoadError {
    pub errors: Vec<RubricError>,
}

impl fmt::Display for RubricLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid rubric configuration ({} errors)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for RubricLoadError {}

impl From<Vec<RubricError>> for RubricLoadError {
    fn from(errors: Vec<RubricError>) -> Self {
        Self { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_names_dimension_and_range() {
        let err = ScoringError::OutOfRange {
            dimension: "ambiance".to_string(),
            value: 11.0,
            min: 0.0,
            max: 10.0,
        };
        assert_eq!(
            err.to_string(),
            "score 11 for dimension 'ambiance' is outside [0, 10]"
        );
    }

    #[test]
    fn test_load_error_lists_every_problem() {
        let err = RubricLoadError::from(vec![
            RubricError::NoDimensions {
                context: "rubrics[0]".to_string(),
            },
            RubricError::InvalidTotal {
                context: "rubrics[1]".to_string(),
                value: 0.0,
            },
        ]);
        let message = err.to_string();
        assert!(message.starts_with("invalid rubric configuration (2 errors)"));
        assert!(message.contains("rubrics[0]: rubric declares no dimensions"));
        assert!(message.contains("rubrics[1]: total_weight must be positive"));
    }
}
