//! Tiered composite scoring for wellness-property evaluations.
//!
//! Raw per-dimension scores flow through the rubric registry, input
//! validation, the composite calculator and the tier classifier, and come
//! out as an auditable [`scoring::CompositeScore`].

pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod output;
pub mod scoring;

pub use error::{RubricError, RubricLoadError, ScoringError};
