pub mod classifier;
pub mod config;
pub mod engine;
pub mod inputs;
pub mod record;
pub mod registry;
pub mod rubric;
pub mod tier;
pub mod validation;

pub use classifier::{apply_override, classify, EditorialOverride, IndexTier, Thresholds};
pub use config::*;
pub use engine::{
    compute, reproduce, round_half_even_1dp, score_property, score_property_now, verify, Composite,
    ScoreRequest,
};
pub use inputs::{validate_scores, ValidatedScores};
pub use record::{build, Clock, CompositeScore, Contribution, FixedClock, RecordParts, SystemClock};
pub use registry::{RubricRegistry, RubricTable};
pub use rubric::{Dimension, RubricDefinition, ScoreRange};
pub use tier::{DimensionScores, PropertyTier, TierScores};
pub use validation::{validate_rubrics, WEIGHT_EPSILON};
