use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classifier::{EditorialOverride, IndexTier};
use super::tier::{DimensionScores, PropertyTier};

/// Source of the `computed_at` timestamp.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// One dimension's share of the composite, in [0, weight].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub dimension: String,
    pub raw: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Auditable result of one scoring run.
///
/// Never mutated: rescoring a property produces a new record. The
/// `rubric_version` is what makes the record reproducible after the live
/// rubric changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub property_id: String,
    pub tier: PropertyTier,
    pub rubric_version: u32,
    pub raw_scores: DimensionScores,
    pub contributions: Vec<Contribution>,
    pub composite_value: f64,
    /// Tier derived from `composite_value` alone
    pub computed_tier: IndexTier,
    /// Published tier, after any editorial override
    pub index_tier: IndexTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editorial_override: Option<EditorialOverride>,
    pub computed_at: DateTime<Utc>,
}

impl CompositeScore {
    pub fn is_overridden(&self) -> bool {
        self.index_tier != self.computed_tier
    }
}

/// Inputs to [`build`], gathered from the earlier pipeline stages.
pub struct RecordParts<'a> {
    pub property_id: &'a str,
    pub tier: PropertyTier,
    pub rubric_version: u32,
    pub validated_scores: &'a DimensionScores,
    pub contributions: Vec<Contribution>,
    pub composite_value: f64,
    pub computed_tier: IndexTier,
    pub index_tier: IndexTier,
    pub editorial_override: Option<EditorialOverride>,
}

/// Assemble the final record, stamping it with `clock`.
pub fn build(parts: RecordParts<'_>, clock: &dyn Clock) -> CompositeScore {
    CompositeScore {
        property_id: parts.property_id.to_string(),
        tier: parts.tier,
        rubric_version: parts.rubric_version,
        raw_scores: parts.validated_scores.clone(),
        contributions: parts.contributions,
        composite_value: parts.composite_value,
        computed_tier: parts.computed_tier,
        index_tier: parts.index_tier,
        editorial_override: parts.editorial_override,
        computed_at: clock.now(),
    }
}
