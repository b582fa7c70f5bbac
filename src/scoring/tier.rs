use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Property classification that selects which rubric applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyTier {
    /// Medical-longevity clinics
    #[serde(rename = "tier_1")]
    Tier1,
    /// Integrated-wellness resorts
    #[serde(rename = "tier_2")]
    Tier2,
    /// Luxury-destination spas
    #[serde(rename = "tier_3")]
    Tier3,
}

impl PropertyTier {
    pub const ALL: [PropertyTier; 3] = [PropertyTier::Tier1, PropertyTier::Tier2, PropertyTier::Tier3];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyTier::Tier1 => "tier_1",
            PropertyTier::Tier2 => "tier_2",
            PropertyTier::Tier3 => "tier_3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyTier::Tier1 => "Medical Longevity",
            PropertyTier::Tier2 => "Integrated Wellness",
            PropertyTier::Tier3 => "Luxury Destination",
        }
    }
}

impl fmt::Display for PropertyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "tier_1" | "tier1" | "1" => Ok(PropertyTier::Tier1),
            "tier_2" | "tier2" | "2" => Ok(PropertyTier::Tier2),
            "tier_3" | "tier3" | "3" => Ok(PropertyTier::Tier3),
            _ => Err(format!("unknown property tier '{}' (expected tier_1, tier_2 or tier_3)", s)),
        }
    }
}

/// Raw sub-scores keyed by dimension name.
pub type DimensionScores = BTreeMap<String, f64>;

/// Raw scores tagged with the tier they were collected for.
///
/// The tag is the only source of the tier during scoring, so a property's
/// scores can never be evaluated against another tier's rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tier", content = "scores")]
pub enum TierScores {
    #[serde(rename = "tier_1")]
    Tier1(DimensionScores),
    #[serde(rename = "tier_2")]
    Tier2(DimensionScores),
    #[serde(rename = "tier_3")]
    Tier3(DimensionScores),
}

impl TierScores {
    pub fn new(tier: PropertyTier, scores: DimensionScores) -> Self {
        match tier {
            PropertyTier::Tier1 => TierScores::Tier1(scores),
            PropertyTier::Tier2 => TierScores::Tier2(scores),
            PropertyTier::Tier3 => TierScores::Tier3(scores),
        }
    }

    pub fn tier(&self) -> PropertyTier {
        match self {
            TierScores::Tier1(_) => PropertyTier::Tier1,
            TierScores::Tier2(_) => PropertyTier::Tier2,
            TierScores::Tier3(_) => PropertyTier::Tier3,
        }
    }

    pub fn scores(&self) -> &DimensionScores {
        match self {
            TierScores::Tier1(s) | TierScores::Tier2(s) | TierScores::Tier3(s) => s,
        }
    }
}
