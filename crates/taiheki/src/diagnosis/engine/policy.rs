use serde::{Deserialize, Serialize};

use super::config::ConfidenceThresholds;

const PROGRESS_DAMPING_EXPONENT: f64 = 0.4;
const PROGRESSIVE_CONFIDENCE_CAP: f64 = 2.0;

/// Human-facing certainty bucket derived from the primary/secondary ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReliabilityTier {
    VeryHigh,
    High,
    Medium,
    ReferenceOnly,
}

impl ReliabilityTier {
    pub const fn label(self) -> &'static str {
        match self {
            ReliabilityTier::VeryHigh => "very high",
            ReliabilityTier::High => "high",
            ReliabilityTier::Medium => "medium",
            ReliabilityTier::ReferenceOnly => "reference only",
        }
    }

    pub const fn stars(self) -> u8 {
        match self {
            ReliabilityTier::VeryHigh => 5,
            ReliabilityTier::High => 4,
            ReliabilityTier::Medium => 3,
            ReliabilityTier::ReferenceOnly => 2,
        }
    }

    /// Five-slot star rating, e.g. `★★★★☆`.
    pub fn star_rating(self) -> String {
        let filled = usize::from(self.stars());
        let mut rating = "★".repeat(filled);
        rating.push_str(&"☆".repeat(5 - filled));
        rating
    }
}

/// Ratio of the two best scores. A zero runner-up counts as maximal separation.
pub(crate) fn confidence_ratio(
    primary: i64,
    secondary: i64,
    thresholds: &ConfidenceThresholds,
) -> f64 {
    if secondary == 0 {
        return thresholds.very_high;
    }
    primary as f64 / secondary as f64
}

pub(crate) fn progressive_confidence(
    primary: i64,
    secondary: i64,
    completion_rate: f64,
    thresholds: &ConfidenceThresholds,
) -> f64 {
    let base = confidence_ratio(primary, secondary, thresholds);
    (base * completion_rate.powf(PROGRESS_DAMPING_EXPONENT)).min(PROGRESSIVE_CONFIDENCE_CAP)
}

pub(crate) fn reliability_for(
    confidence: f64,
    thresholds: &ConfidenceThresholds,
) -> ReliabilityTier {
    if confidence >= thresholds.very_high {
        ReliabilityTier::VeryHigh
    } else if confidence >= thresholds.high {
        ReliabilityTier::High
    } else if confidence >= thresholds.medium {
        ReliabilityTier::Medium
    } else {
        ReliabilityTier::ReferenceOnly
    }
}
