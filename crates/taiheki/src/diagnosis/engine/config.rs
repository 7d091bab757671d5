use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning dials for catalogue validation, reliability tiers and caching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_options_per_question: usize,
    pub confidence_thresholds: ConfidenceThresholds,
    pub max_response_time_ms: u64,
    /// Number of answer patterns kept in the score cache; 0 disables caching.
    pub cache_capacity: usize,
}

impl EngineConfig {
    pub fn max_response_time(&self) -> Duration {
        Duration::from_millis(self.max_response_time_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_options_per_question: 4,
            confidence_thresholds: ConfidenceThresholds::default(),
            max_response_time_ms: 100,
            cache_capacity: 256,
        }
    }
}

/// Primary/secondary score ratios at which each reliability tier starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    pub very_high: f64,
    pub high: f64,
    pub medium: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            very_high: 1.5,
            high: 1.3,
            medium: 1.15,
        }
    }
}
