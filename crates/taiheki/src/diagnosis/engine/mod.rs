mod cache;
mod config;
mod policy;
mod rules;
mod validation;

pub use cache::{answer_pattern_hash, CacheStats};
pub use config::{ConfidenceThresholds, EngineConfig};
pub use policy::ReliabilityTier;

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{Answer, Question, TaihekiType, TypeScores};
use super::error::DiagnosisError;
use cache::ScoreCache;
use policy::{confidence_ratio, progressive_confidence, reliability_for};

const TOP_CANDIDATES: usize = 3;
const REFERENCE_ACCURACY_FLOOR: f64 = 0.95;

/// Scores answer batches against a validated, immutable question catalogue.
///
/// Safe to share behind an `Arc`; the only mutable state is the score cache.
pub struct DiagnosisEngine {
    questions: Vec<Question>,
    index: HashMap<u32, usize>,
    config: EngineConfig,
    cache: ScoreCache,
}

impl DiagnosisEngine {
    pub fn new(questions: Vec<Question>, config: EngineConfig) -> Result<Self, DiagnosisError> {
        let index = validation::validate_catalogue(&questions, &config)?;
        let cache = ScoreCache::new(config.cache_capacity);

        debug!(
            questions = questions.len(),
            cache_capacity = config.cache_capacity,
            "diagnosis engine ready"
        );

        Ok(Self {
            questions,
            index,
            config,
            cache,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Final diagnosis for a complete (or deliberately partial) answer batch.
    pub fn calculate_diagnosis(
        &self,
        answers: &[Answer],
        start_time: Option<DateTime<Utc>>,
    ) -> Result<DiagnosisResult, DiagnosisError> {
        let started = Instant::now();

        if answers.is_empty() {
            return Err(DiagnosisError::NoAnswers);
        }
        validation::validate_answers(answers, &self.questions, &self.index)?;

        let all_scores = self.scores_for(answers)?;
        let ranked = all_scores.ranked();
        let (primary_type, primary_score) = ranked[0];
        let (secondary_type, secondary_score) = ranked[1];

        let thresholds = &self.config.confidence_thresholds;
        let confidence = confidence_ratio(primary_score, secondary_score, thresholds);
        let reliability = reliability_for(confidence, thresholds);

        let completion_time = start_time.map(|start| {
            let seconds = (Utc::now() - start).num_seconds().max(0);
            u64::try_from(seconds).unwrap_or_default()
        });

        let elapsed = started.elapsed();
        if elapsed > self.config.max_response_time() {
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = self.config.max_response_time_ms,
                answers = answers.len(),
                "diagnosis calculation exceeded response budget"
            );
        }
        debug!(
            answers = answers.len(),
            primary = ?primary_type,
            confidence,
            "diagnosis calculated"
        );

        Ok(DiagnosisResult {
            primary_type,
            primary_score,
            secondary_type,
            secondary_score,
            all_scores,
            max_score: all_scores.max(),
            confidence,
            reliability,
            reliability_text: reliability.label().to_string(),
            reliability_stars: reliability.star_rating(),
            total_questions: answers.len(),
            completion_time,
        })
    }

    /// Provisional ranking for an in-progress quiz. An empty batch is allowed.
    pub fn calculate_progress(&self, answers: &[Answer]) -> Result<ProgressResult, DiagnosisError> {
        validation::validate_answers(answers, &self.questions, &self.index)?;

        let current_scores = self.scores_for(answers)?;
        let ranked = current_scores.ranked();
        let catalogue_len = self.questions.len();
        // Validated ids are distinct catalogue members, so the rate stays within [0, 1].
        let completion_rate = answers.len() as f64 / catalogue_len as f64;

        let overall_confidence = progressive_confidence(
            ranked[0].1,
            ranked[1].1,
            completion_rate,
            &self.config.confidence_thresholds,
        );

        let max_score = current_scores.max();
        let top_candidates = ranked
            .iter()
            .take(TOP_CANDIDATES)
            .map(|&(ty, score)| Candidate {
                ty,
                score,
                confidence: if max_score == 0 {
                    0.0
                } else {
                    score as f64 / max_score as f64
                },
            })
            .collect();

        Ok(ProgressResult {
            current_scores,
            top_candidates,
            overall_confidence,
            completion_rate,
            questions_remaining: catalogue_len - answers.len(),
        })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Compares a fresh diagnosis with a known-good one.
    pub fn validate_against_reference(
        &self,
        answers: &[Answer],
        expected: &DiagnosisResult,
    ) -> Result<ReferenceReport, DiagnosisError> {
        let actual = self.calculate_diagnosis(answers, None)?;
        let mut differences = Vec::new();

        if actual.primary_type != expected.primary_type {
            differences.push(format!(
                "primary type: expected {}, got {}",
                expected.primary_type.label(),
                actual.primary_type.label()
            ));
        }

        let accuracy = score_accuracy(&actual.all_scores, &expected.all_scores);
        if accuracy < REFERENCE_ACCURACY_FLOOR {
            differences.push(format!("score accuracy: {:.1}%", accuracy * 100.0));
        }

        Ok(ReferenceReport {
            accuracy,
            differences,
        })
    }

    fn scores_for(&self, answers: &[Answer]) -> Result<TypeScores, DiagnosisError> {
        let key = answer_pattern_hash(answers);
        self.cache
            .get_or_compute(&key, || {
                rules::score_answers(answers, &self.questions, &self.index)
            })
            .map_err(|source| DiagnosisError::CalculationFailed {
                source,
                answers: answers.to_vec(),
            })
    }
}

fn score_accuracy(actual: &TypeScores, expected: &TypeScores) -> f64 {
    let expected_total = expected.total();
    if expected_total <= 0 {
        return 1.0;
    }
    let difference: i64 = actual
        .iter()
        .map(|(ty, score)| (score - expected.get(ty)).abs())
        .sum();
    1.0 - difference as f64 / expected_total as f64
}

/// Final ranked diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub primary_type: TaihekiType,
    pub primary_score: i64,
    pub secondary_type: TaihekiType,
    pub secondary_score: i64,
    pub all_scores: TypeScores,
    pub max_score: i64,
    pub confidence: f64,
    pub reliability: ReliabilityTier,
    pub reliability_text: String,
    pub reliability_stars: String,
    pub total_questions: usize,
    /// Whole seconds since the quiz started, when a start time was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "type")]
    pub ty: TaihekiType,
    pub score: i64,
    /// Score relative to the current leader.
    pub confidence: f64,
}

/// Mid-quiz estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressResult {
    pub current_scores: TypeScores,
    pub top_candidates: Vec<Candidate>,
    pub overall_confidence: f64,
    pub completion_rate: f64,
    pub questions_remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceReport {
    pub accuracy: f64,
    pub differences: Vec<String>,
}
