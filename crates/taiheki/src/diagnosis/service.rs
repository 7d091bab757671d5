use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::catalogue::{CatalogueError, CatalogueSummary, QuestionCatalogue};
use super::domain::{Answer, Question};
use super::engine::{
    answer_pattern_hash, CacheStats, DiagnosisEngine, DiagnosisResult, EngineConfig,
    ProgressResult,
};
use super::error::DiagnosisError;

/// A complete quiz submitted in one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkDiagnosisRequest {
    pub answers: Vec<Answer>,
    /// When the respondent opened the quiz; drives `completion_time`.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkDiagnosisResponse {
    pub result: DiagnosisResult,
    /// Stable fingerprint of the answers, for duplicate detection.
    pub answer_pattern_hash: String,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRequest {
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// Service composing a loaded catalogue with a shared scoring engine.
pub struct DiagnosisService {
    engine: Arc<DiagnosisEngine>,
    summary: CatalogueSummary,
}

impl DiagnosisService {
    pub fn new(engine: Arc<DiagnosisEngine>) -> Self {
        let summary = CatalogueSummary::from_questions(engine.questions());
        Self { engine, summary }
    }

    /// Load questions from `catalogue` and build the engine once.
    pub fn from_catalogue<C>(
        catalogue: &C,
        config: EngineConfig,
    ) -> Result<Self, DiagnosisServiceError>
    where
        C: QuestionCatalogue + ?Sized,
    {
        let questions = catalogue.questions()?;
        let engine = DiagnosisEngine::new(questions, config)?;
        info!(
            questions = engine.questions().len(),
            "diagnosis catalogue loaded"
        );
        Ok(Self::new(Arc::new(engine)))
    }

    pub fn engine(&self) -> &Arc<DiagnosisEngine> {
        &self.engine
    }

    /// Score a full quiz. Every catalogue question must be answered exactly once.
    pub fn diagnose(
        &self,
        request: BulkDiagnosisRequest,
    ) -> Result<BulkDiagnosisResponse, DiagnosisServiceError> {
        let started = Instant::now();
        let expected = self.engine.questions().len();
        if request.answers.len() != expected {
            return Err(DiagnosisServiceError::IncompleteAnswers {
                expected,
                received: request.answers.len(),
            });
        }

        let result = self
            .engine
            .calculate_diagnosis(&request.answers, request.start_time)?;
        let answer_pattern_hash = answer_pattern_hash(&request.answers);
        let processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if processing_time_ms > self.engine.config().max_response_time_ms {
            warn!(
                processing_time_ms,
                target_ms = self.engine.config().max_response_time_ms,
                "bulk diagnosis slower than target"
            );
        }
        info!(
            primary = result.primary_type.label(),
            reliability = result.reliability.label(),
            processing_time_ms,
            "bulk diagnosis completed"
        );

        Ok(BulkDiagnosisResponse {
            result,
            answer_pattern_hash,
            processing_time_ms,
        })
    }

    pub fn progress(
        &self,
        request: ProgressRequest,
    ) -> Result<ProgressResult, DiagnosisServiceError> {
        Ok(self.engine.calculate_progress(&request.answers)?)
    }

    pub fn questions(&self) -> &[Question] {
        self.engine.questions()
    }

    pub fn question(&self, question_id: u32) -> Option<&Question> {
        self.engine
            .questions()
            .iter()
            .find(|question| question.id == question_id)
    }

    pub fn summary(&self) -> &CatalogueSummary {
        &self.summary
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.engine.cache_stats()
    }
}

/// Error raised by the diagnosis service.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosisServiceError {
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
    #[error(transparent)]
    Diagnosis(#[from] DiagnosisError),
    #[error("expected {expected} answers, received {received}")]
    IncompleteAnswers { expected: usize, received: usize },
}

impl DiagnosisServiceError {
    /// True when the caller sent something the service cannot score.
    pub fn is_client_error(&self) -> bool {
        match self {
            DiagnosisServiceError::Catalogue(_) => false,
            DiagnosisServiceError::Diagnosis(error) => error.is_validation(),
            DiagnosisServiceError::IncompleteAnswers { .. } => true,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DiagnosisServiceError::Catalogue(_) => "CATALOGUE_ERROR",
            DiagnosisServiceError::Diagnosis(error) => error.code(),
            DiagnosisServiceError::IncompleteAnswers { .. } => "INCOMPLETE_ANSWERS",
        }
    }
}
