//! Taiheki body-constitution diagnosis: question catalogue, scoring engine,
//! and the service/router pair that exposes them over HTTP.

pub mod catalogue;
pub mod domain;
pub mod engine;
pub mod error;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalogue::{
    CatalogueError, CatalogueSummary, JsonCatalogue, QuestionCatalogue, StandardCatalogue,
};
pub use domain::{
    Answer, ChoiceOption, Question, QuestionCategory, QuestionKind, ScaleOption, ScoreMap,
    TaihekiType, TypeFamily, TypeScores,
};
pub use engine::{
    answer_pattern_hash, CacheStats, Candidate, ConfidenceThresholds, DiagnosisEngine,
    DiagnosisResult, EngineConfig, ProgressResult, ReferenceReport, ReliabilityTier,
};
pub use error::{DiagnosisError, ScoringFault};
pub use router::diagnosis_router;
pub use service::{
    BulkDiagnosisRequest, BulkDiagnosisResponse, DiagnosisService, DiagnosisServiceError,
    ProgressRequest,
};
