use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use taiheki::config::DiagnosisConfig;
use taiheki::diagnosis::{
    Answer, DiagnosisService, DiagnosisServiceError, JsonCatalogue, StandardCatalogue,
};
use taiheki::error::AppError;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builds the service from the configured catalogue file, or the built-in questions.
pub(crate) fn build_service(
    config: &DiagnosisConfig,
    catalogue_override: Option<&Path>,
) -> Result<DiagnosisService, DiagnosisServiceError> {
    let path = catalogue_override
        .map(Path::to_path_buf)
        .or_else(|| config.catalogue_path.clone());

    match path {
        Some(path) => {
            info!(path = %path.display(), "loading question catalogue from file");
            DiagnosisService::from_catalogue(&JsonCatalogue::new(path), config.engine.clone())
        }
        None => DiagnosisService::from_catalogue(&StandardCatalogue, config.engine.clone()),
    }
}

/// Reads a JSON array of answers from disk.
pub(crate) fn read_answers(path: &Path) -> Result<Vec<Answer>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let answers = serde_json::from_str(&raw).map_err(std::io::Error::from)?;
    Ok(answers)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}
