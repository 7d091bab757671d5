use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::service::{
    BulkDiagnosisRequest, DiagnosisService, DiagnosisServiceError, ProgressRequest,
};

/// Router builder exposing the diagnosis endpoints.
pub fn diagnosis_router(service: Arc<DiagnosisService>) -> Router {
    Router::new()
        .route("/api/v1/taiheki/bulk", post(bulk_handler))
        .route("/api/v1/taiheki/progress", post(progress_handler))
        .route("/api/v1/taiheki/questions", get(questions_handler))
        .route(
            "/api/v1/taiheki/questions/:question_id",
            get(question_handler),
        )
        .route("/api/v1/taiheki/cache", get(cache_handler))
        .with_state(service)
}

pub(crate) async fn bulk_handler(
    State(service): State<Arc<DiagnosisService>>,
    axum::Json(request): axum::Json<BulkDiagnosisRequest>,
) -> Response {
    match service.diagnose(request) {
        Ok(response) => {
            let processing_time = HeaderValue::from(response.processing_time_ms);
            let mut http = (StatusCode::OK, axum::Json(response)).into_response();
            let headers = http.headers_mut();
            headers.insert("x-processing-time", processing_time);
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache, must-revalidate, private"),
            );
            http
        }
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn progress_handler(
    State(service): State<Arc<DiagnosisService>>,
    axum::Json(request): axum::Json<ProgressRequest>,
) -> Response {
    match service.progress(request) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn questions_handler(State(service): State<Arc<DiagnosisService>>) -> Response {
    let payload = json!({
        "questions": service.questions(),
        "summary": service.summary(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn question_handler(
    State(service): State<Arc<DiagnosisService>>,
    Path(question_id): Path<u32>,
) -> Response {
    match service.question(question_id) {
        Some(question) => (StatusCode::OK, axum::Json(question)).into_response(),
        None => {
            let payload = json!({
                "error": format!("question not found: {question_id}"),
                "code": "QUESTION_NOT_FOUND",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn cache_handler(State(service): State<Arc<DiagnosisService>>) -> Response {
    (StatusCode::OK, axum::Json(service.cache_stats())).into_response()
}

fn error_response(error: &DiagnosisServiceError) -> Response {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        error!(error = %error, code = error.code(), "diagnosis request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let payload = json!({
        "error": error.to_string(),
        "code": error.code(),
    });
    (status, axum::Json(payload)).into_response()
}
