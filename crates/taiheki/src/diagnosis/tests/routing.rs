use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::diagnosis::{Answer, BulkDiagnosisRequest};

fn json_request(uri: &str, payload: serde_json::Value) -> Request<axum::body::Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&payload).expect("payload serializes"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn bulk_route_returns_diagnosis() {
    let router = diagnosis_router_with_service(build_service());
    let payload = json!({
        "answers": first_option_answers(20),
        "start_time": "2025-01-01T09:00:00Z",
    });

    let response = router
        .oneshot(json_request("/api/v1/taiheki/bulk", payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-processing-time"));
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "no-store, no-cache, must-revalidate, private"
    );
    let body = read_json_body(response).await;
    assert_eq!(body["result"]["total_questions"], 20);
    assert!(body["result"]["completion_time"].as_u64().is_some());
    assert_eq!(body["answer_pattern_hash"].as_str().map(str::len), Some(64));
}

#[tokio::test]
async fn bulk_handler_rejects_too_many_selections() {
    let service = Arc::new(build_service());
    let mut answers = first_option_answers(20);
    answers[0] = Answer::new(1, [0, 1, 2]);

    let response = crate::diagnosis::router::bulk_handler(
        State(service),
        axum::Json(BulkDiagnosisRequest {
            answers,
            start_time: None,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "TOO_MANY_SELECTIONS");
}

#[tokio::test]
async fn bulk_route_rejects_partial_quiz() {
    let router = diagnosis_router_with_service(build_service());

    let response = router
        .oneshot(json_request(
            "/api/v1/taiheki/bulk",
            json!({ "answers": first_option_answers(3) }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "INCOMPLETE_ANSWERS");
}

#[tokio::test]
async fn progress_route_reports_completion() {
    let router = diagnosis_router_with_service(build_service());

    let response = router
        .oneshot(json_request(
            "/api/v1/taiheki/progress",
            json!({ "answers": first_option_answers(5) }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["completion_rate"], 0.25);
    assert_eq!(body["top_candidates"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn progress_route_rejects_unknown_question() {
    let router = diagnosis_router_with_service(build_service());

    let response = router
        .oneshot(json_request(
            "/api/v1/taiheki/progress",
            json!({ "answers": [{ "question_id": 77, "selected_options": [0] }] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "QUESTION_NOT_FOUND");
}

#[tokio::test]
async fn questions_route_lists_catalogue() {
    let router = diagnosis_router_with_service(build_service());

    let response = router
        .oneshot(
            Request::get("/api/v1/taiheki/questions")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["questions"].as_array().map(Vec::len), Some(20));
    assert_eq!(body["summary"]["total_questions"], 20);
    assert_eq!(body["summary"]["category_counts"]["physical"], 4);
}

#[tokio::test]
async fn unknown_question_route_is_not_found() {
    let router = diagnosis_router_with_service(build_service());

    let response = router
        .oneshot(
            Request::get("/api/v1/taiheki/questions/99")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cache_route_reports_stats() {
    let service = build_service();
    service
        .progress(crate::diagnosis::ProgressRequest {
            answers: first_option_answers(2),
        })
        .expect("progress succeeds");
    let router = diagnosis_router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/taiheki/cache")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["size"], 1);
    assert_eq!(body["misses"], 1);
    assert_eq!(body["hit_rate"], 0.0);
}
