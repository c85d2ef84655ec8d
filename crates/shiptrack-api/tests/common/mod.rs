//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use shiptrack_core::repository::EventRepository;
use shiptrack_test_support::{FixedClock, InMemoryEventRepository, SequenceIdGenerator};
use tower::ServiceExt;

use shiptrack_api::state::AppState;

/// Fixed "now" used across all integration tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Build the full app router over `repo` with a deterministic clock and id
/// sequence. Uses the same route structure as `main.rs`.
pub fn build_test_app(repo: Arc<dyn EventRepository>) -> Router {
    let app_state = AppState::new(
        Arc::new(FixedClock(fixed_now())),
        Arc::new(SequenceIdGenerator::new()),
        repo,
    );
    shiptrack_api::app(app_state)
}

/// Build the full app router over a fresh in-memory store, returning the
/// store so that tests can reuse it across requests.
pub fn build_in_memory_app() -> (Router, Arc<InMemoryEventRepository>) {
    let repo = Arc::new(InMemoryEventRepository::new());
    (build_test_app(repo.clone()), repo)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
