//! HTTP gateway (Axum) for signature verification.
//!
//! This module is primarily used by the `sigcheck` server binary.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod state;
pub mod upload;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use handler::{VerifyResponse, verify_signature_handler};
pub use state::HandlerState;

use sigcheck::{
    SIGCHECK_STATUS_ERROR, SIGCHECK_STATUS_HEADER, SIGCHECK_STATUS_HEALTHY,
    SIGCHECK_STATUS_NOT_READY, SIGCHECK_STATUS_READY, SimilarityModel,
};

pub fn create_router_with_state<M>(state: HandlerState<M>) -> Router
where
    M: SimilarityModel + 'static,
{
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(root_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/verify-signature/", post(verify_signature_handler))
        .route("/verify-signature", post(verify_signature_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub model: &'static str,
    pub upload_dir: &'static str,
    pub model_kind: &'static str,
}

pub async fn root_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SIGCHECK_STATUS_HEADER,
        HeaderValue::from_static(SIGCHECK_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(RootResponse {
            message: "Signature verification service is running".to_string(),
        }),
    )
        .into_response()
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SIGCHECK_STATUS_HEADER,
        HeaderValue::from_static(SIGCHECK_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<M>(State(state): State<HandlerState<M>>) -> Response
where
    M: SimilarityModel + 'static,
{
    let upload_dir_status = if state.upload_dir.is_dir() {
        SIGCHECK_STATUS_READY
    } else {
        SIGCHECK_STATUS_ERROR
    };

    // A HandlerState cannot exist without a loaded model.
    let components = ComponentStatus {
        http: SIGCHECK_STATUS_READY,
        model: SIGCHECK_STATUS_READY,
        upload_dir: upload_dir_status,
        model_kind: state.model_kind(),
    };

    let is_ready = components.upload_dir == SIGCHECK_STATUS_READY;

    let (status_code, status_msg) = if is_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, SIGCHECK_STATUS_NOT_READY)
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        SIGCHECK_STATUS_HEADER,
        HeaderValue::from_static(if is_ready {
            SIGCHECK_STATUS_READY
        } else {
            SIGCHECK_STATUS_NOT_READY
        }),
    );

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
