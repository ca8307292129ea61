//! Health check HTTP handlers
//!
//! The service has no backing store, so being able to answer is the whole
//! health signal.

use axum::{
    extract::State,
    http::{Method, Uri},
    response::IntoResponse,
};

use crate::web::{
    AppState,
    extractors::RequestContext,
    responses::{ApiResponse, HealthResponse, ok},
    utils::log_request,
};

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = ApiResponse<HealthResponse>),
    )
)]
pub async fn health_check(
    State(state): State<AppState>,
    context: RequestContext,
) -> impl IntoResponse {
    log_request(&Method::GET, &Uri::from_static("/health"), &context);
    ok(HealthResponse::new("healthy", state.start_time))
}

/// Readiness check (for Kubernetes probes)
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service accepts requests", body = ApiResponse<HealthResponse>),
    )
)]
pub async fn readiness_check(
    State(state): State<AppState>,
    context: RequestContext,
) -> impl IntoResponse {
    log_request(&Method::GET, &Uri::from_static("/ready"), &context);
    ok(HealthResponse::new("ready", state.start_time))
}

/// Liveness check (for Kubernetes probes)
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Process is alive", body = ApiResponse<HealthResponse>),
    )
)]
pub async fn liveness_check(
    State(state): State<AppState>,
    context: RequestContext,
) -> impl IntoResponse {
    log_request(&Method::GET, &Uri::from_static("/live"), &context);
    ok(HealthResponse::new("alive", state.start_time))
}
