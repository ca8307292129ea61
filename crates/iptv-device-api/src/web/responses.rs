//! HTTP response types and utilities
//!
//! Every endpoint answers with the same [`ApiResponse`] envelope so clients
//! only ever branch on `success`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::errors::{AppError, WebError};
use crate::utils::validation::ValidationError;

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Whether the operation was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Short error category (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human readable explanation of the failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Per-field error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
    /// Response timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response
    pub fn error<S: Into<String>>(error: S) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create an error response carrying an explanatory message
    pub fn error_with_message<E: Into<String>, M: Into<String>>(error: E, message: M) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::error(error)
        }
    }

    /// Create an error response with per-field details
    pub fn error_with_details<S: Into<String>>(error: S, details: HashMap<String, String>) -> Self {
        Self {
            details: Some(details),
            ..Self::error(error)
        }
    }
}

/// Convert AppError to appropriate HTTP response
pub fn handle_error(error: AppError) -> Response {
    let (status, message) = match &error {
        AppError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
        AppError::Web(web_error) => {
            let status = match web_error {
                WebError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                WebError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
                WebError::InvalidBody { .. } | WebError::JsonParse(_) => StatusCode::BAD_REQUEST,
            };
            let body = ApiResponse::error_with_message("Invalid request body", web_error.to_string());
            return (status, Json(body)).into_response();
        }
        AppError::Http(_) => (
            StatusCode::BAD_GATEWAY,
            "External service communication failed".to_string(),
        ),
        AppError::Configuration { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Configuration error: {message}"),
        ),
    };

    (status, Json(ApiResponse::error(message))).into_response()
}

/// Success response helper
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

pub fn internal_error(error: &str, message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error_with_message(error, message)),
    )
        .into_response()
}

/// 400 with one entry per failing field
///
/// When a field fails more than one rule the messages are joined with `; `.
pub fn validation_error(errors: &[ValidationError]) -> Response {
    let mut details: HashMap<String, String> = HashMap::new();
    for error in errors {
        details
            .entry(error.field().to_string())
            .and_modify(|existing| {
                existing.push_str("; ");
                existing.push_str(&error.to_string());
            })
            .or_insert_with(|| error.to_string());
    }

    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error_with_details("Validation failed", details)),
    )
        .into_response()
}

/// Service health payload shared by `/health`, `/live` and `/ready`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: i64,
}

impl HealthResponse {
    pub fn new(status: &str, started_at: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: (chrono::Utc::now() - started_at).num_seconds().max(0),
        }
    }
}
