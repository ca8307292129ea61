//! Request extractors
//!
//! Custom extractors that pull request metadata and JSON bodies into the
//! shapes handlers work with, rejecting with the standard envelope.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::Response,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::responses::handle_error;
use crate::errors::WebError;

/// Request context for logging and tracing
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_agent: Option<String>,
    pub real_ip: Option<String>,
    pub request_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let real_ip = parts
            .headers
            .get("x-real-ip")
            .or_else(|| parts.headers.get("x-forwarded-for"))
            .and_then(|h| h.to_str().ok())
            .map(|s| s.split(',').next().unwrap_or(s).trim().to_string());

        let request_id = parts
            .headers
            .get("x-request-id")
            .and_then(|h| h.to_str().ok())
            .filter(|id| !id.is_empty())
            .map(|id| id.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Self {
            user_agent,
            real_ip,
            request_id,
            timestamp: chrono::Utc::now(),
        })
    }
}

/// JSON body extractor that rejects with the `ApiResponse` envelope
///
/// Bodies without a JSON content type are 415, bodies over the router's body
/// limit 413, anything that fails to parse 400.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Err(handle_error(WebError::UnsupportedMediaType.into()));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            let error = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                WebError::PayloadTooLarge
            } else {
                WebError::invalid_body(rejection.body_text())
            };
            handle_error(error.into())
        })?;

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| handle_error(WebError::from(e).into()))
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .is_some_and(|mime| {
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
}
