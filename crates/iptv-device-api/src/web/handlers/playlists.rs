//! Playlist validation HTTP handlers

use axum::{
    extract::State,
    http::{Method, Uri},
    response::Response,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::models::{ValidatePlaylistRequest, ValidationMode, ValidationVerdict};
use crate::utils::url::UrlUtils;
use crate::web::{
    AppState,
    extractors::{ApiJson, RequestContext},
    responses::{ApiResponse, handle_error, internal_error, ok},
    utils::log_request,
};

/// Validate that a URL serves a usable M3U playlist
///
/// Every verdict, valid or not, is a 200. Only a URL that is not an absolute
/// http(s) URL is rejected up front.
#[utoipa::path(
    post,
    path = "/api/v1/playlists/validate",
    tag = "playlists",
    request_body = ValidatePlaylistRequest,
    responses(
        (status = 200, description = "Validation verdict", body = ApiResponse<ValidationVerdict>),
        (status = 400, description = "URL is missing, malformed or not http(s)"),
        (status = 500, description = "Validation failed unexpectedly"),
    )
)]
pub async fn validate_playlist(
    State(state): State<AppState>,
    context: RequestContext,
    ApiJson(request): ApiJson<ValidatePlaylistRequest>,
) -> Response {
    log_request(
        &Method::POST,
        &Uri::from_static("/api/v1/playlists/validate"),
        &context,
    );

    let url = match UrlUtils::parse_playlist_url(&request.url) {
        Ok(url) => url,
        Err(e) => return handle_error(e),
    };

    let validator = state.playlist_validator.clone();
    let mode = request
        .detailed
        .map(ValidationMode::from_detailed)
        .unwrap_or(validator.settings().mode);

    // abort outstanding probes if this request is dropped (client gone or
    // request deadline hit)
    let cancel = CancellationToken::new();
    let _abort_on_drop = cancel.clone().drop_guard();

    let display_url = UrlUtils::obfuscate_credentials(url.as_str());
    let task = tokio::spawn(async move {
        validator
            .validate_with_cancellation(&url, mode, &cancel)
            .await
    });

    match task.await {
        Ok(verdict) => {
            info!(
                request_id = %context.request_id,
                url = %display_url,
                valid = verdict.is_valid(),
                "Playlist validated"
            );
            ok(verdict)
        }
        Err(e) => {
            error!(
                request_id = %context.request_id,
                url = %display_url,
                "Playlist validation task failed: {}", e
            );
            internal_error("Validation failed", &e.to_string())
        }
    }
}
