//! Device payload HTTP handlers

use axum::{
    http::{Method, Uri},
    response::Response,
};
use tracing::debug;

use crate::models::{DeviceRegistrationRequest, ValidatedDevice};
use crate::web::{
    extractors::{ApiJson, RequestContext},
    responses::{ApiResponse, ok, validation_error},
    utils::log_request,
};

/// Validate and normalise a device payload
#[utoipa::path(
    post,
    path = "/api/v1/devices/validate",
    tag = "devices",
    request_body = DeviceRegistrationRequest,
    responses(
        (status = 200, description = "Normalised device", body = ApiResponse<ValidatedDevice>),
        (status = 400, description = "One or more fields are invalid; see `details`"),
    )
)]
pub async fn validate_device(
    context: RequestContext,
    ApiJson(request): ApiJson<DeviceRegistrationRequest>,
) -> Response {
    log_request(
        &Method::POST,
        &Uri::from_static("/api/v1/devices/validate"),
        &context,
    );

    match request.validate() {
        Ok(device) => ok(device),
        Err(errors) => {
            debug!(
                request_id = %context.request_id,
                "Device payload rejected with {} error(s)",
                errors.len()
            );
            validation_error(&errors)
        }
    }
}
