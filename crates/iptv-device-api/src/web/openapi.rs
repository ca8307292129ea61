//! OpenAPI documentation generation using utoipa
//!
//! Handlers carry `#[utoipa::path]` annotations; this module collects them
//! into one document served at `/api/openapi.json` with Swagger UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "IPTV Device API",
        description = "Device backend for an IPTV client: playlist URL validation and device payload checks.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    tags(
        (name = "playlists", description = "Remote M3U playlist validation"),
        (name = "devices", description = "Device payload validation and normalisation"),
        (name = "health", description = "Service health monitoring"),
    ),
    components(
        schemas(
            crate::models::ValidatePlaylistRequest,
            crate::models::ValidationVerdict,
            crate::models::ValidationMode,
            crate::models::DeviceRegistrationRequest,
            crate::models::ValidatedDevice,
            crate::models::DeviceType,
            crate::web::responses::HealthResponse,
        )
    ),
    paths(
        crate::web::handlers::playlists::validate_playlist,
        crate::web::handlers::devices::validate_device,
        crate::web::handlers::health::health_check,
        crate::web::handlers::health::readiness_check,
        crate::web::handlers::health::liveness_check,
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI document, stamped with the crate version
pub fn openapi_spec() -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi
}
