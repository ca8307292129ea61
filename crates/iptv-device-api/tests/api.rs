//! Router-level tests for the device API
//!
//! The playlist validator is backed by a scripted HTTP client so every probe
//! outcome can be staged without network access.

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use bytes::Bytes;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

use iptv_device_api::{
    config::Config,
    errors::{ProbeError, ProbeResult},
    services::{PlaylistValidator, PlaylistValidatorSettings},
    utils::http_client::{PlaylistHttpClient, ProbeResponse},
    web::{AppState, create_router},
};

const TWO_CHANNELS: &str =
    "#EXTM3U\n#EXTINF:-1,Channel1\nhttp://x/1\n#EXTINF:-1,Channel2\nhttp://x/2\n";

/// Answers every probe with the same staged response
struct ScriptedClient {
    head: ProbeResult<ProbeResponse>,
    body: &'static str,
    panic_on_head: bool,
    get_calls: AtomicUsize,
}

impl ScriptedClient {
    fn serving(content_type: Option<&str>, body: &'static str) -> Self {
        Self {
            head: Ok(ProbeResponse::new(200, content_type, Bytes::new())),
            body,
            panic_on_head: false,
            get_calls: AtomicUsize::new(0),
        }
    }

    fn status(status: u16) -> Self {
        Self {
            head: Ok(ProbeResponse::new(status, Some("text/html"), Bytes::new())),
            ..Self::serving(None, "")
        }
    }

    fn panicking() -> Self {
        Self {
            panic_on_head: true,
            ..Self::serving(None, "")
        }
    }
}

#[async_trait]
impl PlaylistHttpClient for ScriptedClient {
    async fn head(&self, _url: &str, _cancel: CancellationToken) -> ProbeResult<ProbeResponse> {
        if self.panic_on_head {
            panic!("scripted client failure");
        }
        self.head.clone()
    }

    async fn get_prefix(
        &self,
        _url: &str,
        _max_bytes: usize,
        _cancel: CancellationToken,
    ) -> ProbeResult<ProbeResponse> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProbeResponse::new(206, Some("audio/x-mpegurl"), self.body))
    }
}

fn server_with_config(client: Arc<ScriptedClient>, config: Config) -> TestServer {
    let validator =
        PlaylistValidator::new(client, PlaylistValidatorSettings::from(&config.validation));
    TestServer::new(create_router(AppState::new(config, validator))).unwrap()
}

fn server(client: Arc<ScriptedClient>) -> TestServer {
    server_with_config(client, Config::default())
}

#[tokio::test]
async fn test_valid_playlist_is_wrapped_in_envelope() {
    let client = Arc::new(ScriptedClient::serving(
        Some("application/x-mpegurl"),
        TWO_CHANNELS,
    ));
    let server = server(client.clone());

    let response = server
        .post("/api/v1/playlists/validate")
        .json(&json!({"url": "http://example.com/list.m3u"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"],
        json!({"isValid": true, "channelCount": 2, "format": "M3U"})
    );
    assert_eq!(client.get_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_verdict_is_still_a_success_response() {
    let client = Arc::new(ScriptedClient::status(404));
    let server = server(client.clone());

    let response = server
        .post("/api/v1/playlists/validate")
        .json(&json!({"url": "http://example.com/list.m3u"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["isValid"], false);
    assert_eq!(body["data"]["error"], "HTTP 404: Not Found");
    assert_eq!(client.get_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_urls_are_rejected_before_probing() {
    let client = Arc::new(ScriptedClient::panicking());
    let server = server(client);

    for url in ["", "not a url", "ftp://example.com/list.m3u", "file:///etc/passwd"] {
        let response = server
            .post("/api/v1/playlists/validate")
            .json(&json!({ "url": url }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false, "{url:?}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_missing_url_field_is_bad_request() {
    let server = server(Arc::new(ScriptedClient::panicking()));

    let response = server
        .post("/api/v1/playlists/validate")
        .json(&json!({"link": "http://example.com/list.m3u"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn test_validator_panic_becomes_internal_error() {
    let server = server(Arc::new(ScriptedClient::panicking()));

    let response = server
        .post("/api/v1/playlists/validate")
        .json(&json!({"url": "http://example.com/list.m3u"}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Validation failed");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_detailed_flag_overrides_configured_mode() {
    let client = Arc::new(ScriptedClient::serving(Some("text/plain"), TWO_CHANNELS));
    let server = server(client.clone());

    let response = server
        .post("/api/v1/playlists/validate")
        .json(&json!({"url": "http://example.com/get.php?type=m3u", "detailed": false}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"], json!({"isValid": true, "format": "text/plain"}));
    assert_eq!(client.get_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_basic_mode_from_config() {
    let client = Arc::new(ScriptedClient::serving(None, TWO_CHANNELS));
    let mut config = Config::default();
    config.validation.detailed = false;
    let server = server_with_config(client.clone(), config);

    let response = server
        .post("/api/v1/playlists/validate")
        .json(&json!({"url": "http://example.com/live.m3u8"}))
        .await;

    let body: Value = response.json();
    assert_eq!(body["data"], json!({"isValid": true, "format": "unknown"}));
    assert_eq!(client.get_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = Config::default();
    config.web.max_request_size = 64;
    let server = server_with_config(Arc::new(ScriptedClient::panicking()), config);

    let long_url = format!("http://example.com/{}.m3u", "a".repeat(256));
    let response = server
        .post("/api/v1/playlists/validate")
        .json(&json!({ "url": long_url }))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_device_payload_is_normalised() {
    let server = server(Arc::new(ScriptedClient::panicking()));

    let response = server
        .post("/api/v1/devices/validate")
        .json(&json!({
            "mac_address": "00-1a-2b-3c-4d-5e",
            "m3u_url": "https://example.com/tv.m3u",
            "device_type": "MAG",
            "name": " Bedroom box "
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["data"],
        json!({
            "mac_address": "00:1A:2B:3C:4D:5E",
            "m3u_url": "https://example.com/tv.m3u",
            "device_type": "mag",
            "name": "Bedroom box"
        })
    );
}

#[tokio::test]
async fn test_device_payload_reports_each_bad_field() {
    let server = server(Arc::new(ScriptedClient::panicking()));

    let response = server
        .post("/api/v1/devices/validate")
        .json(&json!({
            "mac_address": "zz:zz:zz:zz:zz:zz",
            "m3u_url": "ftp://example.com/tv.m3u",
            "device_type": "toaster"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Validation failed");

    let details = body["details"].as_object().unwrap();
    for field in ["mac_address", "m3u_url", "device_type"] {
        assert!(details.contains_key(field), "missing detail for {field}");
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let server = server(Arc::new(ScriptedClient::panicking()));

    for (path, status) in [("/health", "healthy"), ("/ready", "ready"), ("/live", "alive")] {
        let response = server.get(path).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], status);
        assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    }
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let server = server(Arc::new(ScriptedClient::panicking()));

    let response = server.get("/api/openapi.json").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/api/v1/playlists/validate"].is_object());
}

#[tokio::test]
async fn test_probe_errors_surface_as_invalid_verdicts() {
    let client = Arc::new(ScriptedClient {
        head: Err(ProbeError::Network {
            message: "connection refused".to_string(),
        }),
        ..ScriptedClient::serving(None, "")
    });
    let server = server(client);

    let response = server
        .post("/api/v1/playlists/validate")
        .json(&json!({"url": "http://example.com/list.m3u"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["data"],
        json!({"isValid": false, "error": "network error / timeout"})
    );
}
