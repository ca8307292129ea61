//! Web server lifecycle: bind signalling and graceful shutdown

use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use iptv_device_api::{
    config::Config,
    services::PlaylistValidator,
    web::{AppState, WebServer},
};

fn server_on(port: u16) -> WebServer {
    let mut config = Config::default();
    config.web.host = "127.0.0.1".to_string();
    config.web.port = port;
    let validator = PlaylistValidator::from_config(&config.validation).unwrap();
    WebServer::new(AppState::new(config, validator)).unwrap()
}

#[tokio::test]
async fn test_bind_failure_is_signalled() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let (ready_tx, ready_rx) = oneshot::channel();
    let result = server_on(port)
        .serve_with_cancellation(ready_tx, Some(CancellationToken::new()))
        .await;

    assert!(result.is_err());
    let signalled = ready_rx.await.unwrap();
    assert!(signalled.unwrap_err().to_string().contains("Failed to bind"));
}

#[tokio::test]
async fn test_cancellation_shuts_server_down() {
    let server = server_on(0);
    let cancel = CancellationToken::new();
    let (ready_tx, ready_rx) = oneshot::channel();

    let handle = tokio::spawn(server.serve_with_cancellation(ready_tx, Some(cancel.clone())));
    ready_rx.await.unwrap().unwrap();

    cancel.cancel();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after cancellation")
        .unwrap();
    assert!(result.is_ok());
}
