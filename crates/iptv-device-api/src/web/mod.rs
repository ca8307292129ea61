//! Web layer module
//!
//! The HTTP interface of the device API. Handlers are thin and delegate to the
//! service layer; every response uses the [`ApiResponse`] envelope.
//!
//! - **Handlers**: request handlers organized by domain
//! - **Responses**: the response envelope and error mapping
//! - **Extractors**: request context and JSON body extraction
//! - **Middleware**: request logging, security headers, request deadline

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::info;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::Config, services::PlaylistValidator};

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod utils;

pub use extractors::{ApiJson, RequestContext};
pub use responses::{ApiResponse, handle_error};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub playlist_validator: Arc<PlaylistValidator>,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: Config, playlist_validator: PlaylistValidator) -> Self {
        Self {
            config: Arc::new(config),
            playlist_validator: Arc::new(playlist_validator),
            start_time: chrono::Utc::now(),
        }
    }
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(state: AppState) -> Result<Self> {
        let addr: SocketAddr =
            format!("{}:{}", state.config.web.host, state.config.web.port).parse()?;
        let app = create_router(state);
        Ok(Self { app, addr })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve with a notification when the server is actually listening or fails to bind
    ///
    /// Shuts down gracefully on SIGTERM or SIGINT.
    pub async fn serve_with_signal(self, ready_signal: oneshot::Sender<Result<()>>) -> Result<()> {
        self.serve_with_cancellation(ready_signal, None).await
    }

    /// Serve until `cancellation_token` fires, or a shutdown signal when none is given
    pub async fn serve_with_cancellation(
        self,
        ready_signal: oneshot::Sender<Result<()>>,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()> {
        let listener = match tokio::net::TcpListener::bind(&self.addr).await {
            Ok(listener) => listener,
            Err(bind_error) => {
                let message = format!("Failed to bind to {}: {}", self.addr, bind_error);
                let _ = ready_signal.send(Err(anyhow::anyhow!("{}", message)));
                return Err(anyhow::anyhow!("{}", message));
            }
        };

        let _ = ready_signal.send(Ok(()));

        let shutdown = async move {
            match cancellation_token {
                Some(token) => {
                    token.cancelled().await;
                    info!("Web server received cancellation signal, shutting down gracefully");
                }
                None => shutdown_signal().await,
            }
        };

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

/// Build the application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let web = &state.config.web;

    let mut router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/live", get(handlers::health::liveness_check))
        .merge(SwaggerUi::new("/docs").url("/api/openapi.json", openapi::openapi_spec()))
        .nest("/api/v1", api_v1_routes())
        // applied in reverse order
        .layer(DefaultBodyLimit::max(web.max_request_size))
        .layer(axum::middleware::from_fn_with_state(
            web.request_timeout,
            middleware::timeout_middleware,
        ))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ));

    if web.cors_permissive {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .with_state(state)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/playlists/validate",
            post(handlers::playlists::validate_playlist),
        )
        .route("/devices/validate", post(handlers::devices::validate_device))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
                    _ = sigint.recv() => info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
                }
            }
            _ => {
                tracing::warn!("Failed to install signal handlers, falling back to Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl+C, shutting down gracefully");
    }
}
