//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, optional timeout, request ID)
//! - Bind server to listener and drain on shutdown

use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, routing::get, BoxError, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{ConfigError, ProxyConfig};
use crate::error::ApiError;
use crate::http::handlers::{describe, list_issues, list_labels};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::translator::UpstreamClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub preserve_error_status: bool,
}

/// HTTP server for the issues proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        let state = AppState {
            upstream: UpstreamClient::new(&config.upstream)?,
            preserve_error_status: config.upstream.preserve_error_status,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/api", get(describe))
            .route("/api/", get(describe))
            .route("/api/{name}/{repo}", get(list_issues))
            .route("/api/{name}/{repo}/", get(list_issues))
            .route("/api/{name}/{repo}/labels", get(list_labels))
            .route("/api/{name}/{repo}/labels/", get(list_labels))
            .with_state(state);

        if let Some(secs) = config.timeouts.request_secs {
            router = router.layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_middleware_error))
                    .timeout(Duration::from_secs(secs)),
            );
        }

        router
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuid))
    }

    /// The router, for in-process use (tests, embedding).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Render middleware failures (the request timeout) as JSON errors.
async fn handle_middleware_error(err: BoxError) -> ApiError {
    ApiError::from(err)
}
