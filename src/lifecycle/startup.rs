//! Startup orchestration.
//!
//! Order: observability, then the HTTP server (which builds the upstream
//! client), then the listener. Any failure before serving is fatal.

use tokio::net::TcpListener;

use crate::config::{ConfigError, ProxyConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bring the proxy up and serve until a termination signal arrives.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    if !logging::init_logging(&config.observability) {
        tracing::warn!("A tracing subscriber was already installed; keeping it");
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_secs = ?config.timeouts.request_secs,
        "issues-proxy starting"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address);
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: bind_address,
            source,
        })?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
