//! HTTP server bootstrap.
//!
//! Binds a listener, serves the router, and shuts down gracefully on
//! SIGINT/SIGTERM.

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;

use crate::infrastructure::AppConfig;

// =============================================================================
// Server
// =============================================================================

/// Serves a router on one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    /// `host:port` to bind. Port `0` picks an ephemeral port.
    address: String,
}

impl Server {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    /// Creates a server bound to the configured host and port.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.socket_addr())
    }

    /// Serves `router` until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server fails.
    pub async fn run(self, router: Router) -> anyhow::Result<()> {
        self.run_until(router, shutdown_signal()).await
    }

    /// Serves `router` until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server fails.
    pub async fn run_until(
        self,
        router: Router,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.address.as_str()).await?;

        match listener.local_addr() {
            Ok(address) => tracing::info!("Listening on {}", address),
            Err(error) => tracing::warn!(%error, "Could not determine local address"),
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

// =============================================================================
// Shutdown Signal
// =============================================================================

/// Completes when a shutdown signal (SIGINT, SIGTERM) is received.
///
/// On non-Unix systems only Ctrl+C is observed.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
