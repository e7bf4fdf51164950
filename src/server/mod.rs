// SoulCare - HTTP Server Module
// Chat, history and resource endpoints over the analysis pipeline

mod handlers;

pub use handlers::{create_router, health_check, metrics_endpoint, AppError};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, ServerConfig};
use crate::errors::bind_failed_error;
use crate::pipeline::WellnessPipeline;

/// Main wellness server structure
pub struct WellnessServer {
    /// Analysis pipeline (shared across requests)
    pipeline: Arc<WellnessPipeline>,
    /// Server configuration
    config: ServerConfig,
    /// Period of the idle-session sweep
    cleanup_interval: Duration,
}

impl WellnessServer {
    pub fn new(config: &Config, pipeline: Arc<WellnessPipeline>) -> Self {
        Self {
            pipeline,
            config: config.server.clone(),
            cleanup_interval: Duration::from_secs(config.memory.cleanup_interval_secs.max(1)),
        }
    }

    /// Start the HTTP server and the session sweep; runs until Ctrl-C
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.config.bind_address))?;

        let cleanup = self
            .pipeline
            .memory()
            .spawn_cleanup_task(self.cleanup_interval);

        let app_state = Arc::new(self);
        let app = create_router(app_state);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!(bind_failed_error(&addr.to_string(), &e.to_string())))?;

        tracing::info!("Starting SoulCare server on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        cleanup.abort();
        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get reference to the pipeline
    pub fn pipeline(&self) -> &Arc<WellnessPipeline> {
        &self.pipeline
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
