//! Server builder and run_server function
//!
//! This module provides the ServerBuilder for easier server configuration
//! and the run_server function for automatic configuration loading.

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{AppError, Result};
use tracing::info;

/// Server builder for easier configuration
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| AppError::Config("Configuration is required".to_string()))?;

        HttpServer::new(&config).await
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the server with automatic configuration loading
pub async fn run_server() -> Result<()> {
    info!("Starting gatherd gateway");

    let config_path = "config/gatherd.yaml";

    let config = match Config::from_file(config_path).await {
        Ok(config) => {
            info!("Configuration file loaded: {}", config_path);
            config
        }
        Err(e) => {
            info!(
                "Configuration file unavailable ({}), falling back to environment: {}",
                config_path, e
            );
            Config::from_env()?
        }
    };

    // Bootstrap runs inside HttpServer::new; a mandatory subsystem failure
    // surfaces here and the process exits non-zero without listening.
    let server = HttpServer::new(&config).await?;

    info!("Server starting at: http://{}", config.server().address());
    info!("API Endpoints:");
    info!("   GET  /health - Composite health check");
    info!("   POST /auth/login - Session token issuance");
    info!("   GET  /ws - Realtime channel attachment");
    info!("   POST /api/events/broadcast - Realtime broadcast (authenticated)");

    server.start().await
}
