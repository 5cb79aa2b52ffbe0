//! Configuration management for the gateway
//!
//! This module handles loading, validation, and management of all gateway configuration.

pub mod models;

pub use models::*;

use crate::utils::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Backing subsystem configuration
    #[serde(default)]
    pub subsystems: SubsystemsConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Config::default();

        if let Ok(host) = std::env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid PORT value: {}", port)))?;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.subsystems.database.url = url;
        }
        if let Ok(url) = std::env::var("REDIS_URL") {
            config.subsystems.cache.url = url;
        }
        if let Ok(region) = std::env::var("AWS_REGION") {
            config.subsystems.messaging.region = region.clone();
            config.subsystems.object_storage.region = region;
        }
        if let Ok(bucket) = std::env::var("S3_BUCKET") {
            config.subsystems.object_storage.bucket = bucket;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }
        if let Ok(username) = std::env::var("ADMIN_USERNAME") {
            config.auth.admin_username = username;
        }
        if let Ok(password) = std::env::var("ADMIN_PASSWORD") {
            config.auth.admin_password = password;
        }

        config.validate()?;
        Ok(config)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    /// Get subsystem configuration
    pub fn subsystems(&self) -> &SubsystemsConfig {
        &self.subsystems
    }

    /// Get auth configuration
    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| AppError::Config(format!("Server config error: {}", e)))?;

        self.server
            .cors
            .validate()
            .map_err(|e| AppError::Config(format!("CORS config error: {}", e)))?;

        self.subsystems
            .validate()
            .map_err(|e| AppError::Config(format!("Subsystem config error: {}", e)))?;

        self.auth
            .validate()
            .map_err(|e| AppError::Config(format!("Auth config error: {}", e)))?;

        models::auth::warn_insecure_config(&self.auth);

        debug!("Configuration validation completed");
        Ok(())
    }
}
