//! Authentication configuration

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl: u64,
    /// Username accepted by the login endpoint
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    /// Password accepted by the login endpoint
    #[serde(default)]
    pub admin_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl: default_token_ttl(),
            admin_username: default_admin_username(),
            admin_password: String::new(),
        }
    }
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long for security".to_string());
        }

        if self.jwt_secret == "your-secret-key" || self.jwt_secret == "change-me" {
            return Err(
                "JWT secret must not use default values. Please generate a secure random secret."
                    .to_string(),
            );
        }

        if self.token_ttl == 0 {
            return Err("Token TTL cannot be 0".to_string());
        }

        Ok(())
    }
}

/// Warn about insecure auth settings that validate but deserve operator attention
pub fn warn_insecure_config(config: &AuthConfig) {
    if config.admin_password.is_empty() {
        warn!("Admin password is empty; the login endpoint will reject all credentials");
    }

    if config.admin_username == default_admin_username() {
        warn!("Admin username is the default; consider changing it for production");
    }
}

fn default_token_ttl() -> u64 {
    3600
}

fn default_admin_username() -> String {
    "admin".to_string()
}
