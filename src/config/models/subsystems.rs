//! Backing subsystem configuration
//!
//! One section per backing dependency, plus the explicit connect/probe
//! bounds applied by the bootstrap sequencer and the health aggregator.

use super::{default_connect_timeout, default_max_connections, default_probe_timeout};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for all backing subsystems
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SubsystemsConfig {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Redis cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// SNS messaging configuration
    #[serde(default)]
    pub messaging: MessagingConfig,
    /// S3 object storage configuration
    #[serde(default)]
    pub object_storage: ObjectStorageConfig,
    /// Bound on every subsystem connect attempt, in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Bound on every subsystem probe, in seconds
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout: u64,
}

impl SubsystemsConfig {
    /// Connect bound as a Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Probe bound as a Duration
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout)
    }

    /// Validate subsystem configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.connect_timeout == 0 {
            return Err("Subsystem connect timeout cannot be 0".to_string());
        }
        if self.probe_timeout == 0 {
            return Err("Subsystem probe timeout cannot be 0".to_string());
        }
        if self.database.url.is_empty() {
            return Err("Database URL is required".to_string());
        }
        Ok(())
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Maximum connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/gatherd".to_string(),
            max_connections: default_max_connections(),
        }
    }
}

/// Redis cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis URL
    pub url: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
        }
    }
}

/// SNS messaging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// AWS region
    pub region: String,
    /// Custom endpoint (for local stacks)
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
        }
    }
}

/// S3 object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    /// Bucket name
    pub bucket: String,
    /// AWS region
    pub region: String,
    /// Custom endpoint (for local stacks)
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        Self {
            bucket: "gatherd-media".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
        }
    }
}
