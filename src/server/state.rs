//! Application state shared across HTTP handlers
//!
//! This module provides the AppState struct and its implementations.

use crate::config::Config;
use crate::health::HealthAggregator;
use crate::subsystems::{RealtimeHub, SubsystemSet};
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Holds the one set of subsystem handles constructed at process entry.
/// All fields are wrapped in Arc for efficient sharing across workers.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// The process-wide subsystem handles
    pub subsystems: Arc<SubsystemSet>,
    /// Composite health checker over the subsystem handles
    pub health: Arc<HealthAggregator>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config, subsystems: Arc<SubsystemSet>, health: HealthAggregator) -> Self {
        Self {
            config: Arc::new(config),
            subsystems,
            health: Arc::new(health),
        }
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the realtime hub
    pub fn realtime(&self) -> &Arc<RealtimeHub> {
        self.subsystems.realtime()
    }
}
