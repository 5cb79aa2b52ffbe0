//! Cache subsystem
//!
//! Redis connectivity over a multiplexed async connection, probed with PING.

use crate::bootstrap::subsystem::{Criticality, Subsystem};
use crate::config::CacheConfig;
use crate::utils::error::{AppError, Result};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tracing::{debug, info};

/// Redis cache handle
pub struct Cache {
    config: CacheConfig,
    conn: ArcSwapOption<MultiplexedConnection>,
}

impl Cache {
    /// Create an unconnected handle; no I/O happens until `connect`
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            config: config.clone(),
            conn: ArcSwapOption::empty(),
        }
    }
}

#[async_trait]
impl Subsystem for Cache {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Optional
    }

    async fn connect(&self) -> Result<()> {
        if self.conn.load().is_some() {
            debug!("Cache already connected");
            return Ok(());
        }

        let client = redis::Client::open(self.config.url.as_str()).map_err(AppError::Cache)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(AppError::Cache)?;

        info!("Redis connection established");
        self.conn.store(Some(std::sync::Arc::new(conn)));
        Ok(())
    }

    async fn probe(&self) -> Result<()> {
        let conn = self
            .conn
            .load_full()
            .ok_or_else(|| AppError::probe("cache", "not connected"))?;

        let mut conn = (*conn).clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(AppError::Cache)?;

        Ok(())
    }
}
