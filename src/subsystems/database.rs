//! Database subsystem
//!
//! PostgreSQL connectivity via SeaORM. The pool is established once at
//! bootstrap and probed with a ping for the process lifetime.

use crate::bootstrap::subsystem::{Criticality, Subsystem};
use crate::config::DatabaseConfig;
use crate::utils::error::{AppError, Result};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection};
use tracing::{debug, info};

/// Database handle backed by a SeaORM connection pool
pub struct Database {
    config: DatabaseConfig,
    conn: ArcSwapOption<DatabaseConnection>,
}

impl Database {
    /// Create an unconnected handle; no I/O happens until `connect`
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            config: config.clone(),
            conn: ArcSwapOption::empty(),
        }
    }

    /// Access the live connection pool, if connected
    pub fn connection(&self) -> Option<std::sync::Arc<DatabaseConnection>> {
        self.conn.load_full()
    }
}

#[async_trait]
impl Subsystem for Database {
    fn name(&self) -> &'static str {
        "database"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Mandatory
    }

    async fn connect(&self) -> Result<()> {
        if self.conn.load().is_some() {
            debug!("Database already connected");
            return Ok(());
        }

        let mut opt = ConnectOptions::new(self.config.url.clone());
        opt.max_connections(self.config.max_connections)
            .min_connections(1)
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let conn = sea_orm::Database::connect(opt)
            .await
            .map_err(AppError::Database)?;

        info!("Database connection established");
        self.conn.store(Some(std::sync::Arc::new(conn)));
        Ok(())
    }

    async fn probe(&self) -> Result<()> {
        match self.conn.load_full() {
            Some(conn) => conn.ping().await.map_err(AppError::Database),
            None => Err(AppError::probe("database", "not connected")),
        }
    }
}
