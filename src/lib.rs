//! # gatherd
//!
//! Backend gateway for the gathering platform. The process owns one handle
//! per backing subsystem (database, cache, messaging, object storage,
//! realtime channel), connects them in a fixed order at startup, and
//! serves an HTTP surface whose `/health` endpoint re-probes every
//! subsystem on demand.
//!
//! ## Startup policy
//!
//! The database is mandatory: if it cannot connect, the process exits
//! non-zero before binding a listener. Every other subsystem is optional;
//! a failed connect is logged and recorded, and the gateway serves
//! degraded. `/health` reports the strict-AND composite either way.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use gatherd::{Config, server::HttpServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gatherd.yaml").await?;
//!     let server = HttpServer::new(&config).await?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

// Public module exports
pub mod bootstrap;
pub mod config;
pub mod health;
pub mod server;
pub mod subsystems;
pub mod utils;

// Re-export main types
pub use bootstrap::{BootstrapOutcome, BootstrapSequencer, Criticality, Status, Subsystem};
pub use config::Config;
pub use health::{HealthAggregator, HealthReport};
pub use utils::error::{AppError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
