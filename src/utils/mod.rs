//! Utility modules for the gateway

/// Error handling
pub mod error;

pub use error::{AppError, Result};
