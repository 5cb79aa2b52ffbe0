//! Subsystem contract
//!
//! Every backing dependency (database, cache, messaging, object storage,
//! realtime hub) is wrapped in a handle implementing [`Subsystem`]. The
//! bootstrap sequencer and the health aggregator depend on nothing else
//! from any backing service.

use crate::utils::error::Result;
use async_trait::async_trait;

/// Whether a subsystem's connect failure aborts process startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criticality {
    /// Connect failure terminates the process before it accepts requests
    Mandatory,
    /// Connect failure is recorded and startup continues degraded
    Optional,
}

/// Connection state reported by a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The subsystem answered its probe
    Connected,
    /// The subsystem failed or timed out its probe
    Disconnected,
}

impl Status {
    /// Wire representation used by the health endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Connected => "connected",
            Status::Disconnected => "disconnected",
        }
    }
}

/// Uniform handle around one backing dependency
///
/// `connect` is idempotent: calling it on an already-connected handle is a
/// no-op. `probe` is a side-effect-free read of connection state; a handle
/// that never connected reports an error rather than attempting to connect.
#[async_trait]
pub trait Subsystem: Send + Sync {
    /// Unique subsystem identifier, used in logs and health reports
    fn name(&self) -> &'static str;

    /// Startup failure policy for this subsystem
    fn criticality(&self) -> Criticality;

    /// Establish the underlying connection
    async fn connect(&self) -> Result<()>;

    /// Verify the underlying connection without mutating it
    async fn probe(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_representation() {
        assert_eq!(Status::Connected.as_str(), "connected");
        assert_eq!(Status::Disconnected.as_str(), "disconnected");
    }
}
