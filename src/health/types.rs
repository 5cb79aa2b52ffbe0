//! Health report types

use crate::bootstrap::subsystem::Status;
use serde::Serialize;
use serde::ser::Serializer;
use std::collections::BTreeMap;

/// Composite verdict across all subsystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    /// Every subsystem answered its probe
    Ok,
    /// At least one subsystem is disconnected
    Error,
}

/// One subsystem's probe result
///
/// Serializes to its wire string ("connected"/"disconnected"); the
/// diagnostic detail is for logs, not the wire format.
#[derive(Debug, Clone)]
pub struct SubsystemStatus {
    /// Connection verdict
    pub status: Status,
    /// Diagnostic text for a failed probe
    pub detail: Option<String>,
}

impl SubsystemStatus {
    /// A healthy probe result
    pub fn connected() -> Self {
        Self {
            status: Status::Connected,
            detail: None,
        }
    }

    /// A failed probe result with diagnostic text
    pub fn disconnected<S: Into<String>>(detail: S) -> Self {
        Self {
            status: Status::Disconnected,
            detail: Some(detail.into()),
        }
    }

    /// Whether the probe succeeded
    pub fn is_connected(&self) -> bool {
        self.status == Status::Connected
    }
}

impl Serialize for SubsystemStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.status.as_str())
    }
}

/// Composite health report, built fresh on every check
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Strict-AND verdict across all subsystems
    pub status: OverallStatus,
    /// Per-subsystem probe results, keyed by subsystem name
    #[serde(flatten)]
    pub subsystems: BTreeMap<String, SubsystemStatus>,
    /// When the report was produced
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    /// True when every subsystem is connected
    pub fn is_healthy(&self) -> bool {
        self.status == OverallStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serialization_shape() {
        let mut subsystems = BTreeMap::new();
        subsystems.insert("database".to_string(), SubsystemStatus::connected());
        subsystems.insert(
            "cache".to_string(),
            SubsystemStatus::disconnected("ping failed"),
        );

        let report = HealthReport {
            status: OverallStatus::Error,
            subsystems,
            timestamp: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["database"], "connected");
        assert_eq!(json["cache"], "disconnected");
        assert!(json["timestamp"].is_string());
        // Diagnostic detail stays out of the wire format
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn test_overall_status_serialization() {
        assert_eq!(serde_json::to_value(OverallStatus::Ok).unwrap(), "ok");
        assert_eq!(serde_json::to_value(OverallStatus::Error).unwrap(), "error");
    }
}
