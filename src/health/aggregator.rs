//! Health aggregation
//!
//! Probes every registered subsystem and folds the results into one
//! composite report. Nothing here caches bootstrap results: a subsystem
//! that failed at startup and has since recovered reports healthy, and
//! vice versa.

use crate::bootstrap::subsystem::Subsystem;
use crate::health::types::{HealthReport, OverallStatus, SubsystemStatus};
use crate::utils::error::Result;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Composite health checker over all registered subsystem handles
pub struct HealthAggregator {
    handles: Vec<Arc<dyn Subsystem>>,
    probe_timeout: Duration,
}

impl HealthAggregator {
    /// Create an aggregator over the given handles
    pub fn new(handles: Vec<Arc<dyn Subsystem>>, probe_timeout: Duration) -> Self {
        Self {
            handles,
            probe_timeout,
        }
    }

    /// Probe every subsystem and build a fresh report
    ///
    /// Probes run concurrently; each is bounded by the probe timeout. A
    /// probe that errors or times out maps to `Disconnected` and never
    /// prevents the remaining probes from completing. The overall status
    /// is a strict AND: one disconnected subsystem makes the report
    /// `Error`, regardless of criticality.
    pub async fn check(&self) -> Result<HealthReport> {
        debug!("Running health check across {} subsystems", self.handles.len());

        let probes = self.handles.iter().map(|handle| {
            let handle = handle.clone();
            let bound = self.probe_timeout;
            async move {
                let status = match timeout(bound, handle.probe()).await {
                    Ok(Ok(())) => SubsystemStatus::connected(),
                    Ok(Err(e)) => SubsystemStatus::disconnected(e.to_string()),
                    Err(_) => SubsystemStatus::disconnected(format!(
                        "probe timed out after {:?}",
                        bound
                    )),
                };
                (handle.name().to_string(), status)
            }
        });

        let results: BTreeMap<String, SubsystemStatus> =
            join_all(probes).await.into_iter().collect();

        let status = if results.values().all(SubsystemStatus::is_connected) {
            OverallStatus::Ok
        } else {
            OverallStatus::Error
        };

        Ok(HealthReport {
            status,
            subsystems: results,
            timestamp: chrono::Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::subsystem::Criticality;
    use crate::utils::error::AppError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct StubSubsystem {
        name: &'static str,
        probe_ok: AtomicBool,
        probe_delay: Option<Duration>,
        probes: AtomicUsize,
        erratic_probe: bool,
    }

    impl StubSubsystem {
        fn healthy(name: &'static str) -> Self {
            Self {
                name,
                probe_ok: AtomicBool::new(true),
                probe_delay: None,
                probes: AtomicUsize::new(0),
                erratic_probe: false,
            }
        }

        fn unhealthy(name: &'static str) -> Self {
            let stub = Self::healthy(name);
            stub.probe_ok.store(false, Ordering::SeqCst);
            stub
        }

        fn slow(name: &'static str, delay: Duration) -> Self {
            let mut stub = Self::healthy(name);
            stub.probe_delay = Some(delay);
            stub
        }
    }

    #[async_trait]
    impl Subsystem for StubSubsystem {
        fn name(&self) -> &'static str {
            self.name
        }

        fn criticality(&self) -> Criticality {
            Criticality::Optional
        }

        async fn connect(&self) -> Result<()> {
            Ok(())
        }

        async fn probe(&self) -> Result<()> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            if self.erratic_probe {
                return Err(AppError::Internal("probe blew up".to_string()));
            }
            if let Some(delay) = self.probe_delay {
                tokio::time::sleep(delay).await;
            }
            if self.probe_ok.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(AppError::probe(self.name, "unreachable"))
            }
        }
    }

    fn aggregator(handles: Vec<Arc<dyn Subsystem>>) -> HealthAggregator {
        HealthAggregator::new(handles, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_all_connected_reports_ok() {
        let report = aggregator(vec![
            Arc::new(StubSubsystem::healthy("database")),
            Arc::new(StubSubsystem::healthy("cache")),
            Arc::new(StubSubsystem::healthy("realtime")),
        ])
        .check()
        .await
        .unwrap();

        assert_eq!(report.status, OverallStatus::Ok);
        assert!(report.is_healthy());
        assert!(report.subsystems.values().all(SubsystemStatus::is_connected));
    }

    #[tokio::test]
    async fn test_single_disconnect_makes_overall_error() {
        let report = aggregator(vec![
            Arc::new(StubSubsystem::healthy("database")),
            Arc::new(StubSubsystem::unhealthy("cache")),
        ])
        .check()
        .await
        .unwrap();

        assert_eq!(report.status, OverallStatus::Error);
        assert!(report.subsystems["database"].is_connected());
        assert!(!report.subsystems["cache"].is_connected());
    }

    #[tokio::test]
    async fn test_failed_probe_does_not_abort_others() {
        let database = Arc::new(StubSubsystem::healthy("database"));
        let storage = Arc::new(StubSubsystem::healthy("object_storage"));
        let broken = Arc::new(StubSubsystem {
            name: "cache",
            probe_ok: AtomicBool::new(true),
            probe_delay: None,
            probes: AtomicUsize::new(0),
            erratic_probe: true,
        });

        let report = aggregator(vec![database.clone(), broken, storage.clone()])
            .check()
            .await
            .unwrap();

        assert_eq!(report.status, OverallStatus::Error);
        assert!(!report.subsystems["cache"].is_connected());
        // Both siblings were still probed
        assert_eq!(database.probes.load(Ordering::SeqCst), 1);
        assert_eq!(storage.probes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_probe_maps_to_disconnected() {
        let report = aggregator(vec![
            Arc::new(StubSubsystem::healthy("database")),
            Arc::new(StubSubsystem::slow("cache", Duration::from_secs(5))),
        ])
        .check()
        .await
        .unwrap();

        assert_eq!(report.status, OverallStatus::Error);
        let cache = &report.subsystems["cache"];
        assert!(!cache.is_connected());
        assert!(cache.detail.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_probe_is_idempotent() {
        let handle = Arc::new(StubSubsystem::healthy("database"));
        let aggregator = aggregator(vec![handle.clone()]);

        let first = aggregator.check().await.unwrap();
        let second = aggregator.check().await.unwrap();

        assert_eq!(
            first.subsystems["database"].status,
            second.subsystems["database"].status
        );
        assert_eq!(handle.probes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_recovery_is_visible_without_caching() {
        let handle = Arc::new(StubSubsystem::unhealthy("cache"));
        let aggregator = aggregator(vec![handle.clone()]);

        let degraded = aggregator.check().await.unwrap();
        assert_eq!(degraded.status, OverallStatus::Error);

        handle.probe_ok.store(true, Ordering::SeqCst);
        let recovered = aggregator.check().await.unwrap();
        assert_eq!(recovered.status, OverallStatus::Ok);
    }
}
