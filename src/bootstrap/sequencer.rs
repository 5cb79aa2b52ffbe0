//! Bootstrap sequencer
//!
//! Runs subsystem connects strictly in declaration order. A mandatory
//! subsystem that fails to connect aborts startup before the listener is
//! bound; optional failures are recorded and startup continues degraded.

use crate::bootstrap::subsystem::{Criticality, Subsystem};
use crate::utils::error::{AppError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Result of one bootstrap pass
#[derive(Debug)]
pub struct BootstrapOutcome {
    /// True when every mandatory subsystem connected
    pub succeeded_mandatory: bool,
    /// Optional subsystems that failed, in attempt order
    pub failures: Vec<(String, String)>,
}

impl BootstrapOutcome {
    /// True when every subsystem connected
    pub fn is_fully_connected(&self) -> bool {
        self.succeeded_mandatory && self.failures.is_empty()
    }
}

/// Dependency-ordered startup sequencer
pub struct BootstrapSequencer {
    connect_timeout: Duration,
}

impl BootstrapSequencer {
    /// Create a sequencer with an explicit bound on every connect attempt
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    /// Connect every handle in declaration order
    ///
    /// Strictly sequential: a later handle's connect never starts while an
    /// earlier one is in flight. Returns `Err` on the first mandatory
    /// failure; the caller must not bind the listener in that case.
    pub async fn run(&self, handles: &[Arc<dyn Subsystem>]) -> Result<BootstrapOutcome> {
        let mut failures = Vec::new();

        for handle in handles {
            let name = handle.name();

            let result = match timeout(self.connect_timeout, handle.connect()).await {
                Ok(result) => result,
                Err(_) => Err(AppError::Timeout(format!(
                    "{} connect timed out after {:?}",
                    name, self.connect_timeout
                ))),
            };

            match result {
                Ok(()) => {
                    info!("{} connected", name);
                }
                Err(e) => match handle.criticality() {
                    Criticality::Mandatory => {
                        error!("{} connection failed: {}", name, e);
                        return Err(AppError::connection(name, e.to_string()));
                    }
                    Criticality::Optional => {
                        warn!("{} connection failed, continuing without it: {}", name, e);
                        failures.push((name.to_string(), e.to_string()));
                    }
                },
            }
        }

        let outcome = BootstrapOutcome {
            succeeded_mandatory: true,
            failures,
        };

        if outcome.is_fully_connected() {
            info!("All subsystems connected");
        } else {
            warn!(
                "Starting degraded; unavailable subsystems: {}",
                outcome
                    .failures
                    .iter()
                    .map(|(name, _)| name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSubsystem {
        name: &'static str,
        criticality: Criticality,
        connect_ok: bool,
        connect_delay: Option<Duration>,
        attempts: AtomicUsize,
        order_log: Option<Arc<Mutex<Vec<&'static str>>>>,
    }

    impl StubSubsystem {
        fn new(name: &'static str, criticality: Criticality, connect_ok: bool) -> Self {
            Self {
                name,
                criticality,
                connect_ok,
                connect_delay: None,
                attempts: AtomicUsize::new(0),
                order_log: None,
            }
        }

        fn with_order_log(mut self, log: Arc<Mutex<Vec<&'static str>>>) -> Self {
            self.order_log = Some(log);
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.connect_delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl Subsystem for StubSubsystem {
        fn name(&self) -> &'static str {
            self.name
        }

        fn criticality(&self) -> Criticality {
            self.criticality
        }

        async fn connect(&self) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if let Some(log) = &self.order_log {
                log.lock().unwrap().push(self.name);
            }
            if let Some(delay) = self.connect_delay {
                tokio::time::sleep(delay).await;
            }
            if self.connect_ok {
                Ok(())
            } else {
                Err(AppError::connection(self.name, "refused"))
            }
        }

        async fn probe(&self) -> Result<()> {
            Ok(())
        }
    }

    fn sequencer() -> BootstrapSequencer {
        BootstrapSequencer::new(Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_all_connected_yields_clean_outcome() {
        let handles: Vec<Arc<dyn Subsystem>> = vec![
            Arc::new(StubSubsystem::new("database", Criticality::Mandatory, true)),
            Arc::new(StubSubsystem::new("cache", Criticality::Optional, true)),
        ];

        let outcome = sequencer().run(&handles).await.unwrap();
        assert!(outcome.succeeded_mandatory);
        assert!(outcome.failures.is_empty());
        assert!(outcome.is_fully_connected());
    }

    #[tokio::test]
    async fn test_optional_failure_does_not_block_later_handles() {
        let storage = Arc::new(StubSubsystem::new(
            "object_storage",
            Criticality::Optional,
            true,
        ));
        let handles: Vec<Arc<dyn Subsystem>> = vec![
            Arc::new(StubSubsystem::new("database", Criticality::Mandatory, true)),
            Arc::new(StubSubsystem::new("cache", Criticality::Optional, false)),
            storage.clone(),
        ];

        let outcome = sequencer().run(&handles).await.unwrap();
        assert!(outcome.succeeded_mandatory);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "cache");
        assert_eq!(storage.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_every_optional_failure_still_attempts_all() {
        let handles: Vec<Arc<dyn Subsystem>> = vec![
            Arc::new(StubSubsystem::new("database", Criticality::Mandatory, true)),
            Arc::new(StubSubsystem::new("cache", Criticality::Optional, false)),
            Arc::new(StubSubsystem::new("messaging", Criticality::Optional, false)),
            Arc::new(StubSubsystem::new(
                "object_storage",
                Criticality::Optional,
                false,
            )),
        ];

        let outcome = sequencer().run(&handles).await.unwrap();
        assert!(outcome.succeeded_mandatory);
        let failed: Vec<&str> = outcome.failures.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(failed, vec!["cache", "messaging", "object_storage"]);
    }

    #[tokio::test]
    async fn test_mandatory_failure_aborts_run() {
        let cache = Arc::new(StubSubsystem::new("cache", Criticality::Optional, true));
        let handles: Vec<Arc<dyn Subsystem>> = vec![
            Arc::new(StubSubsystem::new(
                "database",
                Criticality::Mandatory,
                false,
            )),
            cache.clone(),
        ];

        let result = sequencer().run(&handles).await;
        assert!(matches!(result, Err(AppError::Connection { .. })));
        // Readiness implies all mandatory handles succeeded; after a
        // mandatory failure nothing further is attempted.
        assert_eq!(cache.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handles_attempted_in_declaration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let handles: Vec<Arc<dyn Subsystem>> = vec![
            Arc::new(
                StubSubsystem::new("database", Criticality::Mandatory, true)
                    .with_order_log(order.clone()),
            ),
            Arc::new(
                StubSubsystem::new("cache", Criticality::Optional, true)
                    .with_order_log(order.clone()),
            ),
            Arc::new(
                StubSubsystem::new("messaging", Criticality::Optional, true)
                    .with_order_log(order.clone()),
            ),
        ];

        sequencer().run(&handles).await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["database", "cache", "messaging"]);
    }

    #[tokio::test]
    async fn test_slow_optional_connect_times_out_and_is_recorded() {
        let sequencer = BootstrapSequencer::new(Duration::from_millis(50));
        let handles: Vec<Arc<dyn Subsystem>> = vec![Arc::new(
            StubSubsystem::new("cache", Criticality::Optional, true)
                .with_delay(Duration::from_secs(5)),
        )];

        let outcome = sequencer.run(&handles).await.unwrap();
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "cache");
        assert!(outcome.failures[0].1.contains("timed out"));
    }

    #[tokio::test]
    async fn test_slow_mandatory_connect_times_out_and_aborts() {
        let sequencer = BootstrapSequencer::new(Duration::from_millis(50));
        let handles: Vec<Arc<dyn Subsystem>> = vec![Arc::new(
            StubSubsystem::new("database", Criticality::Mandatory, true)
                .with_delay(Duration::from_secs(5)),
        )];

        assert!(sequencer.run(&handles).await.is_err());
    }
}
