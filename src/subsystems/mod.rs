//! Backing subsystem handles
//!
//! One handle per external dependency, assembled into a fixed,
//! compile-time-checked set. The set is constructed once at process entry
//! and passed by reference to the sequencer, the aggregator, and the
//! request pipeline; nothing reaches subsystems through ambient state.

/// Redis cache handle
pub mod cache;
/// SeaORM database handle
pub mod database;
/// SNS messaging handle
pub mod messaging;
/// S3 object storage handle
pub mod object_storage;
/// Websocket hub
pub mod realtime;

pub use cache::Cache;
pub use database::Database;
pub use messaging::Messaging;
pub use object_storage::ObjectStorage;
pub use realtime::{EventHandler, RealtimeEvent, RealtimeHub};

use crate::bootstrap::subsystem::Subsystem;
use crate::config::SubsystemsConfig;
use std::sync::Arc;

/// The process-wide set of subsystem handles
///
/// Construction is cheap: no I/O happens until the bootstrap sequencer
/// calls `connect` on each handle.
pub struct SubsystemSet {
    database: Arc<Database>,
    cache: Arc<Cache>,
    messaging: Arc<Messaging>,
    object_storage: Arc<ObjectStorage>,
    realtime: Arc<RealtimeHub>,
}

impl SubsystemSet {
    /// Build every handle from configuration
    pub fn new(config: &SubsystemsConfig) -> Self {
        Self {
            database: Arc::new(Database::new(&config.database)),
            cache: Arc::new(Cache::new(&config.cache)),
            messaging: Arc::new(Messaging::new(&config.messaging)),
            object_storage: Arc::new(ObjectStorage::new(&config.object_storage)),
            realtime: Arc::new(RealtimeHub::new()),
        }
    }

    /// All handles in bootstrap order
    ///
    /// The mandatory database comes first; the optional subsystems follow
    /// so a database failure aborts before any optional connect is spent.
    pub fn handles(&self) -> Vec<Arc<dyn Subsystem>> {
        vec![
            self.database.clone(),
            self.cache.clone(),
            self.messaging.clone(),
            self.object_storage.clone(),
            self.realtime.clone(),
        ]
    }

    /// The database handle
    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }

    /// The realtime hub
    pub fn realtime(&self) -> &Arc<RealtimeHub> {
        &self.realtime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::subsystem::Criticality;

    #[test]
    fn test_handles_are_in_bootstrap_order() {
        let set = SubsystemSet::new(&SubsystemsConfig::default());
        let names: Vec<&str> = set.handles().iter().map(|h| h.name()).collect();
        assert_eq!(
            names,
            vec!["database", "cache", "messaging", "object_storage", "realtime"]
        );
    }

    #[test]
    fn test_only_database_is_mandatory() {
        let set = SubsystemSet::new(&SubsystemsConfig::default());
        for handle in set.handles() {
            let expected = if handle.name() == "database" {
                Criticality::Mandatory
            } else {
                Criticality::Optional
            };
            assert_eq!(handle.criticality(), expected, "{}", handle.name());
        }
    }

    #[test]
    fn test_handle_names_are_unique() {
        let set = SubsystemSet::new(&SubsystemsConfig::default());
        let mut names: Vec<&str> = set.handles().iter().map(|h| h.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 5);
    }
}
