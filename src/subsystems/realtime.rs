//! Realtime channel subsystem
//!
//! In-process websocket hub. Sessions attach over `GET /ws`; route groups
//! register named event bindings against the hub during server
//! construction, before any route configuration runs. The hub is the only
//! subsystem with a no-op connect: it lives entirely in-process.

use crate::bootstrap::subsystem::{Criticality, Subsystem};
use crate::utils::error::{AppError, Result};
use actix_ws::Session;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};
use uuid::Uuid;

/// One realtime frame: a named event with an arbitrary JSON payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeEvent {
    /// Event name, e.g. `chat.message`
    pub event: String,
    /// Event payload
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Handler invoked when a bound event arrives from any session
pub type EventHandler = Arc<dyn Fn(&RealtimeEvent) + Send + Sync>;

/// Websocket hub: session registry plus named event bindings
pub struct RealtimeHub {
    sessions: DashMap<Uuid, Session>,
    bindings: DashMap<String, Vec<(String, EventHandler)>>,
    active: AtomicBool,
}

impl RealtimeHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            bindings: DashMap::new(),
            active: AtomicBool::new(true),
        }
    }

    /// Register a named binding for an event
    ///
    /// Re-registering under the same name replaces the previous handler, so
    /// binding registration is idempotent.
    pub fn bind(&self, event: &str, name: &str, handler: EventHandler) {
        let mut entry = self.bindings.entry(event.to_string()).or_default();
        if let Some(existing) = entry.iter_mut().find(|(n, _)| n == name) {
            existing.1 = handler;
        } else {
            entry.push((name.to_string(), handler));
        }
    }

    /// Number of bindings registered for an event
    pub fn binding_count(&self, event: &str) -> usize {
        self.bindings.get(event).map(|b| b.len()).unwrap_or(0)
    }

    /// Attach a session, returning its id
    pub fn register(&self, session: Session) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, session);
        debug!("Realtime session attached: {}", id);
        id
    }

    /// Detach a session
    pub fn unregister(&self, id: Uuid) {
        self.sessions.remove(&id);
        debug!("Realtime session detached: {}", id);
    }

    /// Number of attached sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Invoke every binding registered for the event
    pub fn dispatch(&self, event: &RealtimeEvent) {
        if let Some(handlers) = self.bindings.get(&event.event) {
            for (_, handler) in handlers.iter() {
                handler(event);
            }
        }
    }

    /// Parse an inbound text frame and dispatch it
    pub fn dispatch_text(&self, text: &str) {
        match serde_json::from_str::<RealtimeEvent>(text) {
            Ok(event) => self.dispatch(&event),
            Err(e) => warn!("Dropping malformed realtime frame: {}", e),
        }
    }

    /// Send an event to every attached session
    ///
    /// Sessions whose transport has closed are pruned. Returns the number
    /// of sessions the frame was delivered to.
    pub async fn broadcast(&self, event: &RealtimeEvent) -> Result<usize> {
        let frame = serde_json::to_string(event).map_err(AppError::Serialization)?;

        let targets: Vec<(Uuid, Session)> = self
            .sessions
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let mut delivered = 0;
        for (id, session) in targets {
            let mut session = session;
            if session.text(frame.clone()).await.is_err() {
                self.unregister(id);
            } else {
                delivered += 1;
            }
        }

        Ok(delivered)
    }
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Subsystem for RealtimeHub {
    fn name(&self) -> &'static str {
        "realtime"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Optional
    }

    async fn connect(&self) -> Result<()> {
        // The hub is in-process; construction is the connection.
        Ok(())
    }

    async fn probe(&self) -> Result<()> {
        if self.active.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(AppError::probe("realtime", "hub offline"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn event(name: &str) -> RealtimeEvent {
        RealtimeEvent {
            event: name.to_string(),
            payload: serde_json::json!({"body": "hi"}),
        }
    }

    #[test]
    fn test_dispatch_invokes_bound_handlers() {
        let hub = RealtimeHub::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        hub.bind(
            "chat.message",
            "counter",
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        hub.dispatch(&event("chat.message"));
        hub.dispatch(&event("chat.message"));
        hub.dispatch(&event("other.event"));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_rebinding_same_name_replaces_handler() {
        let hub = RealtimeHub::new();
        hub.bind("chat.message", "relay", Arc::new(|_| {}));
        hub.bind("chat.message", "relay", Arc::new(|_| {}));
        assert_eq!(hub.binding_count("chat.message"), 1);
    }

    #[test]
    fn test_dispatch_text_parses_frames() {
        let hub = RealtimeHub::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        hub.bind(
            "chat.message",
            "counter",
            Arc::new(move |e| {
                assert_eq!(e.payload["body"], "hello");
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        hub.dispatch_text(r#"{"event":"chat.message","payload":{"body":"hello"}}"#);
        hub.dispatch_text("not json");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_broadcast_without_sessions_delivers_zero() {
        let hub = RealtimeHub::new();
        let delivered = hub.broadcast(&event("chat.message")).await.unwrap();
        assert_eq!(delivered, 0);
        assert_eq!(hub.session_count(), 0);
    }

    #[tokio::test]
    async fn test_hub_probe_reports_connected() {
        let hub = RealtimeHub::new();
        assert!(hub.probe().await.is_ok());
        assert_eq!(hub.criticality(), Criticality::Optional);
    }
}
