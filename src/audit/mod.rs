//! Best-effort audit trail of store mutations and retrievals.
//!
//! Sinks never report failure to the caller: an operation's outcome does not
//! depend on whether its audit event was recorded.

pub mod jsonl;

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use jsonl::JsonlLogger;

pub type Payload = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditKind {
    Insert,
    Evict,
    Retrieve,
    Delete,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditKind::Insert => "insert",
            AuditKind::Evict => "evict",
            AuditKind::Retrieve => "retrieve",
            AuditKind::Delete => "delete",
        }
    }
}

impl fmt::Display for AuditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait AuditLogger: Send + Sync {
    fn event(&self, kind: AuditKind, payload: Payload);
}

impl<L: AuditLogger + ?Sized> AuditLogger for Box<L> {
    fn event(&self, kind: AuditKind, payload: Payload) {
        (**self).event(kind, payload)
    }
}

impl<L: AuditLogger + ?Sized> AuditLogger for Arc<L> {
    fn event(&self, kind: AuditKind, payload: Payload) {
        (**self).event(kind, payload)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl AuditLogger for NullLogger {
    fn event(&self, _kind: AuditKind, _payload: Payload) {}
}

/// Forwards audit events to the `tracing` subscriber at INFO.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl AuditLogger for TracingLogger {
    fn event(&self, kind: AuditKind, payload: Payload) {
        let payload = Value::Object(payload);
        tracing::info!(target: "retention::audit", kind = %kind, payload = %payload);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub kind: AuditKind,
    pub payload: Payload,
}

/// Keeps events in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn kinds(&self) -> Vec<AuditKind> {
        self.events().into_iter().map(|e| e.kind).collect()
    }
}

impl AuditLogger for MemoryLogger {
    fn event(&self, kind: AuditKind, payload: Payload) {
        if let Ok(mut events) = self.events.lock() {
            events.push(AuditEvent { kind, payload });
        }
    }
}
