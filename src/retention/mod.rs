//! Byte-budget enforcement over a pluggable backend.
//!
//! `RetentionManager` is the only component that touches the ledger. Every
//! mutating operation runs under the ledger lock from start to finish, and a
//! ledger change is committed only after the backend call it mirrors has
//! succeeded. Reads (`get`, `view`) do not take the lock.

pub mod ledger;
pub mod view;

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::audit::{AuditKind, AuditLogger, JsonlLogger, Payload, TracingLogger};
use crate::backend::{Backend, BackendError};
use crate::config::{ConfigError, RetentionConfig};
use crate::policy::{EvictionError, EvictionPolicy, PolicyKind};
use crate::types::{Query, Record};

use ledger::Ledger;
pub use ledger::LedgerSnapshot;
pub use view::{Records, StoreView};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetentionError {
    #[error("item {id} is {bytes} bytes, larger than the {budget_bytes} byte budget")]
    ItemTooLarge {
        id: String,
        bytes: usize,
        budget_bytes: usize,
    },

    #[error("{policy}: eviction requested on an empty store")]
    EmptyStoreEviction { policy: &'static str },

    #[error("eviction policy chose {id}, which is not stored")]
    UnknownVictim { id: String },

    #[error("ledger lock poisoned")]
    LedgerPoisoned,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<EvictionError> for RetentionError {
    fn from(err: EvictionError) -> Self {
        match err {
            EvictionError::EmptyStore { policy } => RetentionError::EmptyStoreEviction { policy },
            EvictionError::Backend(err) => RetentionError::Backend(err),
        }
    }
}

fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}

pub struct RetentionManager<B, P, L> {
    budget_bytes: usize,
    backend: B,
    policy: P,
    logger: L,
    ledger: Mutex<Ledger>,
}

impl<B, P, L> RetentionManager<B, P, L>
where
    B: Backend,
    P: EvictionPolicy,
    L: AuditLogger,
{
    pub fn new(budget_bytes: usize, backend: B, policy: P, logger: L) -> Self {
        Self {
            budget_bytes,
            backend,
            policy,
            logger,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    pub fn budget_bytes(&self) -> usize {
        self.budget_bytes
    }

    pub fn used_bytes(&self) -> usize {
        self.read_ledger().used_bytes()
    }

    /// Number of records the ledger accounts for.
    pub fn len(&self) -> usize {
        self.read_ledger().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ledger_snapshot(&self) -> LedgerSnapshot {
        self.read_ledger().snapshot(self.budget_bytes)
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read-only enumeration of stored records.
    pub fn view(&self) -> StoreView<'_> {
        StoreView::new(&self.backend)
    }

    /// Connect the backend and rebuild the ledger from what it already holds.
    pub fn connect(&self) -> Result<(), RetentionError> {
        let mut ledger = self.lock_ledger()?;
        self.backend.connect()?;

        let mut hydrated = Ledger::default();
        for record in self.view().records()? {
            let record = record?;
            hydrated.record(&record.id, record.normalized_bytes());
        }
        *ledger = hydrated;

        info!(
            records = ledger.len(),
            used_bytes = ledger.used_bytes(),
            budget_bytes = self.budget_bytes,
            "retention store connected"
        );
        if ledger.used_bytes() > self.budget_bytes {
            warn!(
                used_bytes = ledger.used_bytes(),
                budget_bytes = self.budget_bytes,
                "backend holds more than the budget; next insert will evict"
            );
        }
        Ok(())
    }

    pub fn close(&self) -> Result<(), RetentionError> {
        let _ledger = self.lock_ledger()?;
        self.backend.close()?;
        info!("retention store closed");
        Ok(())
    }

    /// Store `item`, evicting until it fits. Returns the bytes it is
    /// accounted at.
    ///
    /// Re-inserting an existing id replaces it; the old size is not counted
    /// against the budget while making room for the new one.
    pub fn insert(&self, mut item: Record) -> Result<usize, RetentionError> {
        let bytes = item.normalized_bytes();
        item.bytes = bytes;

        if bytes > self.budget_bytes {
            return Err(RetentionError::ItemTooLarge {
                id: item.id,
                bytes,
                budget_bytes: self.budget_bytes,
            });
        }

        let mut ledger = self.lock_ledger()?;
        self.evict_until_fits(&mut ledger, &item.id, bytes)?;

        self.backend.upsert(&item)?;
        ledger.record(&item.id, bytes);
        if !ledger.is_consistent() {
            warn!(
                used_bytes = ledger.used_bytes(),
                records = ledger.len(),
                "ledger total has drifted from its entries after a fallback release"
            );
        }

        debug!(id = %item.id, bytes, used_bytes = ledger.used_bytes(), "inserted");
        self.audit(
            AuditKind::Insert,
            json!({
                "id": item.id,
                "bytes": bytes,
                "used_bytes": ledger.used_bytes(),
                "budget_bytes": self.budget_bytes,
            }),
        );
        Ok(bytes)
    }

    /// Top `k` records for `query`, in the retriever's order. Each hit has
    /// its access statistics updated and written back before returning.
    pub fn retrieve(&self, query: &Query, k: usize) -> Result<Vec<Record>, RetentionError> {
        let _ledger = self.lock_ledger()?;

        let hits = self.backend.search(query, k)?;
        let mut updated = Vec::with_capacity(hits.len());
        for mut record in hits {
            record.record_access(query.timestamp);
            self.backend.upsert(&record)?;
            updated.push(record);
        }

        let hit_ids: Vec<&str> = updated.iter().map(|r| r.id.as_str()).collect();
        debug!(query = %query.id, k, hits = ?hit_ids, "retrieved");
        self.audit(AuditKind::Retrieve, json!({ "q": query.id, "hits": hit_ids }));
        Ok(updated)
    }

    pub fn get(&self, id: &str) -> Result<Option<Record>, RetentionError> {
        Ok(self.backend.get(id)?)
    }

    /// Remove `id`. Unknown ids are a no-op.
    pub fn delete(&self, id: &str) -> Result<(), RetentionError> {
        let mut ledger = self.lock_ledger()?;

        let bytes = match ledger.size_of(id) {
            Some(bytes) => bytes,
            None => match self.backend.get(id)? {
                Some(record) => {
                    warn!(%id, "ledger has no entry for stored record; using its recorded size");
                    record.normalized_bytes()
                }
                None => {
                    debug!(%id, "delete of unknown id");
                    return Ok(());
                }
            },
        };

        self.backend.delete(id)?;
        ledger.release(id, bytes);

        debug!(%id, bytes, used_bytes = ledger.used_bytes(), "deleted");
        self.audit(AuditKind::Delete, json!({ "id": id, "used_bytes": ledger.used_bytes() }));
        Ok(())
    }

    fn evict_until_fits(
        &self,
        ledger: &mut Ledger,
        incoming_id: &str,
        incoming_bytes: usize,
    ) -> Result<(), RetentionError> {
        // The entry being replaced does not count against the incoming item.
        while ledger.used_without(incoming_id) + incoming_bytes > self.budget_bytes {
            let victim = self.policy.select_victim(&self.view())?;
            self.evict(ledger, &victim)?;
        }
        Ok(())
    }

    fn evict(&self, ledger: &mut Ledger, victim: &str) -> Result<(), RetentionError> {
        let bytes = match ledger.size_of(victim) {
            Some(bytes) => bytes,
            None => match self.backend.get(victim)? {
                Some(record) => {
                    warn!(id = %victim, "ledger has no entry for eviction victim; using its recorded size");
                    record.normalized_bytes()
                }
                None => {
                    return Err(RetentionError::UnknownVictim {
                        id: victim.to_string(),
                    })
                }
            },
        };

        self.backend.delete(victim)?;
        ledger.release(victim, bytes);

        debug!(
            id = %victim,
            bytes,
            used_bytes = ledger.used_bytes(),
            policy = self.policy.name(),
            "evicted"
        );
        self.audit(
            AuditKind::Evict,
            json!({ "id": victim, "bytes": bytes, "used_bytes": ledger.used_bytes() }),
        );
        Ok(())
    }

    fn audit(&self, kind: AuditKind, value: Value) {
        self.logger.event(kind, payload(value));
    }

    fn lock_ledger(&self) -> Result<MutexGuard<'_, Ledger>, RetentionError> {
        self.ledger.lock().map_err(|_| RetentionError::LedgerPoisoned)
    }

    fn read_ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<B: Backend> RetentionManager<B, PolicyKind, Box<dyn AuditLogger>> {
    /// Build a manager from configuration. Audit events go to the configured
    /// JSONL file, or to `tracing` when none is set.
    pub fn from_config(config: &RetentionConfig, backend: B) -> Result<Self, ConfigError> {
        config.validate()?;

        let logger: Box<dyn AuditLogger> = match &config.audit_log {
            Some(path) => Box::new(JsonlLogger::open(path)?),
            None => Box::new(TracingLogger),
        };

        Ok(Self::new(config.budget_bytes, backend, config.policy, logger))
    }
}
