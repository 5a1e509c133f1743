use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-id byte accounting owned by one manager.
///
/// Invariant: `used_bytes == sizes.values().sum()` between operations.
#[derive(Debug, Clone, Default)]
pub(crate) struct Ledger {
    used_bytes: usize,
    sizes: BTreeMap<String, usize>,
}

impl Ledger {
    pub(crate) fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub(crate) fn len(&self) -> usize {
        self.sizes.len()
    }

    pub(crate) fn size_of(&self, id: &str) -> Option<usize> {
        self.sizes.get(id).copied()
    }

    /// Bytes in use if `id` were not stored.
    pub(crate) fn used_without(&self, id: &str) -> usize {
        self.used_bytes
            .saturating_sub(self.size_of(id).unwrap_or(0))
    }

    /// Account `id` at `bytes`, replacing any previous entry.
    pub(crate) fn record(&mut self, id: &str, bytes: usize) {
        if let Some(previous) = self.sizes.insert(id.to_string(), bytes) {
            self.used_bytes = self.used_bytes.saturating_sub(previous);
        }
        self.used_bytes += bytes;
    }

    /// Drop `id` and give back `bytes`, floored at zero.
    pub(crate) fn release(&mut self, id: &str, bytes: usize) {
        self.sizes.remove(id);
        self.used_bytes = self.used_bytes.saturating_sub(bytes);
    }

    pub(crate) fn is_consistent(&self) -> bool {
        self.used_bytes == self.sizes.values().sum::<usize>()
    }

    pub(crate) fn snapshot(&self, budget_bytes: usize) -> LedgerSnapshot {
        LedgerSnapshot {
            budget_bytes,
            used_bytes: self.used_bytes,
            entries: self.sizes.clone(),
        }
    }
}

/// Point-in-time copy of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub budget_bytes: usize,
    pub used_bytes: usize,
    pub entries: BTreeMap<String, usize>,
}

impl LedgerSnapshot {
    pub fn ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn is_consistent(&self) -> bool {
        self.used_bytes == self.entries.values().sum::<usize>()
    }
}
