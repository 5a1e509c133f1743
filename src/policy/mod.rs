//! Victim selection for budget-driven eviction.

pub mod lfu;
pub mod lru;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::BackendError;
use crate::retention::StoreView;
use crate::types::Record;

pub use lfu::LfuPolicy;
pub use lru::LruPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvictionError {
    #[error("{policy}: eviction requested on an empty store")]
    EmptyStore { policy: &'static str },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Chooses one record to evict.
///
/// Must be a pure function of the records `view` yields: no hidden state,
/// no mutation. When several records are equally good victims, the first
/// one in the view's enumeration order wins, so the choice is only as
/// deterministic as the backend's ordering.
pub trait EvictionPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn select_victim(&self, view: &StoreView<'_>) -> Result<String, EvictionError>;
}

impl<P: EvictionPolicy + ?Sized> EvictionPolicy for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn select_victim(&self, view: &StoreView<'_>) -> Result<String, EvictionError> {
        (**self).select_victim(view)
    }
}

/// Scan `view` once and return the id of the record with the smallest key.
/// Strict comparison keeps the first of equal keys.
pub(crate) fn min_by_key<K: Ord>(
    policy: &'static str,
    view: &StoreView<'_>,
    key: impl Fn(&Record) -> K,
) -> Result<String, EvictionError> {
    let mut best: Option<(K, String)> = None;

    for record in view.records()? {
        let record = record?;
        let k = key(&record);
        let replace = match &best {
            Some((best_key, _)) => k < *best_key,
            None => true,
        };
        if replace {
            best = Some((k, record.id));
        }
    }

    best.map(|(_, id)| id)
        .ok_or(EvictionError::EmptyStore { policy })
}

/// Policies selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Lru,
    Lfu,
}

impl EvictionPolicy for PolicyKind {
    fn name(&self) -> &'static str {
        match self {
            PolicyKind::Lru => LruPolicy.name(),
            PolicyKind::Lfu => LfuPolicy.name(),
        }
    }

    fn select_victim(&self, view: &StoreView<'_>) -> Result<String, EvictionError> {
        match self {
            PolicyKind::Lru => LruPolicy.select_victim(view),
            PolicyKind::Lfu => LfuPolicy.select_victim(view),
        }
    }
}
