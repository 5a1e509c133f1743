use crate::policy::{min_by_key, EvictionError, EvictionPolicy};
use crate::retention::StoreView;

/// Evicts the record minimizing `(access_count, last_access)`: the least
/// frequently used, and among those the least recently used.
#[derive(Debug, Default, Clone, Copy)]
pub struct LfuPolicy;

impl EvictionPolicy for LfuPolicy {
    fn name(&self) -> &'static str {
        "lfu"
    }

    fn select_victim(&self, view: &StoreView<'_>) -> Result<String, EvictionError> {
        min_by_key(self.name(), view, |record| (record.access_count, record.last_access))
    }
}
