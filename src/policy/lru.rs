use crate::policy::{min_by_key, EvictionError, EvictionPolicy};
use crate::retention::StoreView;

/// Evicts the record with the oldest `last_access`. Never-accessed records
/// (`last_access == 0`) go first.
#[derive(Debug, Default, Clone, Copy)]
pub struct LruPolicy;

impl EvictionPolicy for LruPolicy {
    fn name(&self) -> &'static str {
        "lru"
    }

    fn select_victim(&self, view: &StoreView<'_>) -> Result<String, EvictionError> {
        min_by_key(self.name(), view, |record| record.last_access)
    }
}
