use crate::backend::{Backend, BackendResult};
use crate::types::Record;

/// Read-only enumeration over the records currently stored.
///
/// This is all an eviction policy gets to see. It has no access to the
/// ledger and cannot mutate the backend.
pub struct StoreView<'a> {
    backend: &'a dyn Backend,
}

impl<'a> StoreView<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    pub fn ids(&self) -> BackendResult<Vec<String>> {
        self.backend.iter_ids()
    }

    /// Lazily resolves each id against the backend. Ids deleted since the
    /// enumeration started are skipped. Call again to restart.
    pub fn records(&self) -> BackendResult<Records<'a>> {
        Ok(Records {
            backend: self.backend,
            ids: self.backend.iter_ids()?.into_iter(),
        })
    }
}

pub struct Records<'a> {
    backend: &'a dyn Backend,
    ids: std::vec::IntoIter<String>,
}

impl Iterator for Records<'_> {
    type Item = BackendResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        for id in self.ids.by_ref() {
            match self.backend.get(&id) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}
