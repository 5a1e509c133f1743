use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::backend::{Backend, BackendError, BackendResult};
use crate::retrieval::Retriever;
use crate::types::{Query, Record};

#[derive(Debug, Default)]
struct State {
    connected: bool,
    records: BTreeMap<String, Record>,
}

/// Process-local backend.
///
/// Records are held by value and enumerated in ascending id order, so
/// policies that break ties on enumeration order behave deterministically.
/// Every operation other than `connect`/`close` fails with
/// [`BackendError::Unavailable`] while disconnected.
#[derive(Debug)]
pub struct InMemoryBackend<R> {
    retriever: R,
    state: RwLock<State>,
}

impl<R: Retriever> InMemoryBackend<R> {
    pub fn new(retriever: R) -> Self {
        Self {
            retriever,
            state: RwLock::new(State::default()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.read_state().map(|s| s.connected).unwrap_or(false)
    }

    fn read_state(&self) -> BackendResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| BackendError::Internal("state lock poisoned".into()))
    }

    fn write_state(&self) -> BackendResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| BackendError::Internal("state lock poisoned".into()))
    }

    fn connected_read(&self) -> BackendResult<RwLockReadGuard<'_, State>> {
        let state = self.read_state()?;
        if !state.connected {
            return Err(BackendError::Unavailable("in-memory backend is not connected".into()));
        }
        Ok(state)
    }

    fn connected_write(&self) -> BackendResult<RwLockWriteGuard<'_, State>> {
        let state = self.write_state()?;
        if !state.connected {
            return Err(BackendError::Unavailable("in-memory backend is not connected".into()));
        }
        Ok(state)
    }
}

impl<R: Retriever> Backend for InMemoryBackend<R> {
    fn connect(&self) -> BackendResult<()> {
        self.write_state()?.connected = true;
        Ok(())
    }

    // Contents survive close/connect, like a server-side store would.
    fn close(&self) -> BackendResult<()> {
        self.write_state()?.connected = false;
        Ok(())
    }

    fn upsert(&self, record: &Record) -> BackendResult<()> {
        let mut state = self.connected_write()?;
        state.records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> BackendResult<Option<Record>> {
        Ok(self.connected_read()?.records.get(id).cloned())
    }

    fn delete(&self, id: &str) -> BackendResult<()> {
        self.connected_write()?.records.remove(id);
        Ok(())
    }

    fn search(&self, query: &Query, k: usize) -> BackendResult<Vec<Record>> {
        let candidates: Vec<Record> = self.connected_read()?.records.values().cloned().collect();
        debug!(query = %query.id, candidates = candidates.len(), k, "in-memory search");
        Ok(self.retriever.topk(candidates, query, k))
    }

    fn iter_ids(&self) -> BackendResult<Vec<String>> {
        Ok(self.connected_read()?.records.keys().cloned().collect())
    }

    fn count(&self) -> BackendResult<usize> {
        Ok(self.connected_read()?.records.len())
    }
}
