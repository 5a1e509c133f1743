//! Storage capability consumed by the retention manager.
//!
//! A backend owns record content. It knows nothing about budgets; ranking is
//! delegated to an injected [`Retriever`](crate::retrieval::Retriever).

pub mod memory;

use thiserror::Error;

use crate::types::{Query, Record};

pub use memory::InMemoryBackend;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("write failed for {id}: {message}")]
    Write { id: String, message: String },

    #[error("read failed for {id}: {message}")]
    Read { id: String, message: String },

    #[error("internal backend error: {0}")]
    Internal(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

pub trait Backend: Send + Sync {
    /// Idempotent.
    fn connect(&self) -> BackendResult<()>;

    /// Idempotent.
    fn close(&self) -> BackendResult<()>;

    /// Insert or replace by id.
    fn upsert(&self, record: &Record) -> BackendResult<()>;

    fn get(&self, id: &str) -> BackendResult<Option<Record>>;

    /// No-op when the id is absent.
    fn delete(&self, id: &str) -> BackendResult<()>;

    /// Top `k` stored records for `query`, in the retriever's order.
    fn search(&self, query: &Query, k: usize) -> BackendResult<Vec<Record>>;

    fn iter_ids(&self) -> BackendResult<Vec<String>>;

    fn count(&self) -> BackendResult<usize>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn connect(&self) -> BackendResult<()> {
        (**self).connect()
    }

    fn close(&self) -> BackendResult<()> {
        (**self).close()
    }

    fn upsert(&self, record: &Record) -> BackendResult<()> {
        (**self).upsert(record)
    }

    fn get(&self, id: &str) -> BackendResult<Option<Record>> {
        (**self).get(id)
    }

    fn delete(&self, id: &str) -> BackendResult<()> {
        (**self).delete(id)
    }

    fn search(&self, query: &Query, k: usize) -> BackendResult<Vec<Record>> {
        (**self).search(query, k)
    }

    fn iter_ids(&self) -> BackendResult<Vec<String>> {
        (**self).iter_ids()
    }

    fn count(&self) -> BackendResult<usize> {
        (**self).count()
    }
}
