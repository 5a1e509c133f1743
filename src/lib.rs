//! Byte-budgeted record retention with pluggable eviction and retrieval.
//!
//! `retention-core` keeps a collection of text records under a fixed byte
//! budget. Inserting past the budget evicts records chosen by an
//! [`EvictionPolicy`](policy::EvictionPolicy); queries are ranked by a
//! [`Retriever`](retrieval::Retriever) behind a [`Backend`](backend::Backend).
//! Accounting lives in a ledger owned by the
//! [`RetentionManager`](retention::RetentionManager), which commits a change
//! only after the backend has accepted it.

pub mod audit;
pub mod backend;
pub mod config;
pub mod policy;
pub mod retention;
pub mod retrieval;
pub mod types;

pub use config::RetentionConfig;
pub use retention::{RetentionError, RetentionManager};
pub use types::{Query, Record};
