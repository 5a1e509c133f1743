//! Toy run: a tight budget, LRU eviction, lexical retrieval.
//!
//! The budget is 150 bytes: the five sentences total 228 bytes, so a budget
//! of 250 or more would never evict anything.
//!
//! `RUST_LOG=debug` shows every ledger decision; audit events are printed at
//! INFO through the tracing subscriber.

use std::error::Error;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use retention_core::audit::TracingLogger;
use retention_core::backend::InMemoryBackend;
use retention_core::policy::LruPolicy;
use retention_core::retrieval::LexicalOverlapRetriever;
use retention_core::{Query, Record, RetentionManager};

/// Low enough that inserting m4 and m5 forces evictions.
const BUDGET_BYTES: usize = 150;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .ok();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let backend = InMemoryBackend::new(LexicalOverlapRetriever);
    let store = RetentionManager::new(BUDGET_BYTES, backend, LruPolicy, TracingLogger);
    store.connect()?;

    store.insert(Record::new("m1", "Cats are small animals that like to nap."))?;
    store.insert(Record::new("m2", "Dogs are loyal animals and like to play fetch."))?;
    store.insert(Record::new("m3", "Graph databases store nodes and edges."))?;

    let hits = store.retrieve(&Query::new("q1", "animals that nap"), 2)?;
    let hit_ids: Vec<&str> = hits.iter().map(|r| r.id.as_str()).collect();
    println!("Hits: {hit_ids:?}");

    store.insert(Record::new(
        "m4",
        "Vector databases enable similarity search using embeddings.",
    ))?;
    store.insert(Record::new("m5", "LRU evicts the least recently accessed item."))?;

    let remaining = store.view().ids()?;
    println!("Remaining IDs: {remaining:?}");
    println!("Used bytes: {} / {}", store.used_bytes(), store.budget_bytes());

    store.close()?;
    Ok(())
}
