use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::metadata::Metadata;
use super::now_millis;

/// Width of one embedding component when accounting for storage.
const EMBEDDING_COMPONENT_BYTES: usize = std::mem::size_of::<f32>();

/// A retrievable unit of text with access statistics.
///
/// Timestamps are Unix epoch milliseconds. A `last_access` of `0` means the
/// record has never been returned by a retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    pub created_at: i64,
    #[serde(default)]
    pub last_access: i64,
    #[serde(default)]
    pub access_count: u64,
    /// Authoritative once the record has passed through `insert`.
    #[serde(default)]
    pub bytes: usize,
    #[serde(default)]
    pub metadata: Metadata,
    /// Reserved for graph backends; the store never reads it.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub neighbors: BTreeSet<String>,
}

impl Record {
    /// A fresh, never-accessed record created now with an unset size.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Record {
            id: id.into(),
            text: text.into(),
            embedding: None,
            created_at: now_millis(),
            last_access: 0,
            access_count: 0,
            bytes: 0,
            metadata: Metadata::new(),
            neighbors: BTreeSet::new(),
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_last_access(mut self, last_access: i64) -> Self {
        self.last_access = last_access;
        self
    }

    pub fn with_access_count(mut self, access_count: u64) -> Self {
        self.access_count = access_count;
        self
    }

    /// Caller-declared size. Zero means "estimate on insert".
    pub fn with_bytes(mut self, bytes: usize) -> Self {
        self.bytes = bytes;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The size this record is accounted at: the declared size when positive,
    /// otherwise the estimate.
    pub fn normalized_bytes(&self) -> usize {
        if self.bytes > 0 {
            self.bytes
        } else {
            estimate_bytes(self)
        }
    }

    /// Mark one retrieval hit at `timestamp`.
    pub fn record_access(&mut self, timestamp: i64) {
        self.access_count += 1;
        self.last_access = timestamp;
    }
}

/// UTF-8 length of the text plus four bytes per embedding component.
pub fn estimate_bytes(record: &Record) -> usize {
    let text_bytes = record.text.len();
    let embedding_bytes = record
        .embedding
        .as_ref()
        .map_or(0, |e| e.len() * EMBEDDING_COMPONENT_BYTES);

    text_bytes + embedding_bytes
}
