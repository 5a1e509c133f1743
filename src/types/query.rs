use serde::{Deserialize, Serialize};

use super::metadata::Metadata;
use super::now_millis;

/// A single retrieval request. Not retained by the store.
///
/// `timestamp` becomes the `last_access` of every record the query returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub id: String,
    pub text: String,
    pub timestamp: i64,
    /// Unused by lexical scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Query {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Query {
            id: id.into(),
            text: text.into(),
            timestamp: now_millis(),
            embedding: None,
            metadata: Metadata::new(),
        }
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}
