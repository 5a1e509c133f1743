pub mod metadata;
pub mod query;
pub mod record;

pub use metadata::{Metadata, MetadataValue};
pub use query::Query;
pub use record::{estimate_bytes, Record};

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
