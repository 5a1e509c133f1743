use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::warn;

use crate::audit::{AuditKind, AuditLogger, Payload};

/// Appends one JSON object per event to a file:
/// `{"t": "<RFC3339>", "kind": "<kind>", ...payload}`.
///
/// Opening can fail; writing never does from the caller's point of view.
#[derive(Debug)]
pub struct JsonlLogger {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlLogger {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, line: &[u8]) -> std::io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "audit file lock poisoned"))?;
        file.write_all(line)?;
        file.write_all(b"\n")?;
        file.flush()
    }
}

impl AuditLogger for JsonlLogger {
    fn event(&self, kind: AuditKind, payload: Payload) {
        let mut record = Payload::new();
        record.insert(
            "t".into(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        record.insert("kind".into(), Value::String(kind.as_str().into()));
        // "t" and "kind" are reserved
        for (key, value) in payload {
            record.entry(key).or_insert(value);
        }

        let line = match serde_json::to_vec(&Value::Object(record)) {
            Ok(line) => line,
            Err(err) => {
                warn!(%kind, error = %err, "failed to encode audit event");
                return;
            }
        };

        if let Err(err) = self.write_line(&line) {
            warn!(%kind, path = %self.path.display(), error = %err, "failed to write audit event");
        }
    }
}
