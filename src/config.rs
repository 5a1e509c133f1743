use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::PolicyKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Store configuration.
///
/// ```json
/// { "budget_bytes": 4096, "policy": "lfu", "audit_log": "logs/audit.jsonl" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    pub budget_bytes: usize,
    #[serde(default)]
    pub policy: PolicyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_log: Option<PathBuf>,
}

impl RetentionConfig {
    pub fn new(budget_bytes: usize) -> Self {
        Self {
            budget_bytes,
            policy: PolicyKind::default(),
            audit_log: None,
        }
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_audit_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.audit_log = Some(path.into());
        self
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let f = std::fs::File::open(path.as_ref())?;
        let config: RetentionConfig = serde_json::from_reader(f)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.budget_bytes == 0 {
            return Err(ConfigError::Invalid("budget_bytes must be > 0".into()));
        }
        Ok(())
    }
}
