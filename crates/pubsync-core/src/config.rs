//! Deployment configuration
//!
//! Strategy selection happens once, when a deployment is wired. A config
//! file names the strategy, the retry bound for the independent-store
//! strategy, and where the databases live.

use crate::logging_facility::Profile;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("retry_attempts must be at least 1")]
    ZeroRetryAttempts,

    #[error("strategy {strategy} requires storage.{field}")]
    MissingPath {
        strategy: SyncStrategyKind,
        field: &'static str,
    },
}

/// How the draft and published stores are kept in step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStrategyKind {
    /// One store performs both writes itself
    Delegated,
    /// Two independent databases; published write retried
    #[default]
    IndependentRetry,
    /// Two stores on one connection, written in a single transaction
    SharedTransaction,
}

impl std::fmt::Display for SyncStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SyncStrategyKind::Delegated => "delegated",
            SyncStrategyKind::IndependentRetry => "independent_retry",
            SyncStrategyKind::SharedTransaction => "shared_transaction",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Single database holding both tables
    pub path: Option<PathBuf>,
    pub draft_path: Option<PathBuf>,
    pub published_path: Option<PathBuf>,
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            draft_path: None,
            published_path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub strategy: SyncStrategyKind,
    pub retry_attempts: u32,
    pub log_profile: Profile,
    pub storage: StorageConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            strategy: SyncStrategyKind::default(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            log_profile: Profile::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_attempts == 0 {
            return Err(ConfigError::ZeroRetryAttempts);
        }
        let missing = |field: &'static str| ConfigError::MissingPath {
            strategy: self.strategy,
            field,
        };
        match self.strategy {
            SyncStrategyKind::IndependentRetry => {
                if self.storage.draft_path.is_none() {
                    return Err(missing("draft_path"));
                }
                if self.storage.published_path.is_none() {
                    return Err(missing("published_path"));
                }
            }
            SyncStrategyKind::Delegated | SyncStrategyKind::SharedTransaction => {
                if self.storage.path.is_none() {
                    return Err(missing("path"));
                }
            }
        }
        Ok(())
    }
}
