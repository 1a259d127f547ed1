//! Client configuration
//!
//! Layered from built-in defaults, a global file, a local or explicit file, and
//! `METACLIENT__SECTION__KEY` environment variables (highest precedence).

mod facade;
mod merge;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub(crate) const DEFAULT_API_URL: &str = "http://127.0.0.1:5001";
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// 16 GiB, a common archive sector payload
pub(crate) const DEFAULT_LIMIT_BYTES: u64 = 17_179_869_184;
pub(crate) const DEFAULT_PARALLEL: usize = 2;
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "./output";
pub(crate) const DEFAULT_CONCURRENCY: usize = crate::tree::builder::DEFAULT_CONCURRENCY;

/// Content store connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub api_url: String,
    pub timeout_ms: u64,
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Byte capacity of one group
    pub limit_bytes: u64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            limit_bytes: DEFAULT_LIMIT_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub slice_size_bytes: u64,
    pub parallel: usize,
    pub output_dir: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            slice_size_bytes: DEFAULT_LIMIT_BYTES,
            parallel: DEFAULT_PARALLEL,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Store queries allowed in flight while building
    pub concurrency: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub store: StoreConfig,
    pub grouping: GroupingConfig,
    pub archive: ArchiveConfig,
    pub tree: TreeConfig,
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Reject values the operations would refuse anyway.
    pub fn validate(&self) -> Result<(), ApiError> {
        let checks = [
            (self.store.timeout_ms == 0, "store.timeout_ms must be positive"),
            (self.grouping.limit_bytes == 0, "grouping.limit_bytes must be positive"),
            (
                self.archive.slice_size_bytes == 0,
                "archive.slice_size_bytes must be positive",
            ),
            (self.archive.parallel == 0, "archive.parallel must be at least 1"),
            (self.tree.concurrency == 0, "tree.concurrency must be at least 1"),
        ];
        for (failed, message) in checks {
            if failed {
                return Err(ApiError::ConfigError(message.to_string()));
            }
        }
        Ok(())
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}
