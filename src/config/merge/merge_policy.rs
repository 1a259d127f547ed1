//! Built-in defaults, registered as the lowest-precedence layer.

use crate::config::{
    DEFAULT_API_URL, DEFAULT_CONCURRENCY, DEFAULT_LIMIT_BYTES, DEFAULT_OUTPUT_DIR,
    DEFAULT_PARALLEL, DEFAULT_TIMEOUT_MS,
};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start a builder with every scalar default set, so partial sources deserialize cleanly.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("store.api_url", DEFAULT_API_URL)?
        .set_default("store.timeout_ms", DEFAULT_TIMEOUT_MS as i64)?
        .set_default("grouping.limit_bytes", DEFAULT_LIMIT_BYTES as i64)?
        .set_default("archive.slice_size_bytes", DEFAULT_LIMIT_BYTES as i64)?
        .set_default("archive.parallel", DEFAULT_PARALLEL as i64)?
        .set_default("archive.output_dir", DEFAULT_OUTPUT_DIR)?
        .set_default("tree.concurrency", DEFAULT_CONCURRENCY as i64)
}
