//! MergeService: orchestrates sources, applies merge policy, deserializes to ClientConfig.

use crate::config::sources::{environment, global_file, local_file};
use crate::config::ClientConfig;
use config::ConfigError;
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from the standard sources.
    /// Precedence: defaults (lowest) -> global file -> `client.toml` in `working_dir` -> environment (highest).
    pub fn load(working_dir: &Path) -> Result<ClientConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = local_file::add_to_builder(builder, working_dir)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay. The global and local files
    /// are not consulted.
    pub fn load_from_file(path: &Path) -> Result<ClientConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = local_file::add_required(builder, path)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}
