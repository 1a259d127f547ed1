//! Local config file: `client.toml` next to where the client runs, or an explicit path.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

pub const LOCAL_CONFIG_FILE: &str = "client.toml";

/// Add `<working_dir>/client.toml` if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    working_dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        File::from(working_dir.join(LOCAL_CONFIG_FILE))
            .format(FileFormat::Toml)
            .required(false),
    ))
}

/// Add `path`, failing the build when it is missing.
pub fn add_required(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(true)))
}
