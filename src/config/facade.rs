//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::ClientConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the standard sources, looking for `client.toml` in `working_dir`.
    pub fn load(working_dir: &Path) -> Result<ClientConfig, ApiError> {
        let config = MergeService::load(working_dir)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file; the file must exist.
    pub fn load_from_file(path: &Path) -> Result<ClientConfig, ApiError> {
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_without_files_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigLoader::load(temp.path()).unwrap();
        assert_eq!(config.tree.concurrency, 8);
    }

    #[test]
    fn test_local_client_toml_is_picked_up() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("client.toml"),
            "[store]\napi_url = \"http://10.0.0.5:5001\"\n\n[tree]\nconcurrency = 3\n",
        )
        .unwrap();
        let config = ConfigLoader::load(temp.path()).unwrap();
        assert_eq!(config.store.api_url, "http://10.0.0.5:5001");
        assert_eq!(config.tree.concurrency, 3);
        assert_eq!(config.store.timeout_ms, 30_000);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let err = ConfigLoader::load_from_file(&temp.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ApiError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_values_are_rejected_on_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "[grouping]\nlimit_bytes = 0\n").unwrap();
        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("limit_bytes"));
    }
}
