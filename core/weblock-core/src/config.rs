//! Client configuration loading and saving.

use crate::storage::StorageConfig;
use serde::{Deserialize, Serialize};
use std::fs;

/// Default backend deployment.
pub const DEFAULT_API_BASE_URL: &str = "https://devfuad.com/weblocker";

/// App preferences stored as `config.json` under the storage root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

/// Loads the configuration, returning defaults if the file doesn't exist
/// or is malformed.
pub fn load_config(storage: &StorageConfig) -> AppConfig {
    fs::read_to_string(storage.config_file())
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().expect("temp dir");
        let storage = StorageConfig::with_root(tmp.path().to_path_buf());

        let config = load_config(&storage);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn reads_overridden_base_url() {
        let tmp = TempDir::new().expect("temp dir");
        let storage = StorageConfig::with_root(tmp.path().to_path_buf());
        fs::create_dir_all(storage.root()).expect("dir");
        fs::write(
            storage.config_file(),
            r#"{"api_base_url": "http://localhost:9000/weblocker"}"#,
        )
        .expect("write");

        let config = load_config(&storage);
        assert_eq!(config.api_base_url, "http://localhost:9000/weblocker");
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let tmp = TempDir::new().expect("temp dir");
        let storage = StorageConfig::with_root(tmp.path().to_path_buf());
        fs::create_dir_all(storage.root()).expect("dir");
        fs::write(storage.config_file(), "{ nope").expect("write");

        let config = load_config(&storage);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
