//! Storage configuration and the durable key-value store.
//!
//! All persisted client state lives in a single JSON object file under the
//! storage root (default `~/.weblock/`): an opaque string-to-string map
//! holding three logical keys (username, session start, activity log),
//! mirroring the browser build's localStorage layout.
//!
//! - **Graceful loads**: a missing or corrupt file is an empty store.
//! - **Atomic saves**: temp file in the same directory, then rename.

use crate::error::{Result, WeblockError};
use fs_err as fs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key for the signed-in username.
pub const KEY_USER: &str = "weblocker_user";
/// Key for the session start time (epoch milliseconds, string-encoded).
pub const KEY_SESSION_STARTED: &str = "weblocker_session";
/// Key for the JSON-encoded activity log array.
pub const KEY_ACTIVITY: &str = "weblocker_activity";

const STATE_FILE: &str = "state.json";
const CONFIG_FILE: &str = "config.json";

/// Central configuration for client storage paths.
///
/// Production code uses `StorageConfig::default()` which points to
/// `~/.weblock/`. Tests use `StorageConfig::with_root(temp_dir)` for
/// isolation.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let home = dirs::home_dir().expect("Could not find home directory");
        Self {
            root: home.join(".weblock"),
        }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with a custom root directory.
    /// Used for testing with temp directories.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the root directory for client data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to state.json (the key-value store).
    pub fn state_file(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    /// Path to config.json (app preferences).
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }
}

/// Durable string-to-string store backing session and activity state.
///
/// Every mutation persists the whole map; callers batch related removals
/// through [`KvStore::remove_many`] to keep writes down.
#[derive(Debug)]
pub struct KvStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl KvStore {
    /// Opens the store backed by the config's state file.
    ///
    /// Missing or corrupt contents yield an empty store; the failure only
    /// goes to diagnostics.
    pub fn open(config: &StorageConfig) -> Self {
        let path = config.state_file();
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "Corrupt state file; starting from an empty store"
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.values.insert(key.to_string(), value.into());
        self.persist()
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        self.persist()
    }

    /// Removes several keys with a single write.
    pub fn remove_many(&mut self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.values.remove(*key);
        }
        self.persist()
    }

    /// Writes the map atomically: temp file in the same directory, then
    /// rename.
    fn persist(&self) -> Result<()> {
        use std::io::Write;

        let content =
            serde_json::to_string_pretty(&self.values).map_err(|e| WeblockError::Json {
                context: "Failed to serialize state file".to_string(),
                source: e,
            })?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| WeblockError::Io {
            context: format!("Failed to create storage directory {}", dir.display()),
            source: e,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| WeblockError::Io {
            context: "Failed to create temp file".to_string(),
            source: e,
        })?;

        tmp.write_all(content.as_bytes()).map_err(|e| WeblockError::Io {
            context: "Failed to write temp file".to_string(),
            source: e,
        })?;

        tmp.flush().map_err(|e| WeblockError::Io {
            context: "Failed to flush temp file".to_string(),
            source: e,
        })?;

        tmp.persist(&self.path).map_err(|e| WeblockError::Io {
            context: "Failed to persist state file".to_string(),
            source: e.error,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config() -> (TempDir, StorageConfig) {
        let tmp = TempDir::new().expect("temp dir");
        let config = StorageConfig::with_root(tmp.path().to_path_buf());
        (tmp, config)
    }

    #[test]
    fn values_survive_reopen() {
        let (_tmp, config) = test_config();

        let mut store = KvStore::open(&config);
        store.set(KEY_USER, "alice").expect("set");
        store.set(KEY_SESSION_STARTED, "1700000000000").expect("set");

        let reopened = KvStore::open(&config);
        assert_eq!(reopened.get(KEY_USER), Some("alice"));
        assert_eq!(reopened.get(KEY_SESSION_STARTED), Some("1700000000000"));
    }

    #[test]
    fn missing_file_opens_empty() {
        let (_tmp, config) = test_config();
        let store = KvStore::open(&config);
        assert_eq!(store.get(KEY_USER), None);
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let (_tmp, config) = test_config();
        std::fs::create_dir_all(config.root()).expect("dir");
        std::fs::write(config.state_file(), "{ not valid json").expect("write");

        let store = KvStore::open(&config);
        assert_eq!(store.get(KEY_USER), None);
    }

    #[test]
    fn remove_many_clears_keys_in_one_write() {
        let (_tmp, config) = test_config();

        let mut store = KvStore::open(&config);
        store.set(KEY_USER, "alice").expect("set");
        store.set(KEY_SESSION_STARTED, "123").expect("set");
        store.set(KEY_ACTIVITY, "[]").expect("set");

        store
            .remove_many(&[KEY_USER, KEY_SESSION_STARTED])
            .expect("remove");

        let reopened = KvStore::open(&config);
        assert_eq!(reopened.get(KEY_USER), None);
        assert_eq!(reopened.get(KEY_SESSION_STARTED), None);
        assert_eq!(reopened.get(KEY_ACTIVITY), Some("[]"));
    }

    #[test]
    fn persisted_file_is_valid_json() {
        let (_tmp, config) = test_config();

        let mut store = KvStore::open(&config);
        store.set("key", "value").expect("set");

        let content = std::fs::read_to_string(config.state_file()).expect("read");
        let parsed: HashMap<String, String> = serde_json::from_str(&content).expect("parse");
        assert_eq!(parsed.get("key").map(String::as_str), Some("value"));
    }
}
