mod config;
pub mod database;
pub mod memory;
pub mod task_store;

pub use config::{CacheConfig, Config, HistoryConfig, SubscriptionConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;
pub use task_store::{dedupe_by_day, TaskStore, DEFAULT_HISTORY_LIMIT};

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{ConfigError, StorageError};

/// Returns `~/.config/onebigthing[-dev]/` based on ONEBIGTHING_ENV.
///
/// Set ONEBIGTHING_ENV=dev to use the development data directory, or
/// ONEBIGTHING_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var("ONEBIGTHING_DATA_DIR") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("ONEBIGTHING_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("onebigthing-dev")
            } else {
                base_dir.join("onebigthing")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

/// Minimal string key-value persistence.
///
/// Every call acquires the backend, performs one single-key operation and
/// releases it. Implementations must be shareable between the task store
/// and the subscription manager.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
