//! Core error types for onebigthing-core.
//!
//! This module defines the error hierarchy using thiserror. Storage and
//! entitlement failures get their own enums so callers can tell a broken
//! disk from a declined purchase.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for onebigthing-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Entitlement source errors
    #[error("Entitlement error: {0}")]
    Entitlement(#[from] EntitlementError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Read, write or delete failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,

    /// A previous holder of the connection panicked
    #[error("Store connection poisoned")]
    Poisoned,

    /// Value could not be encoded for writing
    #[error("Failed to encode value for '{key}': {message}")]
    Encode { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Errors reported by an entitlement source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    /// The user backed out of the purchase sheet
    #[error("Purchase cancelled by user")]
    Cancelled,

    /// The source could not be reached
    #[error("Entitlement source unavailable: {0}")]
    Unavailable(String),

    /// The purchase went through the flow but was declined
    #[error("Purchase failed: {0}")]
    PurchaseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task text was empty after trimming
    #[error("Task text must not be empty")]
    EmptyTaskText,

    /// An operation needed today's task but none is set
    #[error("No task set for {date}")]
    NoCurrentTask { date: chrono::NaiveDate },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl CoreError {
    /// True when the error came from the user cancelling a purchase.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, CoreError::Entitlement(EntitlementError::Cancelled))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_wraps_into_core_error() {
        let err: CoreError = StorageError::QueryFailed("disk full".into()).into();
        assert_eq!(err.to_string(), "Storage error: Query failed: disk full");
    }

    #[test]
    fn cancellation_is_detected() {
        let err: CoreError = EntitlementError::Cancelled.into();
        assert!(err.is_cancellation());

        let err: CoreError = EntitlementError::Unavailable("offline".into()).into();
        assert!(!err.is_cancellation());
    }
}
