//! Core error types for sleepwatch-core.
//!
//! Nothing in this hierarchy is fatal to the host: the monitoring engine
//! logs dispatch failures and treats an unreadable schedule as "no schedule".

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sleepwatch-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Schedule store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Reminder delivery errors
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Schedule store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Stored schedule could not be decoded
    #[error("Stored schedule under '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
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
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Schedule validation errors, raised at save time.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Name was blank
    #[error("Name must not be empty")]
    EmptyName,

    /// Sleep window shorter than the configured minimum
    #[error("Sleep duration must be at least {min_hours:.1} hours (got {hours:.1})")]
    SleepTooShort { hours: f64, min_hours: f64 },

    /// Clock time could not be parsed
    #[error("Invalid clock time '{0}': expected HH:MM")]
    InvalidClockTime(String),
}

/// Reminder delivery errors.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Delivery backend rejected the reminder
    #[error("Reminder '{title}' rejected: {message}")]
    Rejected { title: String, message: String },

    /// IO failure while writing the reminder
    #[error("Reminder delivery IO failure: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
