//! Core error types for hardmode-core.
//!
//! Every operation reports failures through [`CoreError`]. Callers that need
//! the coarse taxonomy (bad request, not found, conflict, store failure) use
//! [`CoreError::kind`] instead of matching on the individual variants.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hardmode-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Lookup or update matched nothing
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Timer command issued in a state that does not accept it
    #[error("Cannot {action} while the timer is {state}")]
    InvalidTransition { action: &'static str, state: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Conflict,
    StoreFailure,
}

impl CoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) | CoreError::Json(_) => ErrorKind::BadRequest,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::Conflict(_) | CoreError::InvalidTransition { .. } => ErrorKind::Conflict,
            CoreError::Database(_) | CoreError::Config(_) | CoreError::Io(_) => {
                ErrorKind::StoreFailure
            }
        }
    }
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
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

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Date is not `YYYY-MM-DD`
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Value outside an inclusive range
    #[error("'{field}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Rejects `value` unless it lies within `min..=max`.
    pub(crate) fn check_range(
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    ) -> Result<(), ValidationError> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                field,
                min,
                max,
                value,
            })
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

fn extended_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => Some(e.extended_code),
        _ => None,
    }
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    extended_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
}

pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    extended_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
