mod config;
pub mod migrations;
pub mod store;

pub use config::{Config, ScheduleConfig, ServerConfig};
pub use store::Store;

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/hardmode[-dev]/` based on HARDMODE_ENV.
///
/// Set HARDMODE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HARDMODE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("hardmode-dev")
    } else {
        base_dir.join("hardmode")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Parse an RFC3339 column value, falling back to the current time.
pub(crate) fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::warn!(value = dt_str, error = %e, "unparseable stored timestamp");
            Utc::now()
        })
}

/// Parse a nullable RFC3339 column value.
pub(crate) fn parse_datetime_opt(dt_str: Option<String>) -> Option<DateTime<Utc>> {
    dt_str.as_deref().map(parse_datetime_fallback)
}

pub(crate) fn format_datetime_opt(dt: Option<&DateTime<Utc>>) -> Option<String> {
    dt.map(|dt| dt.to_rfc3339())
}
