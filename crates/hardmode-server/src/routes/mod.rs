pub mod daily_tasks;
pub mod days;
pub mod health;
pub mod pomodoros;
pub mod sessions;
pub mod statistics;
pub mod tasks;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::{AppError, AppResult};

/// Parse a numeric path segment, reporting which identifier was malformed.
pub(crate) fn parse_id(raw: &str, what: &str) -> AppResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {what} ID")))
}

/// Parse an optional numeric query parameter; empty values count as absent.
pub(crate) fn parse_optional_id(raw: Option<&str>, what: &str) -> AppResult<Option<i64>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => parse_id(value, what).map(Some),
        None => Ok(None),
    }
}

/// Unwrap a JSON body, turning any rejection into a 400.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}
