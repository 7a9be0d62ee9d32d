//! Legacy task-scoped pomodoro sessions.
//!
//! Older recording path kept alongside the ledger; it feeds
//! [`StatsAggregator::compute`](crate::stats::StatsAggregator::compute).

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::error::{is_foreign_key_violation, CoreError, Result, ValidationError};
use crate::storage::{format_datetime_opt, parse_datetime_fallback, parse_datetime_opt};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroSession {
    pub id: i64,
    pub task_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Minutes
    pub duration: i64,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSession {
    pub task_id: i64,
    /// Defaults to the time of recording.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub completed: bool,
}

fn row_to_session(row: &Row) -> Result<PomodoroSession, rusqlite::Error> {
    Ok(PomodoroSession {
        id: row.get(0)?,
        task_id: row.get(1)?,
        start_time: parse_datetime_fallback(&row.get::<_, String>(2)?),
        end_time: parse_datetime_opt(row.get(3)?),
        duration: row.get(4)?,
        completed: row.get(5)?,
    })
}

/// Borrowed view over the `pomodoro_sessions` table.
pub struct Sessions<'a> {
    conn: &'a Connection,
}

impl<'a> Sessions<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Sessions, optionally for one task, latest start first.
    pub fn list(&self, task_id: Option<i64>) -> Result<Vec<PomodoroSession>> {
        let mut sql = String::from(
            "SELECT id, task_id, start_time, end_time, duration, completed
             FROM pomodoro_sessions",
        );
        let mut args: Vec<Value> = Vec::new();
        if let Some(task_id) = task_id {
            sql.push_str(" WHERE task_id = ?1");
            args.push(Value::Integer(task_id));
        }
        sql.push_str(" ORDER BY start_time DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let sessions = stmt
            .query_map(params_from_iter(args), row_to_session)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    /// # Errors
    /// `Validation` for a negative duration, `NotFound` if the task does not exist.
    pub fn create(&self, input: &NewSession) -> Result<PomodoroSession> {
        ValidationError::check_range("duration", input.duration, 0, i64::MAX)?;
        let start_time = input.start_time.unwrap_or_else(Utc::now);

        self.conn
            .execute(
                "INSERT INTO pomodoro_sessions (task_id, start_time, end_time, duration, completed)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    input.task_id,
                    start_time.to_rfc3339(),
                    format_datetime_opt(input.end_time.as_ref()),
                    input.duration,
                    input.completed,
                ],
            )
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    CoreError::not_found("task", input.task_id)
                } else {
                    e.into()
                }
            })?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(session_id = id, task_id = input.task_id, "recorded session");

        Ok(PomodoroSession {
            id,
            task_id: input.task_id,
            start_time,
            end_time: input.end_time,
            duration: input.duration,
            completed: input.completed,
        })
    }
}
