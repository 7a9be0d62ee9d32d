//! Day Planner: one aggregate per calendar date.
//!
//! A day moves through `planned -> in progress -> reflected`, but nothing
//! locks it: upserting a reflected day reopens its window fields and leaves
//! the reflection untouched.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};
use crate::storage::{format_datetime_opt, parse_datetime_opt};

/// Planning and outcome data for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub id: i64,
    /// `YYYY-MM-DD`
    pub date: String,
    pub target_pomos: i32,
    pub finished_pomos: i32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub comment: String,
    /// 1-5 stars
    pub day_rating: Option<i32>,
    pub main_distraction: String,
    pub reflection_notes: String,
}

/// Window and target fields merged into the day for `date`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayUpsert {
    pub date: String,
    #[serde(default)]
    pub target_pomos: i32,
    #[serde(default)]
    pub finished_pomos: i32,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Only applied when the day already exists.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comment: String,
}

/// End-of-day reflection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reflection {
    #[serde(default)]
    pub day_rating: Option<i32>,
    #[serde(default)]
    pub main_distraction: String,
    #[serde(default)]
    pub reflection_notes: String,
}

/// Result of [`DayPlanner::upsert`].
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub day: Day,
    /// `true` when the row did not exist before the call.
    pub created: bool,
}

const DAY_COLUMNS: &str = "id, date, target_pomos, finished_pomos, start_time, end_time, \
                           comment, day_rating, main_distraction, reflection_notes";

fn row_to_day(row: &Row) -> Result<Day, rusqlite::Error> {
    Ok(Day {
        id: row.get(0)?,
        date: row.get(1)?,
        target_pomos: row.get(2)?,
        finished_pomos: row.get(3)?,
        start_time: parse_datetime_opt(row.get(4)?),
        end_time: parse_datetime_opt(row.get(5)?),
        comment: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        day_rating: row.get(7)?,
        main_distraction: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        reflection_notes: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
    })
}

/// Rejects anything that is not a real `YYYY-MM-DD` date.
pub fn validate_date(date: &str) -> Result<NaiveDate, ValidationError> {
    if date.len() != 10 {
        return Err(ValidationError::InvalidDate(date.to_string()));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))
}

/// Borrowed view over the `day` table.
pub struct DayPlanner<'a> {
    conn: &'a Connection,
}

impl<'a> DayPlanner<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Exact-match lookup by date.
    pub fn get(&self, date: &str) -> Result<Day> {
        self.conn
            .query_row(
                &format!("SELECT {DAY_COLUMNS} FROM day WHERE date = ?1"),
                params![date],
                row_to_day,
            )
            .optional()?
            .ok_or_else(|| CoreError::not_found("day", date))
    }

    pub fn get_by_id(&self, id: i64) -> Result<Day> {
        self.conn
            .query_row(
                &format!("SELECT {DAY_COLUMNS} FROM day WHERE id = ?1"),
                params![id],
                row_to_day,
            )
            .optional()?
            .ok_or_else(|| CoreError::not_found("day", id))
    }

    /// Create the day for `input.date`, or merge into the existing one.
    ///
    /// The merge replaces target, finished, start, end and comment, and
    /// keeps the id and reflection fields. A single conditional insert does
    /// the write, so two callers racing on the same date both land on one
    /// row.
    pub fn upsert(&self, input: &DayUpsert) -> Result<UpsertOutcome> {
        validate_date(&input.date)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let existed = tx
            .query_row(
                "SELECT 1 FROM day WHERE date = ?1",
                params![input.date],
                |_| Ok(()),
            )
            .optional()?
            .is_some();

        let day = tx.query_row(
            &format!(
                "INSERT INTO day (date, target_pomos, finished_pomos, start_time, end_time, comment)
                 VALUES (?1, ?2, ?3, ?4, NULL, ?6)
                 ON CONFLICT(date) DO UPDATE SET
                     target_pomos   = excluded.target_pomos,
                     finished_pomos = excluded.finished_pomos,
                     start_time     = excluded.start_time,
                     end_time       = ?5,
                     comment        = excluded.comment
                 RETURNING {DAY_COLUMNS}"
            ),
            params![
                input.date,
                input.target_pomos,
                input.finished_pomos,
                format_datetime_opt(input.start_time.as_ref()),
                format_datetime_opt(input.end_time.as_ref()),
                input.comment,
            ],
            row_to_day,
        )?;
        tx.commit()?;

        tracing::debug!(day_id = day.id, date = %day.date, created = !existed, "upserted day");
        Ok(UpsertOutcome {
            day,
            created: !existed,
        })
    }

    /// Record the reflection and stamp the end time with the current time.
    ///
    /// # Errors
    /// `Validation` for a rating outside 1-5, `NotFound` for an unknown id.
    pub fn update_reflection(&self, id: i64, reflection: &Reflection) -> Result<Day> {
        if let Some(rating) = reflection.day_rating {
            ValidationError::check_range("day_rating", rating.into(), 1, 5)?;
        }

        let changed = self.conn.execute(
            "UPDATE day
             SET day_rating = ?1, main_distraction = ?2, reflection_notes = ?3, end_time = ?4
             WHERE id = ?5",
            params![
                reflection.day_rating,
                reflection.main_distraction,
                reflection.reflection_notes,
                Utc::now().to_rfc3339(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(CoreError::not_found("day", id));
        }
        tracing::debug!(day_id = id, rating = ?reflection.day_rating, "recorded reflection");
        self.get_by_id(id)
    }

    /// Remove a day together with its planned tasks and ledger entries.
    pub fn delete(&self, id: i64) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM day WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(CoreError::not_found("day", id));
        }
        tracing::info!(day_id = id, "deleted day");
        Ok(())
    }
}
