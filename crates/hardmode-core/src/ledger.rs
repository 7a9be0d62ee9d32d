//! Pomodoro Ledger: every recorded work interval, aborted or not.
//!
//! The ledger is append-only. Overlapping or duplicate intervals are kept as
//! recorded; corrections are new entries. The `task` label is free text and
//! deliberately not tied to the task registry or the day plan.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::day::validate_date;
use crate::error::{is_foreign_key_violation, CoreError, Result, ValidationError};
use crate::storage::{format_datetime_opt, parse_datetime_fallback, parse_datetime_opt};

/// One recorded work interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroDetail {
    pub id: i64,
    pub day_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_sec: i64,
    pub aborted: bool,
    /// 1-5
    pub focus_score: Option<i32>,
    pub reason: String,
    pub note: String,
    pub task: String,
    pub context_switch: bool,
    pub pause_count: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPomodoro {
    pub day_id: i64,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_sec: i64,
    #[serde(default)]
    pub aborted: bool,
    #[serde(default)]
    pub focus_score: Option<i32>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub context_switch: bool,
    #[serde(default)]
    pub pause_count: i32,
}

/// Optional filters, combined with AND. Date bounds are inclusive and apply
/// to the date portion of the start time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerFilter {
    #[serde(default)]
    pub day_id: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl LedgerFilter {
    pub fn for_day(day_id: i64) -> Self {
        Self {
            day_id: Some(day_id),
            ..Default::default()
        }
    }
}

const POMO_COLUMNS: &str = "id, day_id, start_time, end_time, duration_sec, aborted, \
                            focus_score, reason, note, task, context_switch, pause_count";

fn row_to_pomodoro(row: &Row) -> Result<PomodoroDetail, rusqlite::Error> {
    Ok(PomodoroDetail {
        id: row.get(0)?,
        day_id: row.get(1)?,
        start_time: parse_datetime_fallback(&row.get::<_, String>(2)?),
        end_time: parse_datetime_opt(row.get(3)?),
        duration_sec: row.get(4)?,
        aborted: row.get(5)?,
        focus_score: row.get(6)?,
        reason: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        note: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        task: row.get(9)?,
        context_switch: row.get(10)?,
        pause_count: row.get(11)?,
    })
}

fn validate(input: &NewPomodoro) -> Result<(), ValidationError> {
    if let Some(score) = input.focus_score {
        ValidationError::check_range("focus_score", score.into(), 1, 5)?;
    }
    ValidationError::check_range("duration_sec", input.duration_sec, 0, i64::MAX)?;
    ValidationError::check_range("pause_count", input.pause_count.into(), 0, i64::MAX)?;
    Ok(())
}

/// Borrowed view over the `pomo` table.
pub struct Ledger<'a> {
    conn: &'a Connection,
}

impl<'a> Ledger<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Record a new interval. Never merges with existing entries.
    ///
    /// # Errors
    /// `Validation` for an out-of-range focus score, duration or pause
    /// count; `NotFound` if the day does not exist.
    pub fn append(&self, input: &NewPomodoro) -> Result<PomodoroDetail> {
        validate(input)?;

        self.conn
            .execute(
                "INSERT INTO pomo (day_id, start_time, end_time, duration_sec, aborted,
                                   focus_score, reason, note, task, context_switch, pause_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    input.day_id,
                    input.start_time.to_rfc3339(),
                    format_datetime_opt(input.end_time.as_ref()),
                    input.duration_sec,
                    input.aborted,
                    input.focus_score,
                    input.reason,
                    input.note,
                    input.task,
                    input.context_switch,
                    input.pause_count,
                ],
            )
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    CoreError::not_found("day", input.day_id)
                } else {
                    e.into()
                }
            })?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(
            pomo_id = id,
            day_id = input.day_id,
            aborted = input.aborted,
            "recorded pomodoro"
        );

        Ok(PomodoroDetail {
            id,
            day_id: input.day_id,
            start_time: input.start_time,
            end_time: input.end_time,
            duration_sec: input.duration_sec,
            aborted: input.aborted,
            focus_score: input.focus_score,
            reason: input.reason.clone(),
            note: input.note.clone(),
            task: input.task.clone(),
            context_switch: input.context_switch,
            pause_count: input.pause_count,
        })
    }

    pub fn get(&self, id: i64) -> Result<PomodoroDetail> {
        self.conn
            .query_row(
                &format!("SELECT {POMO_COLUMNS} FROM pomo WHERE id = ?1"),
                params![id],
                row_to_pomodoro,
            )
            .optional()?
            .ok_or_else(|| CoreError::not_found("pomodoro", id))
    }

    /// Entries matching every given filter, latest start first.
    pub fn query(&self, filter: &LedgerFilter) -> Result<Vec<PomodoroDetail>> {
        let mut sql = format!("SELECT {POMO_COLUMNS} FROM pomo WHERE 1=1");
        let mut args: Vec<Value> = Vec::new();

        if let Some(day_id) = filter.day_id {
            args.push(Value::Integer(day_id));
            sql.push_str(&format!(" AND day_id = ?{}", args.len()));
        }
        if let Some(start) = filter.start_date.as_deref() {
            validate_date(start)?;
            args.push(Value::Text(start.to_string()));
            sql.push_str(&format!(" AND date(start_time) >= ?{}", args.len()));
        }
        if let Some(end) = filter.end_date.as_deref() {
            validate_date(end)?;
            args.push(Value::Text(end.to_string()));
            sql.push_str(&format!(" AND date(start_time) <= ?{}", args.len()));
        }
        sql.push_str(" ORDER BY start_time DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params_from_iter(args), row_to_pomodoro)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::DayUpsert;
    use crate::error::ErrorKind;
    use crate::storage::Store;
    use chrono::TimeZone;

    fn add_day(store: &Store, date: &str) -> i64 {
        store
            .days()
            .upsert(&DayUpsert {
                date: date.to_string(),
                target_pomos: 8,
                ..Default::default()
            })
            .unwrap()
            .day
            .id
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn entry(day_id: i64, start: DateTime<Utc>) -> NewPomodoro {
        NewPomodoro {
            day_id,
            start_time: start,
            end_time: Some(start + chrono::Duration::minutes(25)),
            duration_sec: 1500,
            task: "Deep work".into(),
            ..Default::default()
        }
    }

    #[test]
    fn append_never_merges() {
        let store = Store::open_memory().unwrap();
        let day = add_day(&store, "2024-01-01");
        let start = at(2024, 1, 1, 9);

        let a = store.ledger().append(&entry(day, start)).unwrap();
        let b = store.ledger().append(&entry(day, start)).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.ledger().query(&LedgerFilter::for_day(day)).unwrap().len(), 2);
    }

    #[test]
    fn append_keeps_annotations() {
        let store = Store::open_memory().unwrap();
        let day = add_day(&store, "2024-01-01");
        let recorded = store
            .ledger()
            .append(&NewPomodoro {
                aborted: true,
                focus_score: Some(2),
                reason: "interruption".into(),
                note: "phone call".into(),
                context_switch: true,
                pause_count: 3,
                ..entry(day, at(2024, 1, 1, 10))
            })
            .unwrap();

        let stored = store.ledger().get(recorded.id).unwrap();
        assert_eq!(stored, recorded);
    }

    #[test]
    fn append_validates_input() {
        let store = Store::open_memory().unwrap();
        let day = add_day(&store, "2024-01-01");

        let bad_score = NewPomodoro {
            focus_score: Some(0),
            ..entry(day, at(2024, 1, 1, 9))
        };
        assert_eq!(
            store.ledger().append(&bad_score).unwrap_err().kind(),
            ErrorKind::BadRequest
        );

        let bad_duration = NewPomodoro {
            duration_sec: -1,
            ..entry(day, at(2024, 1, 1, 9))
        };
        assert_eq!(
            store.ledger().append(&bad_duration).unwrap_err().kind(),
            ErrorKind::BadRequest
        );

        assert_eq!(
            store
                .ledger()
                .append(&entry(day + 10, at(2024, 1, 1, 9)))
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn query_filters_combine() {
        let store = Store::open_memory().unwrap();
        let d1 = add_day(&store, "2024-01-01");
        let d2 = add_day(&store, "2024-01-02");
        let d3 = add_day(&store, "2024-01-05");

        store.ledger().append(&entry(d1, at(2024, 1, 1, 9))).unwrap();
        store.ledger().append(&entry(d1, at(2024, 1, 1, 14))).unwrap();
        store.ledger().append(&entry(d2, at(2024, 1, 2, 9))).unwrap();
        store.ledger().append(&entry(d3, at(2024, 1, 5, 23))).unwrap();

        let all = store.ledger().query(&LedgerFilter::default()).unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.windows(2).all(|w| w[0].start_time >= w[1].start_time));

        let day_one = store.ledger().query(&LedgerFilter::for_day(d1)).unwrap();
        assert_eq!(day_one.len(), 2);
        assert!(day_one.iter().all(|p| p.day_id == d1));
        assert_eq!(day_one[0].start_time, at(2024, 1, 1, 14));

        let range = LedgerFilter {
            start_date: Some("2024-01-02".into()),
            end_date: Some("2024-01-05".into()),
            ..Default::default()
        };
        let in_range = store.ledger().query(&range).unwrap();
        assert_eq!(in_range.len(), 2);

        let combined = LedgerFilter {
            day_id: Some(d1),
            ..range.clone()
        };
        assert!(store.ledger().query(&combined).unwrap().is_empty());

        let open_ended = LedgerFilter {
            end_date: Some("2024-01-01".into()),
            ..Default::default()
        };
        assert_eq!(store.ledger().query(&open_ended).unwrap().len(), 2);
    }

    #[test]
    fn query_without_matches_is_empty() {
        let store = Store::open_memory().unwrap();
        assert!(store.ledger().query(&LedgerFilter::for_day(7)).unwrap().is_empty());
    }

    #[test]
    fn query_rejects_malformed_dates() {
        let store = Store::open_memory().unwrap();
        let filter = LedgerFilter {
            start_date: Some("yesterday".into()),
            ..Default::default()
        };
        assert_eq!(
            store.ledger().query(&filter).unwrap_err().kind(),
            ErrorKind::BadRequest
        );
    }
}
