//! Statistics Aggregator.
//!
//! [`StatsAggregator::compute`] reads raw sums over the legacy session table
//! and the task registry. [`StatsAggregator::day_summary`] is the day-level
//! view built from the ledger and the day plan.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Summary over legacy sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Statistics {
    pub total_sessions: i64,
    pub completed_sessions: i64,
    pub total_minutes: i64,
    pub tasks_completed: i64,
    /// `total_minutes / completed_sessions`, or 0.0 with no completed sessions.
    pub average_focus_time: f64,
}

/// Ledger- and plan-based view of one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub day_id: i64,
    pub date: String,
    pub target_pomos: i32,
    pub finished_pomos: i32,
    pub completed_pomodoros: i64,
    pub aborted_pomodoros: i64,
    /// Seconds across non-aborted intervals.
    pub focus_seconds: i64,
    /// Mean over scored intervals; `None` when nothing was scored.
    pub average_focus_score: Option<f64>,
    pub context_switches: i64,
    pub total_pauses: i64,
    pub planned_tasks: i64,
    pub completed_tasks: i64,
    pub planned_pomodoros: i64,
    pub pomodoros_spent: i64,
    pub mid_day_additions: i64,
}

pub struct StatsAggregator<'a> {
    conn: &'a Connection,
}

impl<'a> StatsAggregator<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn compute(&self) -> Result<Statistics> {
        let (total_sessions, completed_sessions, total_minutes): (i64, i64, i64) =
            self.conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(CASE WHEN completed = 1 THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(duration), 0)
                 FROM pomodoro_sessions",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

        let tasks_completed: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE is_completed = 1",
            [],
            |row| row.get(0),
        )?;

        let average_focus_time = if completed_sessions > 0 {
            total_minutes as f64 / completed_sessions as f64
        } else {
            0.0
        };

        Ok(Statistics {
            total_sessions,
            completed_sessions,
            total_minutes,
            tasks_completed,
            average_focus_time,
        })
    }

    /// # Errors
    /// `NotFound` if the day does not exist.
    pub fn day_summary(&self, day_id: i64) -> Result<DaySummary> {
        let day = crate::day::DayPlanner::new(self.conn).get_by_id(day_id)?;

        let (completed, aborted, focus_seconds, avg_score, switches, pauses): (
            i64,
            i64,
            i64,
            Option<f64>,
            i64,
            i64,
        ) = self.conn.query_row(
            "SELECT COALESCE(SUM(CASE WHEN aborted = 0 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN aborted = 1 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN aborted = 0 THEN duration_sec ELSE 0 END), 0),
                    AVG(focus_score),
                    COALESCE(SUM(context_switch), 0),
                    COALESCE(SUM(pause_count), 0)
             FROM pomo WHERE day_id = ?1",
            params![day_id],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            },
        )?;

        let (planned_tasks, completed_tasks, planned_pomodoros, pomodoros_spent, mid_day): (
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(completed), 0),
                    COALESCE(SUM(planned_pomodoros), 0),
                    COALESCE(SUM(pomodoros_spent), 0),
                    COALESCE(SUM(added_mid_day), 0)
             FROM daily_tasks WHERE day_id = ?1",
            params![day_id],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        )?;

        Ok(DaySummary {
            day_id,
            date: day.date,
            target_pomos: day.target_pomos,
            finished_pomos: day.finished_pomos,
            completed_pomodoros: completed,
            aborted_pomodoros: aborted,
            focus_seconds,
            average_focus_score: avg_score,
            context_switches: switches,
            total_pauses: pauses,
            planned_tasks,
            completed_tasks,
            planned_pomodoros,
            pomodoros_spent,
            mid_day_additions: mid_day,
        })
    }
}
