//! SQLite-backed store for every hardmode entity.
//!
//! Provides persistent storage for:
//! - Standalone tasks and their legacy pomodoro sessions
//! - Days with their planned tasks and recorded pomodoros
//!
//! A [`Store`] owns exactly one connection. Components are borrowed views
//! over it, so each caller (a test, a CLI command, the server) constructs its
//! own isolated instance instead of sharing a hidden global.

use std::path::Path;

use rusqlite::Connection;

use super::data_dir;
use super::migrations;
use crate::daily_task::DailyTasks;
use crate::day::DayPlanner;
use crate::error::{DatabaseError, Result};
use crate::ledger::Ledger;
use crate::session::Sessions;
use crate::stats::StatsAggregator;
use crate::task::TaskRegistry;

/// File name of the default database inside the data directory.
pub const DB_FILE_NAME: &str = "hardmode.db";

/// SQLite database handle.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::from_connection(conn)
    }

    /// Open the database at `~/.config/hardmode/hardmode.db`.
    pub fn open_default() -> Result<Self> {
        let path = data_dir()?.join(DB_FILE_NAME);
        Self::open(path)
    }

    /// Open an isolated in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self { conn };
        store
            .migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        // Base tables (v1 schema)
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                name         TEXT NOT NULL,
                description  TEXT,
                created_at   TEXT NOT NULL,
                completed_at TEXT,
                is_completed INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS day (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                date             TEXT NOT NULL UNIQUE,
                target_pomos     INTEGER NOT NULL,
                finished_pomos   INTEGER NOT NULL DEFAULT 0,
                start_time       TEXT,
                end_time         TEXT,
                comment          TEXT,
                day_rating       INTEGER CHECK(day_rating BETWEEN 1 AND 5),
                main_distraction TEXT,
                reflection_notes TEXT
            );

            CREATE TABLE IF NOT EXISTS daily_tasks (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                day_id            INTEGER NOT NULL,
                task_name         TEXT NOT NULL,
                planned_pomodoros INTEGER NOT NULL DEFAULT 0,
                planned_at        TEXT,
                plan_priority     INTEGER,
                pomodoros_spent   INTEGER NOT NULL DEFAULT 0,
                completed         INTEGER NOT NULL DEFAULT 0,
                created_at        TEXT NOT NULL,
                completed_at      TEXT,
                added_mid_day     INTEGER NOT NULL DEFAULT 0,
                reason_added      TEXT,
                FOREIGN KEY (day_id) REFERENCES day(id) ON DELETE CASCADE,
                UNIQUE(day_id, task_name)
            );

            CREATE TABLE IF NOT EXISTS pomo (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                day_id         INTEGER NOT NULL,
                start_time     TEXT NOT NULL,
                end_time       TEXT,
                duration_sec   INTEGER NOT NULL,
                aborted        INTEGER NOT NULL DEFAULT 0,
                focus_score    INTEGER CHECK(focus_score BETWEEN 1 AND 5),
                reason         TEXT,
                note           TEXT,
                task           TEXT NOT NULL,
                context_switch INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (day_id) REFERENCES day(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS pomodoro_sessions (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id    INTEGER NOT NULL,
                start_time TEXT NOT NULL,
                end_time   TEXT,
                duration   INTEGER NOT NULL,
                completed  INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_pomo_day ON pomo(day_id);
            CREATE INDEX IF NOT EXISTS idx_pomo_start ON pomo(start_time);
            CREATE INDEX IF NOT EXISTS idx_daily_tasks_day ON daily_tasks(day_id);
            CREATE INDEX IF NOT EXISTS idx_daily_tasks_planning
                ON daily_tasks(day_id, planned_at, added_mid_day);
            CREATE INDEX IF NOT EXISTS idx_sessions_task ON pomodoro_sessions(task_id);",
        )?;

        // Incremental migrations (v1 -> v2, etc.)
        migrations::migrate(&self.conn)
    }

    /// Standalone task registry.
    pub fn tasks(&self) -> TaskRegistry<'_> {
        TaskRegistry::new(&self.conn)
    }

    /// Day aggregates keyed by calendar date.
    pub fn days(&self) -> DayPlanner<'_> {
        DayPlanner::new(&self.conn)
    }

    /// Tasks planned for a specific day.
    pub fn daily_tasks(&self) -> DailyTasks<'_> {
        DailyTasks::new(&self.conn)
    }

    /// Recorded pomodoro intervals.
    pub fn ledger(&self) -> Ledger<'_> {
        Ledger::new(&self.conn)
    }

    /// Legacy task-scoped sessions.
    pub fn sessions(&self) -> Sessions<'_> {
        Sessions::new(&self.conn)
    }

    /// Derived summary metrics.
    pub fn stats(&self) -> StatsAggregator<'_> {
        StatsAggregator::new(&self.conn)
    }
}
