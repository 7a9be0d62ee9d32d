//! Task Registry: standalone work items that live outside any day.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::storage::{format_datetime_opt, parse_datetime_fallback, parse_datetime_opt};

/// An independent work item with completion tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_completed: bool,
}

/// Fields accepted when creating a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Full replacement of a task's mutable fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

const TASK_COLUMNS: &str = "id, name, description, created_at, completed_at, is_completed";

fn row_to_task(row: &Row) -> Result<Task, rusqlite::Error> {
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        created_at: parse_datetime_fallback(&row.get::<_, String>(3)?),
        completed_at: parse_datetime_opt(row.get(4)?),
        is_completed: row.get(5)?,
    })
}

/// Borrowed view over the `tasks` table.
pub struct TaskRegistry<'a> {
    conn: &'a Connection,
}

impl<'a> TaskRegistry<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All tasks, newest first.
    pub fn list(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC"
        ))?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn get(&self, id: i64) -> Result<Task> {
        self.conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?
            .ok_or_else(|| CoreError::not_found("task", id))
    }

    /// Insert a task. The name is stored as given, empty or not.
    pub fn create(&self, input: &NewTask) -> Result<Task> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO tasks (name, description, created_at, completed_at, is_completed)
             VALUES (?1, ?2, ?3, NULL, 0)",
            params![input.name, input.description, created_at.to_rfc3339()],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(task_id = id, "created task");

        Ok(Task {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            created_at,
            completed_at: None,
            is_completed: false,
        })
    }

    /// Replace name, description and completion state.
    ///
    /// # Errors
    /// Returns `NotFound` if no task has this id.
    pub fn update(&self, id: i64, update: &TaskUpdate) -> Result<Task> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET name = ?1, description = ?2, is_completed = ?3, completed_at = ?4
             WHERE id = ?5",
            params![
                update.name,
                update.description,
                update.is_completed,
                format_datetime_opt(update.completed_at.as_ref()),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(CoreError::not_found("task", id));
        }
        tracing::debug!(task_id = id, completed = update.is_completed, "updated task");
        self.get(id)
    }

    /// Remove a task and its legacy sessions. Missing ids are not an error.
    ///
    /// The removed sessions no longer count towards
    /// [`StatsAggregator::compute`](crate::stats::StatsAggregator::compute).
    pub fn delete(&self, id: i64) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        tracing::debug!(task_id = id, removed, "deleted task");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::DayUpsert;
    use crate::error::ErrorKind;
    use crate::storage::Store;

    fn new_task(name: &str) -> NewTask {
        NewTask {
            name: name.to_string(),
            description: "details".to_string(),
        }
    }

    #[test]
    fn create_initializes_completion_state() {
        let store = Store::open_memory().unwrap();
        let before = Utc::now();
        let task = store.tasks().create(&new_task("Write spec")).unwrap();

        assert!(task.id > 0);
        assert!(!task.is_completed);
        assert!(task.completed_at.is_none());
        assert!(task.created_at >= before);
        assert_eq!(store.tasks().get(task.id).unwrap().name, "Write spec");
    }

    #[test]
    fn empty_name_is_accepted() {
        let store = Store::open_memory().unwrap();
        let task = store.tasks().create(&new_task("")).unwrap();
        assert_eq!(store.tasks().get(task.id).unwrap().name, "");
    }

    #[test]
    fn list_is_newest_first() {
        let store = Store::open_memory().unwrap();
        let first = store.tasks().create(&new_task("first")).unwrap();
        let second = store.tasks().create(&new_task("second")).unwrap();

        let ids: Vec<i64> = store.tasks().list().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn update_sets_and_clears_completion() {
        let store = Store::open_memory().unwrap();
        let task = store.tasks().create(&new_task("Write spec")).unwrap();
        let done_at = Utc::now();

        let updated = store
            .tasks()
            .update(
                task.id,
                &TaskUpdate {
                    name: "Write spec".into(),
                    description: "done".into(),
                    is_completed: true,
                    completed_at: Some(done_at),
                },
            )
            .unwrap();
        assert!(updated.is_completed);
        assert_eq!(
            updated.completed_at.map(|t| t.timestamp()),
            Some(done_at.timestamp())
        );
        assert_eq!(updated.created_at, store.tasks().get(task.id).unwrap().created_at);

        let reopened = store
            .tasks()
            .update(task.id, &TaskUpdate {
                name: "Write spec".into(),
                ..Default::default()
            })
            .unwrap();
        assert!(!reopened.is_completed);
        assert!(reopened.completed_at.is_none());
        assert_eq!(reopened.description, "");
    }

    #[test]
    fn update_missing_task_is_not_found() {
        let store = Store::open_memory().unwrap();
        let err = store.tasks().update(42, &TaskUpdate::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn delete_is_idempotent() {
        let store = Store::open_memory().unwrap();
        let task = store.tasks().create(&new_task("gone")).unwrap();
        store.tasks().delete(task.id).unwrap();
        store.tasks().delete(task.id).unwrap();
        assert_eq!(store.tasks().get(task.id).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn delete_leaves_days_and_daily_tasks_alone() {
        let store = Store::open_memory().unwrap();
        let task = store.tasks().create(&new_task("Write spec")).unwrap();
        let day = store
            .days()
            .upsert(&DayUpsert {
                date: "2024-01-01".into(),
                target_pomos: 8,
                ..Default::default()
            })
            .unwrap()
            .day;
        store
            .daily_tasks()
            .create(day.id, &crate::daily_task::NewDailyTask {
                task_name: "Write spec".into(),
                planned_pomodoros: 2,
                ..Default::default()
            })
            .unwrap();

        store.tasks().delete(task.id).unwrap();

        assert!(store.days().get("2024-01-01").is_ok());
        assert_eq!(store.daily_tasks().list(day.id).unwrap().len(), 1);
    }
}
