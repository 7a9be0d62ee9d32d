//! Daily Task Manager: the tasks planned for one day.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::{is_foreign_key_violation, is_unique_violation, CoreError, Result};
use crate::storage::{format_datetime_opt, parse_datetime_fallback, parse_datetime_opt};

/// A task planned for a specific day. Names are unique within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTask {
    pub id: i64,
    pub day_id: i64,
    pub task_name: String,
    pub planned_pomodoros: i32,
    pub planned_at: Option<DateTime<Utc>>,
    /// Lower sorts first; `None` sorts after every explicit priority.
    pub plan_priority: Option<i32>,
    pub pomodoros_spent: i32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub added_mid_day: bool,
    pub reason_added: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDailyTask {
    pub task_name: String,
    #[serde(default)]
    pub planned_pomodoros: i32,
    #[serde(default)]
    pub planned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub plan_priority: Option<i32>,
    #[serde(default)]
    pub added_mid_day: bool,
    #[serde(default)]
    pub reason_added: String,
}

/// Full replacement of a daily task's mutable fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyTaskUpdate {
    pub task_name: String,
    #[serde(default)]
    pub planned_pomodoros: i32,
    #[serde(default)]
    pub planned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub plan_priority: Option<i32>,
    #[serde(default)]
    pub pomodoros_spent: i32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub added_mid_day: bool,
    #[serde(default)]
    pub reason_added: String,
}

const DAILY_TASK_COLUMNS: &str = "id, day_id, task_name, planned_pomodoros, planned_at, \
                                  plan_priority, pomodoros_spent, completed, created_at, \
                                  completed_at, added_mid_day, reason_added";

fn row_to_daily_task(row: &Row) -> Result<DailyTask, rusqlite::Error> {
    Ok(DailyTask {
        id: row.get(0)?,
        day_id: row.get(1)?,
        task_name: row.get(2)?,
        planned_pomodoros: row.get(3)?,
        planned_at: parse_datetime_opt(row.get(4)?),
        plan_priority: row.get(5)?,
        pomodoros_spent: row.get(6)?,
        completed: row.get(7)?,
        created_at: parse_datetime_fallback(&row.get::<_, String>(8)?),
        completed_at: parse_datetime_opt(row.get(9)?),
        added_mid_day: row.get(10)?,
        reason_added: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
    })
}

fn duplicate_name(task_name: &str) -> CoreError {
    CoreError::Conflict(format!("task '{task_name}' is already planned for this day"))
}

/// Borrowed view over the `daily_tasks` table.
pub struct DailyTasks<'a> {
    conn: &'a Connection,
}

impl<'a> DailyTasks<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Tasks for `day_id` by ascending priority, unprioritized last, then id.
    pub fn list(&self, day_id: i64) -> Result<Vec<DailyTask>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DAILY_TASK_COLUMNS} FROM daily_tasks
             WHERE day_id = ?1
             ORDER BY plan_priority IS NULL, plan_priority, id"
        ))?;
        let tasks = stmt
            .query_map(params![day_id], row_to_daily_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn get(&self, id: i64) -> Result<DailyTask> {
        self.conn
            .query_row(
                &format!("SELECT {DAILY_TASK_COLUMNS} FROM daily_tasks WHERE id = ?1"),
                params![id],
                row_to_daily_task,
            )
            .optional()?
            .ok_or_else(|| CoreError::not_found("daily task", id))
    }

    /// Plan a task for `day_id` with nothing spent and nothing completed.
    ///
    /// # Errors
    /// `Conflict` if the day already has a task with this name, `NotFound`
    /// if the day does not exist.
    pub fn create(&self, day_id: i64, input: &NewDailyTask) -> Result<DailyTask> {
        let created_at = Utc::now();
        self.conn
            .execute(
                "INSERT INTO daily_tasks (day_id, task_name, planned_pomodoros, planned_at,
                                          plan_priority, pomodoros_spent, completed, created_at,
                                          added_mid_day, reason_added)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6, ?7, ?8)",
                params![
                    day_id,
                    input.task_name,
                    input.planned_pomodoros,
                    format_datetime_opt(input.planned_at.as_ref()),
                    input.plan_priority,
                    created_at.to_rfc3339(),
                    input.added_mid_day,
                    input.reason_added,
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    duplicate_name(&input.task_name)
                } else if is_foreign_key_violation(&e) {
                    CoreError::not_found("day", day_id)
                } else {
                    e.into()
                }
            })?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(daily_task_id = id, day_id, mid_day = input.added_mid_day, "planned task");

        Ok(DailyTask {
            id,
            day_id,
            task_name: input.task_name.clone(),
            planned_pomodoros: input.planned_pomodoros,
            planned_at: input.planned_at,
            plan_priority: input.plan_priority,
            pomodoros_spent: 0,
            completed: false,
            created_at,
            completed_at: None,
            added_mid_day: input.added_mid_day,
            reason_added: input.reason_added.clone(),
        })
    }

    /// Replace every mutable field.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `Conflict` when renaming onto a name
    /// already planned for the same day.
    pub fn update(&self, id: i64, update: &DailyTaskUpdate) -> Result<DailyTask> {
        let changed = self
            .conn
            .execute(
                "UPDATE daily_tasks
                 SET task_name = ?1, planned_pomodoros = ?2, planned_at = ?3, plan_priority = ?4,
                     pomodoros_spent = ?5, completed = ?6, completed_at = ?7,
                     added_mid_day = ?8, reason_added = ?9
                 WHERE id = ?10",
                params![
                    update.task_name,
                    update.planned_pomodoros,
                    format_datetime_opt(update.planned_at.as_ref()),
                    update.plan_priority,
                    update.pomodoros_spent,
                    update.completed,
                    format_datetime_opt(update.completed_at.as_ref()),
                    update.added_mid_day,
                    update.reason_added,
                    id,
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    duplicate_name(&update.task_name)
                } else {
                    e.into()
                }
            })?;
        if changed == 0 {
            return Err(CoreError::not_found("daily task", id));
        }
        tracing::debug!(daily_task_id = id, completed = update.completed, "updated planned task");
        self.get(id)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM daily_tasks WHERE id = ?1", params![id])?;
        tracing::debug!(daily_task_id = id, removed, "deleted planned task");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::DayUpsert;
    use crate::error::ErrorKind;
    use crate::storage::Store;
    use proptest::prelude::*;

    fn store_with_day() -> (Store, i64) {
        let store = Store::open_memory().unwrap();
        let day = store
            .days()
            .upsert(&DayUpsert {
                date: "2024-01-01".into(),
                target_pomos: 8,
                ..Default::default()
            })
            .unwrap()
            .day;
        (store, day.id)
    }

    fn planned(name: &str, priority: Option<i32>) -> NewDailyTask {
        NewDailyTask {
            task_name: name.to_string(),
            planned_pomodoros: 2,
            plan_priority: priority,
            ..Default::default()
        }
    }

    #[test]
    fn create_starts_fresh() {
        let (store, day_id) = store_with_day();
        let task = store
            .daily_tasks()
            .create(day_id, &NewDailyTask {
                added_mid_day: true,
                reason_added: "urgent bug".into(),
                ..planned("Fix login", Some(1))
            })
            .unwrap();

        assert_eq!(task.pomodoros_spent, 0);
        assert!(!task.completed);
        assert!(task.completed_at.is_none());

        let stored = store.daily_tasks().get(task.id).unwrap();
        assert_eq!(stored.task_name, "Fix login");
        assert!(stored.added_mid_day);
        assert_eq!(stored.reason_added, "urgent bug");
        assert_eq!(stored.plan_priority, Some(1));
    }

    #[test]
    fn duplicate_name_conflicts() {
        let (store, day_id) = store_with_day();
        store.daily_tasks().create(day_id, &planned("Write", None)).unwrap();
        let err = store
            .daily_tasks()
            .create(day_id, &planned("Write", Some(3)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn same_name_on_another_day_is_fine() {
        let (store, day_id) = store_with_day();
        let other = store
            .days()
            .upsert(&DayUpsert {
                date: "2024-01-02".into(),
                ..Default::default()
            })
            .unwrap()
            .day;
        store.daily_tasks().create(day_id, &planned("Write", None)).unwrap();
        store.daily_tasks().create(other.id, &planned("Write", None)).unwrap();
    }

    #[test]
    fn create_for_missing_day_is_not_found() {
        let store = Store::open_memory().unwrap();
        let err = store
            .daily_tasks()
            .create(99, &planned("Orphan", None))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn list_orders_by_priority_then_id() {
        let (store, day_id) = store_with_day();
        let none_a = store.daily_tasks().create(day_id, &planned("a", None)).unwrap();
        let p2 = store.daily_tasks().create(day_id, &planned("b", Some(2))).unwrap();
        let p1 = store.daily_tasks().create(day_id, &planned("c", Some(1))).unwrap();
        let none_b = store.daily_tasks().create(day_id, &planned("d", None)).unwrap();
        let p2_late = store.daily_tasks().create(day_id, &planned("e", Some(2))).unwrap();
        let p1000 = store.daily_tasks().create(day_id, &planned("f", Some(1000))).unwrap();

        let ids: Vec<i64> = store
            .daily_tasks()
            .list(day_id)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(
            ids,
            vec![p1.id, p2.id, p2_late.id, p1000.id, none_a.id, none_b.id]
        );
    }

    #[test]
    fn update_replaces_all_fields() {
        let (store, day_id) = store_with_day();
        let task = store.daily_tasks().create(day_id, &planned("Write", Some(1))).unwrap();
        let done_at = Utc::now();

        let updated = store
            .daily_tasks()
            .update(task.id, &DailyTaskUpdate {
                task_name: "Write docs".into(),
                planned_pomodoros: 3,
                pomodoros_spent: 3,
                completed: true,
                completed_at: Some(done_at),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.task_name, "Write docs");
        assert_eq!(updated.pomodoros_spent, 3);
        assert!(updated.completed);
        assert!(updated.completed_at.is_some());
        assert_eq!(updated.plan_priority, None);
        assert_eq!(updated.created_at, task.created_at);
    }

    #[test]
    fn update_errors() {
        let (store, day_id) = store_with_day();
        store.daily_tasks().create(day_id, &planned("a", None)).unwrap();
        let b = store.daily_tasks().create(day_id, &planned("b", None)).unwrap();

        let rename = DailyTaskUpdate {
            task_name: "a".into(),
            ..Default::default()
        };
        assert_eq!(
            store.daily_tasks().update(b.id, &rename).unwrap_err().kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            store.daily_tasks().update(b.id + 50, &rename).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn delete_removes_only_that_task() {
        let (store, day_id) = store_with_day();
        let a = store.daily_tasks().create(day_id, &planned("a", None)).unwrap();
        store.daily_tasks().create(day_id, &planned("b", None)).unwrap();
        store.daily_tasks().delete(a.id).unwrap();

        let remaining = store.daily_tasks().list(day_id).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].task_name, "b");
    }

    proptest! {
        #[test]
        fn listing_respects_priority_order(
            priorities in proptest::collection::vec(proptest::option::of(-5i32..2000), 0..12),
        ) {
            let (store, day_id) = store_with_day();
            for (i, priority) in priorities.iter().enumerate() {
                store
                    .daily_tasks()
                    .create(day_id, &planned(&format!("task-{i}"), *priority))
                    .unwrap();
            }

            let listed = store.daily_tasks().list(day_id).unwrap();
            prop_assert_eq!(listed.len(), priorities.len());
            for pair in listed.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                match (a.plan_priority, b.plan_priority) {
                    (Some(pa), Some(pb)) => {
                        prop_assert!(pa < pb || (pa == pb && a.id < b.id));
                    }
                    (Some(_), None) => {}
                    (None, Some(_)) => prop_assert!(false, "unprioritized task listed first"),
                    (None, None) => prop_assert!(a.id < b.id),
                }
            }
        }
    }
}
