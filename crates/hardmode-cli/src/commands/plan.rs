//! Daily task commands: what is planned on a day.

use chrono::Utc;
use clap::Subcommand;
use hardmode_core::{DailyTaskUpdate, NewDailyTask, Store};
use serde_json::{json, Value};

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum PlanAction {
    /// List the tasks planned on a day, by priority
    List {
        /// Day ID
        day_id: i64,
    },
    /// Plan a task on a day
    Add {
        /// Day ID
        day_id: i64,
        /// Task name, unique within the day
        task_name: String,
        /// Planned pomodoros
        #[arg(long, default_value = "1")]
        pomodoros: i32,
        /// Priority; lower comes first
        #[arg(long)]
        priority: Option<i32>,
        /// Mark as added after the day started
        #[arg(long)]
        mid_day: bool,
        /// Why it was added
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Update a planned task; omitted fields keep their value
    Update {
        /// Daily task ID
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// Planned pomodoros
        #[arg(long)]
        pomodoros: Option<i32>,
        /// Priority
        #[arg(long)]
        priority: Option<i32>,
        /// Drop the priority so the task sorts last
        #[arg(long, conflicts_with = "priority")]
        clear_priority: bool,
        /// Pomodoros spent so far
        #[arg(long)]
        spent: Option<i32>,
        /// Completion state
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Remove a planned task
    Delete {
        /// Daily task ID
        id: i64,
    },
}

pub fn run(action: PlanAction) -> CmdResult {
    let store = open_store()?;
    print_json(&execute(&store, action)?)
}

fn execute(store: &Store, action: PlanAction) -> CmdResult<Value> {
    let plan = store.daily_tasks();
    let out = match action {
        PlanAction::List { day_id } => serde_json::to_value(plan.list(day_id)?)?,
        PlanAction::Add {
            day_id,
            task_name,
            pomodoros,
            priority,
            mid_day,
            reason,
        } => {
            let input = NewDailyTask {
                task_name,
                planned_pomodoros: pomodoros,
                planned_at: Some(Utc::now()),
                plan_priority: priority,
                added_mid_day: mid_day,
                reason_added: reason,
            };
            serde_json::to_value(plan.create(day_id, &input)?)?
        }
        PlanAction::Update {
            id,
            name,
            pomodoros,
            priority,
            clear_priority,
            spent,
            completed,
        } => {
            let current = plan.get(id)?;
            let plan_priority = if clear_priority {
                None
            } else {
                priority.or(current.plan_priority)
            };
            let completed_at = match completed {
                Some(true) if !current.completed => Some(Utc::now()),
                Some(false) => None,
                _ => current.completed_at,
            };
            let update = DailyTaskUpdate {
                task_name: name.unwrap_or(current.task_name),
                planned_pomodoros: pomodoros.unwrap_or(current.planned_pomodoros),
                planned_at: current.planned_at,
                plan_priority,
                pomodoros_spent: spent.unwrap_or(current.pomodoros_spent),
                completed: completed.unwrap_or(current.completed),
                completed_at,
                added_mid_day: current.added_mid_day,
                reason_added: current.reason_added,
            };
            serde_json::to_value(plan.update(id, &update)?)?
        }
        PlanAction::Delete { id } => {
            plan.delete(id)?;
            json!({ "deleted": id })
        }
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hardmode_core::DayUpsert;

    fn add(day_id: i64, name: &str, priority: Option<i32>) -> PlanAction {
        PlanAction::Add {
            day_id,
            task_name: name.into(),
            pomodoros: 2,
            priority,
            mid_day: false,
            reason: String::new(),
        }
    }

    #[test]
    fn add_list_and_complete() {
        let store = Store::open_memory().unwrap();
        let day = store
            .days()
            .upsert(&DayUpsert {
                date: "2024-03-01".into(),
                ..Default::default()
            })
            .unwrap()
            .day;

        execute(&store, add(day.id, "later", None)).unwrap();
        let first = execute(&store, add(day.id, "first", Some(1))).unwrap();

        let list = execute(&store, PlanAction::List { day_id: day.id }).unwrap();
        assert_eq!(list[0]["task_name"], "first");
        assert_eq!(list[1]["task_name"], "later");

        let updated = execute(
            &store,
            PlanAction::Update {
                id: first["id"].as_i64().unwrap(),
                name: None,
                pomodoros: None,
                priority: None,
                clear_priority: false,
                spent: Some(2),
                completed: Some(true),
            },
        )
        .unwrap();
        assert_eq!(updated["task_name"], "first");
        assert_eq!(updated["plan_priority"], 1);
        assert_eq!(updated["pomodoros_spent"], 2);
        assert!(updated["completed_at"].is_string());
    }

    #[test]
    fn clear_priority_moves_task_last() {
        let store = Store::open_memory().unwrap();
        let day = store
            .days()
            .upsert(&DayUpsert {
                date: "2024-03-01".into(),
                ..Default::default()
            })
            .unwrap()
            .day;
        let urgent = execute(&store, add(day.id, "urgent", Some(1))).unwrap();
        execute(&store, add(day.id, "normal", Some(5))).unwrap();

        let cleared = execute(
            &store,
            PlanAction::Update {
                id: urgent["id"].as_i64().unwrap(),
                name: None,
                pomodoros: None,
                priority: None,
                clear_priority: true,
                spent: None,
                completed: None,
            },
        )
        .unwrap();
        assert!(cleared["plan_priority"].is_null());

        let list = execute(&store, PlanAction::List { day_id: day.id }).unwrap();
        assert_eq!(list[0]["task_name"], "normal");
        assert_eq!(list[1]["task_name"], "urgent");
    }

    #[test]
    fn duplicate_name_fails() {
        let store = Store::open_memory().unwrap();
        let day = store
            .days()
            .upsert(&DayUpsert {
                date: "2024-03-01".into(),
                ..Default::default()
            })
            .unwrap()
            .day;
        execute(&store, add(day.id, "same", None)).unwrap();
        assert!(execute(&store, add(day.id, "same", None)).is_err());
    }
}
