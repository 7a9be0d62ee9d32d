//! Task registry commands.

use chrono::Utc;
use clap::Subcommand;
use hardmode_core::{NewTask, Store, TaskUpdate};
use serde_json::{json, Value};

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks, newest first
    List,
    /// Create a task
    Create {
        /// Task name
        name: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Update a task; omitted fields keep their value
    Update {
        /// Task ID
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// Mark completed (true) or reopen (false)
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a task and its sessions
    Delete {
        /// Task ID
        id: i64,
    },
}

pub fn run(action: TaskAction) -> CmdResult {
    let store = open_store()?;
    print_json(&execute(&store, action)?)
}

fn execute(store: &Store, action: TaskAction) -> CmdResult<Value> {
    let tasks = store.tasks();
    let out = match action {
        TaskAction::List => serde_json::to_value(tasks.list()?)?,
        TaskAction::Create { name, description } => {
            serde_json::to_value(tasks.create(&NewTask { name, description })?)?
        }
        TaskAction::Update {
            id,
            name,
            description,
            completed,
        } => {
            let current = tasks.get(id)?;
            let is_completed = completed.unwrap_or(current.is_completed);
            let completed_at = match completed {
                Some(true) if !current.is_completed => Some(Utc::now()),
                Some(false) => None,
                _ => current.completed_at,
            };
            let update = TaskUpdate {
                name: name.unwrap_or(current.name),
                description: description.unwrap_or(current.description),
                is_completed,
                completed_at,
            };
            serde_json::to_value(tasks.update(id, &update)?)?
        }
        TaskAction::Delete { id } => {
            tasks.delete(id)?;
            json!({ "deleted": id })
        }
    };
    Ok(out)
}
