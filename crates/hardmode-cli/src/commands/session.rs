//! Legacy session commands.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use hardmode_core::{NewSession, Store};
use serde_json::Value;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// List sessions, latest first
    List {
        /// Only sessions of this task
        #[arg(long)]
        task: Option<i64>,
    },
    /// Record a session against a task
    Create {
        /// Task ID
        task_id: i64,
        /// Duration in minutes
        #[arg(long, default_value = "25")]
        duration: i64,
        /// The session ran to completion
        #[arg(long)]
        completed: bool,
        /// Start time (RFC3339, default: now)
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// End time (RFC3339)
        #[arg(long)]
        end: Option<DateTime<Utc>>,
    },
}

pub fn run(action: SessionAction) -> CmdResult {
    let store = open_store()?;
    print_json(&execute(&store, action)?)
}

fn execute(store: &Store, action: SessionAction) -> CmdResult<Value> {
    let sessions = store.sessions();
    let out = match action {
        SessionAction::List { task } => serde_json::to_value(sessions.list(task)?)?,
        SessionAction::Create {
            task_id,
            duration,
            completed,
            start,
            end,
        } => {
            let input = NewSession {
                task_id,
                start_time: start,
                end_time: end,
                duration,
                completed,
            };
            serde_json::to_value(sessions.create(&input)?)?
        }
    };
    Ok(out)
}
