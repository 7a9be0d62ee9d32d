//! Day planner commands.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use hardmode_core::{DayUpsert, Reflection, Store};
use serde_json::{json, Value};

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum DayAction {
    /// Show the day for a date
    Get {
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// Create or replace the plan for a date
    Upsert {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Target pomodoros
        #[arg(long, default_value = "0")]
        target: i32,
        /// Finished pomodoros
        #[arg(long, default_value = "0")]
        finished: i32,
        /// Day start (RFC3339)
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// Day end (RFC3339), applied to existing days only
        #[arg(long)]
        end: Option<DateTime<Utc>>,
        /// Free-form comment
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Record the end-of-day reflection
    Reflect {
        /// Day ID
        id: i64,
        /// Rating from 1 to 5
        #[arg(long)]
        rating: Option<i32>,
        /// Main distraction
        #[arg(long, default_value = "")]
        distraction: String,
        /// Notes
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Delete a day with its plan and pomodoros
    Delete {
        /// Day ID
        id: i64,
    },
    /// Aggregate ledger and plan figures for a day
    Summary {
        /// Day ID
        id: i64,
    },
}

pub fn run(action: DayAction) -> CmdResult {
    let store = open_store()?;
    print_json(&execute(&store, action)?)
}

fn execute(store: &Store, action: DayAction) -> CmdResult<Value> {
    let days = store.days();
    let out = match action {
        DayAction::Get { date } => serde_json::to_value(days.get(&date)?)?,
        DayAction::Upsert {
            date,
            target,
            finished,
            start,
            end,
            comment,
        } => {
            let outcome = days.upsert(&DayUpsert {
                date,
                target_pomos: target,
                finished_pomos: finished,
                start_time: start,
                end_time: end,
                comment,
            })?;
            json!({ "created": outcome.created, "day": outcome.day })
        }
        DayAction::Reflect {
            id,
            rating,
            distraction,
            notes,
        } => {
            let day = days.update_reflection(
                id,
                &Reflection {
                    day_rating: rating,
                    main_distraction: distraction,
                    reflection_notes: notes,
                },
            )?;
            serde_json::to_value(day)?
        }
        DayAction::Delete { id } => {
            days.delete(id)?;
            json!({ "deleted": id })
        }
        DayAction::Summary { id } => serde_json::to_value(store.stats().day_summary(id)?)?,
    };
    Ok(out)
}
