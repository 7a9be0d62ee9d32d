//! Pomodoro ledger commands.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use hardmode_core::{LedgerFilter, NewPomodoro, Store};
use serde_json::Value;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum PomoAction {
    /// Record a focus interval
    Log {
        /// Day ID
        day_id: i64,
        /// Start time (RFC3339, default: now)
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// End time (RFC3339)
        #[arg(long)]
        end: Option<DateTime<Utc>>,
        /// Duration in seconds
        #[arg(long, default_value = "1500")]
        duration: i64,
        /// The interval was abandoned
        #[arg(long)]
        aborted: bool,
        /// Focus score from 1 to 5
        #[arg(long)]
        focus: Option<i32>,
        /// Abort reason
        #[arg(long, default_value = "")]
        reason: String,
        /// Note
        #[arg(long, default_value = "")]
        note: String,
        /// Task worked on
        #[arg(long, default_value = "")]
        task: String,
        /// The interval switched context
        #[arg(long)]
        context_switch: bool,
        /// Number of pauses
        #[arg(long, default_value = "0")]
        pauses: i32,
    },
    /// List intervals, latest first
    List {
        /// Only this day
        #[arg(long)]
        day: Option<i64>,
        /// From date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: Option<String>,
        /// To date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<String>,
    },
}

pub fn run(action: PomoAction) -> CmdResult {
    let store = open_store()?;
    print_json(&execute(&store, action)?)
}

fn execute(store: &Store, action: PomoAction) -> CmdResult<Value> {
    let ledger = store.ledger();
    let out = match action {
        PomoAction::Log {
            day_id,
            start,
            end,
            duration,
            aborted,
            focus,
            reason,
            note,
            task,
            context_switch,
            pauses,
        } => {
            let entry = NewPomodoro {
                day_id,
                start_time: start.unwrap_or_else(Utc::now),
                end_time: end,
                duration_sec: duration,
                aborted,
                focus_score: focus,
                reason,
                note,
                task,
                context_switch,
                pause_count: pauses,
            };
            serde_json::to_value(ledger.append(&entry)?)?
        }
        PomoAction::List { day, from, to } => {
            let filter = LedgerFilter {
                day_id: day,
                start_date: from,
                end_date: to,
            };
            serde_json::to_value(ledger.query(&filter)?)?
        }
    };
    Ok(out)
}
