//! Completion estimate for what is left of a day.

use chrono::{DateTime, Local, NaiveDate};
use clap::Args;
use hardmode_core::{estimate_completion, Config, ScheduleConfig, Store};
use serde_json::{json, Value};

use super::{open_store, print_json, CmdResult};

#[derive(Args)]
pub struct EtaArgs {
    /// Pomodoros left; defaults to target minus finished for --date
    #[arg(long)]
    pub remaining: Option<i64>,
    /// Day to read the target from (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Start of the estimate (RFC3339, default: now)
    #[arg(long)]
    pub from: Option<DateTime<Local>>,
}

pub fn run(args: EtaArgs) -> CmdResult {
    let schedule = Config::load_or_default().schedule;
    let remaining = match args.remaining {
        Some(n) => n,
        None => {
            let store = open_store()?;
            remaining_for(&store, args.date.unwrap_or_else(|| Local::now().date_naive()))?
        }
    };
    let start = args.from.unwrap_or_else(Local::now);
    print_json(&estimate(start, remaining, &schedule)?)
}

fn remaining_for(store: &Store, date: NaiveDate) -> CmdResult<i64> {
    let day = store.days().get(&date.format("%Y-%m-%d").to_string())?;
    Ok(i64::from(day.target_pomos - day.finished_pomos).max(0))
}

fn estimate(start: DateTime<Local>, remaining: i64, schedule: &ScheduleConfig) -> CmdResult<Value> {
    let eta = estimate_completion(start, remaining, schedule)
        .ok_or_else(|| format!("{remaining} pomodoros end beyond any representable date"))?;
    Ok(json!({
        "remaining": remaining.max(0),
        "start": start.to_rfc3339(),
        "eta": eta.to_rfc3339(),
        "minutes": (eta - start).num_minutes(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hardmode_core::DayUpsert;

    #[test]
    fn remaining_comes_from_day_plan() {
        let store = Store::open_memory().unwrap();
        store
            .days()
            .upsert(&DayUpsert {
                date: "2024-03-01".into(),
                target_pomos: 8,
                finished_pomos: 3,
                ..Default::default()
            })
            .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(remaining_for(&store, date).unwrap(), 5);
        assert!(remaining_for(&store, date.succ_opt().unwrap()).is_err());
    }

    #[test]
    fn estimate_reports_minutes() {
        let out = estimate(Local::now(), 2, &ScheduleConfig::default()).unwrap();
        assert_eq!(out["remaining"], 2);
        assert_eq!(out["minutes"], 60);
    }

    #[test]
    fn huge_remaining_is_an_error() {
        let result = estimate(Local::now(), 1_000_000_000_000, &ScheduleConfig::default());
        assert!(result.is_err());
    }
}
