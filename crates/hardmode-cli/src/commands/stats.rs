use clap::Args;
use hardmode_core::Store;
use serde_json::Value;

use super::{open_store, print_json, CmdResult};

#[derive(Args)]
pub struct StatsArgs {
    /// Summarise one day instead of the legacy sessions
    #[arg(long)]
    pub day: Option<i64>,
}

pub fn run(args: StatsArgs) -> CmdResult {
    let store = open_store()?;
    print_json(&execute(&store, &args)?)
}

fn execute(store: &Store, args: &StatsArgs) -> CmdResult<Value> {
    let stats = store.stats();
    let out = match args.day {
        Some(day_id) => serde_json::to_value(stats.day_summary(day_id)?)?,
        None => serde_json::to_value(stats.compute()?)?,
    };
    Ok(out)
}
