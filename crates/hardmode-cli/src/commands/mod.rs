pub mod config;
pub mod day;
pub mod eta;
pub mod plan;
pub mod pomo;
pub mod session;
pub mod stats;
pub mod task;

use hardmode_core::{Config, Store};
use serde::Serialize;

pub type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Open the store named by the config file and `DB_PATH`.
pub fn open_store() -> CmdResult<Store> {
    let mut server = Config::load_or_default().server;
    server.apply_env_overrides()?;
    Ok(Store::open(&server.database_path()?)?)
}

pub fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
