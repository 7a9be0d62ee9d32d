use clap::Subcommand;
use hardmode_core::Config;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "server.port", "schedule.focus_duration")
        key: String,
    },
    /// Set a config value and save it
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// Print the whole configuration
    Show,
}

pub fn run(action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown or unset key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            print_json(&config)?;
        }
    }
    Ok(())
}
