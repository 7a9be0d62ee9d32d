use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hardmode", version, about = "Hardmode pomodoro planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Standalone task registry
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Day plans and reflections
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Tasks planned on a day
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Pomodoro ledger
    Pomo {
        #[command(subcommand)]
        action: commands::pomo::PomoAction,
    },
    /// Legacy task sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Session statistics, or a day summary with --day
    Stats(commands::stats::StatsArgs),
    /// Estimate when the remaining pomodoros will be done
    Eta(commands::eta::EtaArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Day { action } => commands::day::run(action),
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Pomo { action } => commands::pomo::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Eta(args) => commands::eta::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_subcommands() {
        let cli = Cli::try_parse_from(["hardmode", "plan", "add", "3", "Deep work", "--pomodoros", "2"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Plan {
                action: commands::plan::PlanAction::Add { day_id: 3, pomodoros: 2, .. }
            }
        ));

        let cli = Cli::try_parse_from(["hardmode", "stats", "--day", "7"]).unwrap();
        assert!(matches!(cli.command, Commands::Stats(args) if args.day == Some(7)));
    }

    #[test]
    fn rejects_non_numeric_ids() {
        assert!(Cli::try_parse_from(["hardmode", "day", "delete", "abc"]).is_err());
    }

    #[test]
    fn clear_priority_excludes_priority() {
        let cli = Cli::try_parse_from(["hardmode", "plan", "update", "4", "--clear-priority"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Plan {
                action: commands::plan::PlanAction::Update { id: 4, clear_priority: true, priority: None, .. }
            }
        ));

        assert!(Cli::try_parse_from([
            "hardmode", "plan", "update", "4", "--priority", "2", "--clear-priority"
        ])
        .is_err());
    }
}
