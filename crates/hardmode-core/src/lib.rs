//! # Hardmode Core Library
//!
//! This library provides the core business logic for hardmode, a focused-work
//! tracker. Users plan a day, log every pomodoro they run (aborted or not),
//! and reflect on the day once it is over. The HTTP server and the CLI are
//! thin shells over the same core.
//!
//! ## Architecture
//!
//! - **Storage**: a single SQLite connection owned by [`Store`], plus
//!   TOML-based configuration
//! - **Task Registry**: standalone work items independent of any day
//! - **Day Planner**: one aggregate per calendar date with its planned tasks
//! - **Pomodoro Ledger**: append-only record of work intervals
//! - **Statistics**: summary metrics over legacy sessions and the ledger
//! - **Timer**: tick-driven focus/review/break state machine for one day
//!
//! ## Key Components
//!
//! - [`Store`]: Database handle and entry point to every component
//! - [`Config`]: Application configuration management
//! - [`CoreError`]: Error taxonomy shared by every operation

pub mod daily_task;
pub mod day;
pub mod error;
pub mod eta;
pub mod ledger;
pub mod session;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use daily_task::{DailyTask, DailyTaskUpdate, DailyTasks, NewDailyTask};
pub use day::{Day, DayPlanner, DayUpsert, Reflection, UpsertOutcome};
pub use error::{ConfigError, CoreError, DatabaseError, ErrorKind, Result, ValidationError};
pub use eta::estimate_completion;
pub use ledger::{Ledger, LedgerFilter, NewPomodoro, PomodoroDetail};
pub use session::{NewSession, PomodoroSession, Sessions};
pub use stats::{DaySummary, Statistics, StatsAggregator};
pub use storage::{Config, ScheduleConfig, ServerConfig, Store};
pub use task::{NewTask, Task, TaskRegistry, TaskUpdate};
pub use timer::{DayTimer, ReviewOutcome, TimerEvent, TimerState};
