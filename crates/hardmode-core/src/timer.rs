//! Day timer state machine.
//!
//! The timer owns no threads: the caller drives it by calling
//! [`DayTimer::tick`] once per second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Planning -> Focus -> Review -> (ShortBreak | LongBreak) -> Focus ...
//! Planning | ShortBreak | LongBreak -> DayClosed
//! ```
//!
//! Every `pomodoros_before_long_break`-th reviewed pomodoro is followed by a
//! long break. A finished break restarts focus on the same task.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};
use crate::ledger::NewPomodoro;
use crate::storage::ScheduleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Planning,
    Focus,
    /// Focus time ran out; waiting for the score and notes.
    Review,
    ShortBreak,
    LongBreak,
    DayClosed,
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimerState::Idle => "idle",
            TimerState::Planning => "planning",
            TimerState::Focus => "focusing",
            TimerState::Review => "in review",
            TimerState::ShortBreak => "on a short break",
            TimerState::LongBreak => "on a long break",
            TimerState::DayClosed => "closed for the day",
        };
        f.write_str(label)
    }
}

/// Notifications produced by timer commands, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    StateChanged {
        state: TimerState,
        at: DateTime<Utc>,
    },
    Tick {
        seconds_left: u32,
    },
    TaskChanged {
        task: String,
        context_switch: bool,
    },
}

/// Ledger entry for a reviewed pomodoro plus the events of the transition.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub entry: NewPomodoro,
    pub events: Vec<TimerEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayTimer {
    schedule: ScheduleConfig,
    state: TimerState,
    current_task: String,
    started_at: Option<DateTime<Utc>>,
    seconds_left: u32,
    done_today: u32,
    target: u32,
    context_switch: bool,
}

impl DayTimer {
    pub fn new(schedule: ScheduleConfig) -> Self {
        Self {
            schedule,
            state: TimerState::Idle,
            current_task: String::new(),
            started_at: None,
            seconds_left: 0,
            done_today: 0,
            target: 0,
            context_switch: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn current_task(&self) -> &str {
        &self.current_task
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn done_today(&self) -> u32 {
        self.done_today
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    /// Whether the task changed during the running pomodoro.
    pub fn context_switch(&self) -> bool {
        self.context_switch
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Pomodoros still needed to reach the day's target.
    pub fn remaining(&self) -> u32 {
        self.target.saturating_sub(self.done_today)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter planning with a pomodoro target. Re-planning keeps the count of
    /// pomodoros done; starting after a closed day resets it.
    pub fn start_day(&mut self, target: u32) -> Result<Vec<TimerEvent>> {
        match self.state {
            TimerState::Idle | TimerState::Planning => {}
            TimerState::DayClosed => self.done_today = 0,
            _ => return Err(self.reject("start the day")),
        }
        self.target = target;
        Ok(vec![self.transition(TimerState::Planning)])
    }

    /// Begin a focus block on `task`.
    pub fn start_focus(&mut self, task: &str) -> Result<Vec<TimerEvent>> {
        if !matches!(
            self.state,
            TimerState::Planning | TimerState::ShortBreak | TimerState::LongBreak
        ) {
            return Err(self.reject("start a pomodoro"));
        }
        let task = required_task(task)?;
        Ok(self.begin_focus(task))
    }

    /// Advance the running clock by one second.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        match self.state {
            TimerState::Focus => {
                self.seconds_left = self.seconds_left.saturating_sub(1);
                let mut events = vec![TimerEvent::Tick {
                    seconds_left: self.seconds_left,
                }];
                if self.seconds_left == 0 {
                    events.push(self.transition(TimerState::Review));
                }
                events
            }
            TimerState::ShortBreak | TimerState::LongBreak => {
                self.seconds_left = self.seconds_left.saturating_sub(1);
                let mut events = vec![TimerEvent::Tick {
                    seconds_left: self.seconds_left,
                }];
                if self.seconds_left == 0 {
                    let task = self.current_task.clone();
                    events.extend(self.begin_focus(task));
                }
                events
            }
            _ => Vec::new(),
        }
    }

    /// Close the review and move to the next break.
    ///
    /// The returned entry describes the finished pomodoro for
    /// [`Ledger::append`](crate::ledger::Ledger::append).
    pub fn save_review(
        &mut self,
        day_id: i64,
        focus_score: Option<i32>,
        reason: &str,
        note: &str,
    ) -> Result<ReviewOutcome> {
        if self.state != TimerState::Review {
            return Err(self.reject("save a review"));
        }
        if let Some(score) = focus_score {
            ValidationError::check_range("focus_score", score.into(), 1, 5)?;
        }

        let now = Utc::now();
        let entry = NewPomodoro {
            day_id,
            start_time: self.started_at.unwrap_or(now),
            end_time: Some(now),
            duration_sec: i64::from(self.schedule.focus_duration) * 60,
            aborted: false,
            focus_score,
            reason: reason.to_string(),
            note: note.to_string(),
            task: self.current_task.clone(),
            context_switch: self.context_switch,
            pause_count: 0,
        };

        self.done_today += 1;
        let cadence = self.schedule.pomodoros_before_long_break.max(1);
        let event = if self.done_today % cadence == 0 {
            self.seconds_left = self.schedule.long_break * 60;
            self.transition(TimerState::LongBreak)
        } else {
            self.seconds_left = self.schedule.short_break * 60;
            self.transition(TimerState::ShortBreak)
        };
        tracing::debug!(done = self.done_today, task = %entry.task, "pomodoro reviewed");

        Ok(ReviewOutcome {
            entry,
            events: vec![event],
        })
    }

    /// Switch the active task mid-pomodoro, flagging a context switch.
    pub fn change_task(&mut self, task: &str) -> Result<Vec<TimerEvent>> {
        if self.state != TimerState::Focus {
            return Err(self.reject("change task"));
        }
        let task = required_task(task)?;
        if task == self.current_task {
            return Ok(Vec::new());
        }
        self.current_task = task;
        self.context_switch = true;
        Ok(vec![TimerEvent::TaskChanged {
            task: self.current_task.clone(),
            context_switch: true,
        }])
    }

    /// End the day. A running or unreviewed pomodoro must be finished first.
    pub fn close_day(&mut self) -> Result<Vec<TimerEvent>> {
        if !matches!(
            self.state,
            TimerState::Planning | TimerState::ShortBreak | TimerState::LongBreak
        ) {
            return Err(self.reject("close the day"));
        }
        self.seconds_left = 0;
        self.started_at = None;
        Ok(vec![self.transition(TimerState::DayClosed)])
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_focus(&mut self, task: String) -> Vec<TimerEvent> {
        self.current_task = task;
        self.started_at = Some(Utc::now());
        self.seconds_left = self.schedule.focus_duration * 60;
        self.context_switch = false;
        vec![
            self.transition(TimerState::Focus),
            TimerEvent::TaskChanged {
                task: self.current_task.clone(),
                context_switch: false,
            },
        ]
    }

    fn transition(&mut self, state: TimerState) -> TimerEvent {
        self.state = state;
        TimerEvent::StateChanged {
            state,
            at: Utc::now(),
        }
    }

    fn reject(&self, action: &'static str) -> CoreError {
        CoreError::InvalidTransition {
            action,
            state: self.state.to_string(),
        }
    }
}

fn required_task(task: &str) -> Result<String, ValidationError> {
    let cleaned = task.trim();
    if cleaned.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "task".into(),
            message: "task is required".into(),
        });
    }
    Ok(cleaned.to_string())
}
