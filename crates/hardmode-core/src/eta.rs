//! Completion estimates for the remaining focus blocks of a day.

use chrono::{DateTime, TimeDelta, TimeZone};

use crate::storage::ScheduleConfig;

/// Estimate when `remaining_focus_blocks` more pomodoros will be done.
///
/// Every block is followed by a break; every `pomodoros_before_long_break`-th
/// break (excluding a trailing one) is long. Returns `start` when nothing
/// remains, and `None` when the finish time is beyond the representable range.
pub fn estimate_completion<Tz: TimeZone>(
    start: DateTime<Tz>,
    remaining_focus_blocks: i64,
    schedule: &ScheduleConfig,
) -> Option<DateTime<Tz>> {
    if remaining_focus_blocks <= 0 {
        return Some(start);
    }
    let cadence = i64::from(schedule.pomodoros_before_long_break.max(1));
    let long_breaks = (remaining_focus_blocks - 1) / cadence;
    let short_breaks = remaining_focus_blocks - long_breaks;

    let focus = remaining_focus_blocks.checked_mul(i64::from(schedule.focus_duration))?;
    let short = short_breaks.checked_mul(i64::from(schedule.short_break))?;
    let long = long_breaks.checked_mul(i64::from(schedule.long_break))?;
    let total_minutes = focus.checked_add(short)?.checked_add(long)?;

    start.checked_add_signed(TimeDelta::try_minutes(total_minutes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Timelike, Utc};

    fn nine_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn two_blocks_with_defaults() {
        let eta = estimate_completion(nine_am(), 2, &ScheduleConfig::default()).unwrap();
        assert_eq!(eta.hour(), 10);
        assert_eq!(eta.minute(), 0);
    }

    #[test]
    fn zero_or_negative_remaining_returns_start() {
        let schedule = ScheduleConfig::default();
        assert_eq!(estimate_completion(nine_am(), 0, &schedule), Some(nine_am()));
        assert_eq!(estimate_completion(nine_am(), -3, &schedule), Some(nine_am()));
    }

    #[test]
    fn long_break_after_each_cadence() {
        // 5 blocks: 125 focus, one long break (15), four short breaks (20).
        let eta = estimate_completion(nine_am(), 5, &ScheduleConfig::default()).unwrap();
        assert_eq!(eta - nine_am(), Duration::minutes(160));
    }

    #[test]
    fn zero_cadence_is_treated_as_one() {
        let schedule = ScheduleConfig {
            pomodoros_before_long_break: 0,
            ..ScheduleConfig::default()
        };
        // 3 blocks: 75 focus, two long breaks (30), one short break (5).
        let eta = estimate_completion(nine_am(), 3, &schedule).unwrap();
        assert_eq!(eta - nine_am(), Duration::minutes(110));
    }

    #[test]
    fn out_of_range_totals_are_none() {
        let schedule = ScheduleConfig::default();
        assert_eq!(estimate_completion(nine_am(), 1_000_000_000_000, &schedule), None);
        assert_eq!(estimate_completion(nine_am(), i64::MAX, &schedule), None);
    }
}
