//! Habit streak calculation.
//!
//! A habit's **current** streak is the run of completed days that ends today,
//! or yesterday when today is not done yet. The **longest** streak is the
//! best run ever recorded; it is carried forward from the previously stored
//! value so that un-toggling an old day never lowers it.

use std::collections::{BTreeMap, BTreeSet};

use chrono::TimeZone;
use serde::Serialize;

use crate::date::{day_key_in, DayKey};
use crate::types::{Habit, PomodoroSession};

/// Result of a streak recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

/// Compute current and longest streaks from a completion map.
pub fn compute_streaks(
    completions: &BTreeMap<DayKey, bool>,
    previous_longest: u32,
    today: DayKey,
) -> Streaks {
    // BTreeMap iterates in ascending day order.
    let completed: Vec<DayKey> = completions
        .iter()
        .filter(|(_, &done)| done)
        .map(|(&day, _)| day)
        .collect();

    if completed.is_empty() {
        return Streaks {
            current: 0,
            longest: previous_longest,
        };
    }

    let longest = longest_run(&completed).max(previous_longest);
    let current = current_run(today, |day| {
        completions.get(&day).copied().unwrap_or(false)
    });

    Streaks { current, longest }
}

/// Longest run of consecutive days in an ascending list.
fn longest_run(sorted_days: &[DayKey]) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<DayKey> = None;

    for &day in sorted_days {
        run = match previous {
            Some(prev) if prev.is_followed_by(day) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }

    best
}

/// Count back from today (or yesterday) while `is_done` holds.
fn current_run(today: DayKey, is_done: impl Fn(DayKey) -> bool) -> u32 {
    let start = if is_done(today) {
        Some(today)
    } else {
        today.pred().filter(|&yesterday| is_done(yesterday))
    };

    let mut count = 0;
    let mut cursor = start;
    while let Some(day) = cursor {
        if !is_done(day) {
            break;
        }
        count += 1;
        cursor = day.pred();
    }
    count
}

impl Habit {
    /// Refresh the cached streak fields from `completions`.
    pub fn recalculate(&mut self, today: DayKey) -> Streaks {
        let streaks = compute_streaks(&self.completions, self.longest_streak, today);
        self.current_streak = streaks.current;
        self.longest_streak = streaks.longest;
        streaks
    }

    /// Percentage of the last `days` days (today included) marked complete.
    pub fn completion_rate(&self, today: DayKey, days: u32) -> f64 {
        if days == 0 {
            return 0.0;
        }
        let done = (0..days as u64)
            .filter(|&n| self.is_completed_on(today.minus_days(n)))
            .count();
        done as f64 / days as f64 * 100.0
    }
}

/// Consecutive local days with at least one pomodoro, ending today or yesterday.
pub fn focus_streak<Tz: TimeZone>(sessions: &[PomodoroSession], today: DayKey, tz: &Tz) -> u32 {
    let active: BTreeSet<DayKey> = sessions.iter().map(|s| day_key_in(&s.date, tz)).collect();
    current_run(today, |day| active.contains(&day))
}
