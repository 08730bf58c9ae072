//! Rule-based insights over a windowed dataset.
//!
//! Rules are evaluated in a fixed order and each contributes at most one
//! insight:
//! 1. reactive work share of the window
//! 2. morning versus afternoon focus
//! 3. the habit on the longest current streak
//!
//! When none of them fires, a single "keep logging" nudge is returned.

use std::cmp::Reverse;
use std::fmt;

use serde::Serialize;

use super::heatmap::mean_intensity;
use super::window::WindowedData;

/// Reactive share (percent) above which work is flagged as too reactive.
const REACTIVE_WARNING_PCT: f64 = 30.0;
/// One period must beat the other by this factor to be called out.
const PERIOD_MARGIN: f64 = 1.2;
/// Current streaks longer than this are worth mentioning.
const STREAK_MENTION_MIN: u32 = 2;

const MORNING_HOURS: std::ops::RangeInclusive<u8> = 8..=11;
const AFTERNOON_HOURS: std::ops::RangeInclusive<u8> = 13..=16;

/// One observation about the user's recent activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    /// Reactive work above the warning threshold
    HighReactiveWork { percentage: u32 },
    /// Reactive work at or below the threshold
    LowReactiveWork { percentage: u32 },
    /// Morning hours clearly stronger
    MorningPeak,
    /// Afternoon hours clearly stronger
    AfternoonPeak,
    /// A habit on a notable streak
    HabitStreak { title: String, days: u32 },
    /// Nothing stood out yet
    KeepLogging,
}

impl Insight {
    pub fn message(&self) -> String {
        match self {
            Insight::HighReactiveWork { percentage } => format!(
                "Your work was {}% reactive. Try to plan ahead to reduce stress.",
                percentage
            ),
            Insight::LowReactiveWork { percentage } => format!(
                "Great job keeping reactive work low at only {}%!",
                percentage
            ),
            Insight::MorningPeak => "You're most productive in the morning. \
                Capitalize on it for your most important tasks!"
                .to_string(),
            Insight::AfternoonPeak => "Your focus peaks in the afternoon. \
                Schedule deep work sessions accordingly."
                .to_string(),
            Insight::HabitStreak { title, days } => format!(
                "Your '{}' habit is on a {}-day streak! Keep the momentum going.",
                title, days
            ),
            Insight::KeepLogging => "Keep logging your activities to unlock more \
                personalized insights about your productivity patterns."
                .to_string(),
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Evaluate every rule against the window.
pub fn derive_insights(data: &WindowedData) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(insight) = reactive_work_insight(data) {
        insights.push(insight);
    }
    if let Some(insight) = time_of_day_insight(data) {
        insights.push(insight);
    }
    if let Some(insight) = habit_streak_insight(data) {
        insights.push(insight);
    }

    if insights.is_empty() {
        insights.push(Insight::KeepLogging);
    }

    insights
}

/// Insight messages, in rule order.
pub fn generate_insights(data: &WindowedData) -> Vec<String> {
    derive_insights(data).iter().map(Insight::message).collect()
}

fn reactive_work_insight(data: &WindowedData) -> Option<Insight> {
    if data.time_series.is_empty() {
        return None;
    }
    let reactive: u64 = data.time_series.iter().map(|e| e.reactive as u64).sum();
    let planned: u64 = data.time_series.iter().map(|e| e.planned as u64).sum();
    if planned + reactive == 0 {
        return None;
    }

    let share = reactive as f64 / (planned + reactive) as f64 * 100.0;
    let percentage = share.round() as u32;
    if share > REACTIVE_WARNING_PCT {
        Some(Insight::HighReactiveWork { percentage })
    } else {
        Some(Insight::LowReactiveWork { percentage })
    }
}

fn time_of_day_insight(data: &WindowedData) -> Option<Insight> {
    let morning = mean_intensity(&data.focus_heatmap, MORNING_HOURS);
    let afternoon = mean_intensity(&data.focus_heatmap, AFTERNOON_HOURS);

    if morning > afternoon * PERIOD_MARGIN {
        Some(Insight::MorningPeak)
    } else if afternoon > morning * PERIOD_MARGIN {
        Some(Insight::AfternoonPeak)
    } else {
        None
    }
}

fn habit_streak_insight(data: &WindowedData) -> Option<Insight> {
    // min_by_key keeps the first habit among equal streaks.
    let top = data
        .habits
        .iter()
        .min_by_key(|h| Reverse(h.current_streak))?;
    (top.current_streak > STREAK_MENTION_MIN).then(|| Insight::HabitStreak {
        title: top.title.clone(),
        days: top.current_streak,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::build_heatmap;
    use crate::date::DayKey;
    use crate::types::{DateRange, Habit, HabitCategory, PomodoroSession, TimeEntry};
    use chrono::{TimeZone, Utc};

    fn key(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn empty_window() -> WindowedData {
        WindowedData {
            range: DateRange::Weekly,
            start: key("2024-06-09"),
            time_series: Vec::new(),
            mood_productivity: Vec::new(),
            sessions: Vec::new(),
            habits: Vec::new(),
            focus_heatmap: build_heatmap(&[], &Utc),
        }
    }

    fn entry(planned: u32, reactive: u32) -> TimeEntry {
        TimeEntry {
            date: key("2024-06-15"),
            completed: planned + reactive,
            created: planned + reactive,
            planned,
            reactive,
        }
    }

    fn sessions_at(hours: &[u32]) -> Vec<PomodoroSession> {
        hours
            .iter()
            .map(|&h| PomodoroSession {
                date: Utc.with_ymd_and_hms(2024, 6, 10, h, 0, 0).unwrap(),
                task_id: None,
                interruptions: 0,
                duration: 1500,
            })
            .collect()
    }

    fn habit(id: u64, title: &str, current: u32) -> Habit {
        let mut habit = Habit::new(id, title, "", HabitCategory::Personal, Utc::now());
        habit.current_streak = current;
        habit.longest_streak = current;
        habit
    }

    #[test]
    fn test_fallback_when_nothing_fires() {
        let insights = derive_insights(&empty_window());
        assert_eq!(insights, vec![Insight::KeepLogging]);
        assert!(generate_insights(&empty_window())[0].starts_with("Keep logging"));
    }

    #[test]
    fn test_reactive_warning_and_praise() {
        let mut data = empty_window();
        data.time_series = vec![entry(4, 6)];
        assert_eq!(
            derive_insights(&data),
            vec![Insight::HighReactiveWork { percentage: 60 }]
        );
        assert_eq!(
            generate_insights(&data)[0],
            "Your work was 60% reactive. Try to plan ahead to reduce stress."
        );

        data.time_series = vec![entry(7, 3), entry(10, 0)];
        assert_eq!(
            derive_insights(&data),
            vec![Insight::LowReactiveWork { percentage: 15 }]
        );

        // Exactly 30% is not above the threshold.
        data.time_series = vec![entry(7, 3)];
        assert_eq!(
            derive_insights(&data),
            vec![Insight::LowReactiveWork { percentage: 30 }]
        );
    }

    #[test]
    fn test_idle_series_skips_reactive_rule() {
        let mut data = empty_window();
        data.time_series = vec![entry(0, 0)];
        assert_eq!(derive_insights(&data), vec![Insight::KeepLogging]);
    }

    #[test]
    fn test_time_of_day() {
        let mut data = empty_window();
        data.focus_heatmap = build_heatmap(&sessions_at(&[9, 10, 14]), &Utc);
        assert_eq!(derive_insights(&data), vec![Insight::MorningPeak]);

        data.focus_heatmap = build_heatmap(&sessions_at(&[9, 14, 15]), &Utc);
        assert_eq!(derive_insights(&data), vec![Insight::AfternoonPeak]);

        // Equal periods say nothing.
        data.focus_heatmap = build_heatmap(&sessions_at(&[9, 14]), &Utc);
        assert_eq!(derive_insights(&data), vec![Insight::KeepLogging]);

        // Hours 12 and 17 belong to neither period.
        data.focus_heatmap = build_heatmap(&sessions_at(&[12, 17]), &Utc);
        assert_eq!(derive_insights(&data), vec![Insight::KeepLogging]);
    }

    #[test]
    fn test_top_habit_streak() {
        let mut data = empty_window();
        data.habits = vec![habit(1, "Walk", 2), habit(2, "Read", 5), habit(3, "Plan", 5)];
        assert_eq!(
            derive_insights(&data),
            vec![Insight::HabitStreak {
                title: "Read".to_string(),
                days: 5
            }]
        );

        data.habits = vec![habit(1, "Walk", 2)];
        assert_eq!(derive_insights(&data), vec![Insight::KeepLogging]);
    }

    #[test]
    fn test_rule_order() {
        let mut data = empty_window();
        data.time_series = vec![entry(1, 1)];
        data.focus_heatmap = build_heatmap(&sessions_at(&[15]), &Utc);
        data.habits = vec![habit(1, "Stretch", 3)];

        let insights = derive_insights(&data);
        assert_eq!(insights.len(), 3);
        assert!(matches!(insights[0], Insight::HighReactiveWork { percentage: 50 }));
        assert_eq!(insights[1], Insight::AfternoonPeak);
        assert!(insights[2].to_string().contains("'Stretch' habit is on a 3-day streak"));
    }
}
