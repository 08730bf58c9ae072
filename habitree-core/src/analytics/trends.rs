//! Chart-ready series derived from a window or the habit list.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::TimeZone;
use serde::Serialize;

use super::window::WindowedData;
use crate::date::{day_key_in, DayKey};
use crate::types::{Habit, HabitCategory};

/// Days covered by the habit consistency panel.
const CONSISTENCY_DAYS: u32 = 7;

/// Focus minutes for each day of the window's time series.
///
/// Days without sessions read 0; sessions on days absent from the series
/// are not reported.
pub fn daily_focus_minutes<Tz: TimeZone>(data: &WindowedData, tz: &Tz) -> Vec<(DayKey, f64)> {
    let mut seconds: BTreeMap<DayKey, u64> = BTreeMap::new();
    for session in &data.sessions {
        *seconds.entry(day_key_in(&session.date, tz)).or_default() += session.duration as u64;
    }

    data.time_series
        .iter()
        .map(|e| {
            let secs = seconds.get(&e.date).copied().unwrap_or(0);
            (e.date, secs as f64 / 60.0)
        })
        .collect()
}

/// Planned and reactive totals over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlannedVsReactive {
    pub planned: u64,
    pub reactive: u64,
}

pub fn planned_vs_reactive(data: &WindowedData) -> PlannedVsReactive {
    data.time_series
        .iter()
        .fold(PlannedVsReactive::default(), |acc, e| PlannedVsReactive {
            planned: acc.planned + e.planned as u64,
            reactive: acc.reactive + e.reactive as u64,
        })
}

/// Number of habits in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: HabitCategory,
    pub color: &'static str,
    pub count: usize,
}

/// Habit counts per category, in category order, omitting empty ones.
pub fn category_breakdown(habits: &[Habit]) -> Vec<CategoryCount> {
    HabitCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let count = habits.iter().filter(|h| h.category == category).count();
            (count > 0).then(|| CategoryCount {
                category,
                color: category.color(),
                count,
            })
        })
        .collect()
}

/// Streak figures and recent completion rate for one habit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitConsistency {
    pub id: u64,
    pub title: String,
    pub color: &'static str,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Percent of the last seven days completed
    pub completion_rate: f64,
}

/// The `limit` habits with the highest current streak (list order on ties).
pub fn top_habit_consistency(
    habits: &[Habit],
    today: DayKey,
    limit: usize,
) -> Vec<HabitConsistency> {
    let mut ranked: Vec<&Habit> = habits.iter().collect();
    ranked.sort_by_key(|h| Reverse(h.current_streak));

    ranked
        .into_iter()
        .take(limit)
        .map(|h| HabitConsistency {
            id: h.id,
            title: h.title.clone(),
            color: h.color(),
            current_streak: h.current_streak,
            longest_streak: h.longest_streak,
            completion_rate: h.completion_rate(today, CONSISTENCY_DAYS),
        })
        .collect()
}
