//! Date-range windows over the record collections.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use super::heatmap::build_heatmap;
use super::AnalyticsSnapshot;
use crate::date::{to_day_key, DayKey};
use crate::types::{DateRange, Habit, HeatmapCell, MoodEntry, PomodoroSession, TimeEntry};

/// Records visible in one analytics window.
///
/// Habits are carried whole (streaks are lifetime figures) and the heatmap
/// is always built from the complete session log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowedData {
    pub range: DateRange,
    /// First day included in the window
    pub start: DayKey,
    pub time_series: Vec<TimeEntry>,
    pub mood_productivity: Vec<MoodEntry>,
    pub sessions: Vec<PomodoroSession>,
    pub habits: Vec<Habit>,
    pub focus_heatmap: Vec<HeatmapCell>,
}

/// First day of the window ending today.
pub fn window_start(range: DateRange, today: DayKey) -> DayKey {
    today.minus_days(range.lookback_days())
}

/// Filter the snapshot to `range`, counting days in `now`'s time zone.
///
/// The window has no upper bound: anything dated after `now` stays in.
pub fn filtered_data<Tz: TimeZone>(
    snapshot: &AnalyticsSnapshot<'_>,
    range: DateRange,
    now: &DateTime<Tz>,
) -> WindowedData {
    let tz = now.timezone();
    let start = window_start(range, to_day_key(now));
    let start_instant = start.start_of_day(&tz).with_timezone(&Utc);

    let time_series: Vec<TimeEntry> = snapshot
        .time_series
        .iter()
        .filter(|e| e.date >= start)
        .copied()
        .collect();
    let mood_productivity: Vec<MoodEntry> = snapshot
        .mood_productivity
        .iter()
        .filter(|e| e.date >= start)
        .copied()
        .collect();
    let sessions: Vec<PomodoroSession> = snapshot
        .sessions
        .iter()
        .filter(|s| s.date >= start_instant)
        .cloned()
        .collect();

    tracing::trace!(
        range = %range,
        start = %start,
        time_entries = time_series.len(),
        sessions = sessions.len(),
        "Filtered analytics window"
    );

    WindowedData {
        range,
        start,
        time_series,
        mood_productivity,
        sessions,
        habits: snapshot.habits.to_vec(),
        focus_heatmap: build_heatmap(snapshot.sessions, &tz),
    }
}
