//! Analytics for habitree
//!
//! Pure functions over an [`AnalyticsSnapshot`] of the record stores:
//! - Windowed views of the daily series and session log ([`window`])
//! - Focus heatmap by weekday and hour ([`heatmap`])
//! - Today's dashboard KPIs ([`kpi`])
//! - Rule-based insights ([`insights`])
//! - Chart-ready trend series ([`trends`])
//!
//! Nothing here mutates state or performs I/O, so every function can be
//! re-run whenever the underlying records change.

pub mod heatmap;
pub mod insights;
pub mod kpi;
pub mod trends;
pub mod window;

use crate::types::{Habit, JournalEntry, MoodEntry, PomodoroSession, Task, TimeEntry};

/// Borrowed view of every record collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsSnapshot<'a> {
    pub habits: &'a [Habit],
    pub tasks: &'a [Task],
    pub sessions: &'a [PomodoroSession],
    pub journal: &'a [JournalEntry],
    pub time_series: &'a [TimeEntry],
    pub mood_productivity: &'a [MoodEntry],
}

pub use heatmap::{build_heatmap, HEATMAP_CELLS};
pub use insights::{derive_insights, generate_insights, Insight};
pub use kpi::{daily_productivity_score, dashboard_kpis, mood_score, DashboardKpis};
pub use trends::{
    category_breakdown, daily_focus_minutes, planned_vs_reactive, top_habit_consistency,
    CategoryCount, HabitConsistency, PlannedVsReactive,
};
pub use window::{filtered_data, window_start, WindowedData};
