//! Core domain types for habitree
//!
//! Records are serialized with camelCase field names and the display
//! spellings of their enums (`"To Do"`, `"In Progress"`), which is the shape
//! they have in the key-value store.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Day key** | A local calendar day, `YYYY-MM-DD` ([`DayKey`]) |
//! | **Completion** | A habit marked done on a given day key |
//! | **Session** | One finished pomodoro, logged with its full instant |
//! | **Time entry** | Per-day counts of created/completed and planned/reactive work |
//! | **Mood entry** | Per-day mood (1-5) and productivity (0-100) sample |

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::DayKey;

// ============================================
// Habits
// ============================================

/// Fixed habit categories, each with a display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HabitCategory {
    Health,
    Productivity,
    Learning,
    Personal,
    Finance,
}

impl HabitCategory {
    pub const ALL: [HabitCategory; 5] = [
        HabitCategory::Health,
        HabitCategory::Productivity,
        HabitCategory::Learning,
        HabitCategory::Personal,
        HabitCategory::Finance,
    ];

    /// Hex colour used when presenting habits of this category.
    pub fn color(&self) -> &'static str {
        match self {
            HabitCategory::Health => "#22c55e",
            HabitCategory::Productivity => "#3b82f6",
            HabitCategory::Learning => "#a855f7",
            HabitCategory::Personal => "#f97316",
            HabitCategory::Finance => "#eab308",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitCategory::Health => "Health",
            HabitCategory::Productivity => "Productivity",
            HabitCategory::Learning => "Learning",
            HabitCategory::Personal => "Personal",
            HabitCategory::Finance => "Finance",
        }
    }
}

impl std::str::FromStr for HabitCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HabitCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown habit category: {}", s))
    }
}

impl fmt::Display for HabitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a habit is expected. Only daily habits exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HabitFrequency {
    #[default]
    Daily,
}

/// A tracked habit with its completion history.
///
/// `current_streak` and `longest_streak` are cached values; call
/// [`Habit::recalculate`](crate::streak) after touching `completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: HabitCategory,
    #[serde(default)]
    pub frequency: HabitFrequency,
    pub created_at: DateTime<Utc>,
    /// Day key → completed. Entries are flipped, never removed.
    #[serde(default)]
    pub completions: BTreeMap<DayKey, bool>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
}

impl Habit {
    pub fn new(
        id: u64,
        title: impl Into<String>,
        description: impl Into<String>,
        category: HabitCategory,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            category,
            frequency: HabitFrequency::Daily,
            created_at,
            completions: BTreeMap::new(),
            current_streak: 0,
            longest_streak: 0,
        }
    }

    /// Whether the habit is marked complete on `day`.
    pub fn is_completed_on(&self, day: DayKey) -> bool {
        self.completions.get(&day).copied().unwrap_or(false)
    }

    pub fn color(&self) -> &'static str {
        self.category.color()
    }
}

// ============================================
// Tasks
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(format!("unknown task priority: {}", s)),
        }
    }
}

/// Task workflow state. Any state may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "todo" => Ok(TaskStatus::ToDo),
            "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(format!("unknown task status: {}", s)),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_TASK_COLOR: &str = "#22c55e";

/// A to-do item with accumulated focus statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    pub due_date: DayKey,
    #[serde(default)]
    pub status: TaskStatus,
    /// Accumulated focus time in minutes
    #[serde(default)]
    pub focus_time: u32,
    /// Number of pomodoros logged against this task
    #[serde(default)]
    pub pomodoros: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Fields supplied by the caller when creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub due_date: DayKey,
}

// ============================================
// Pomodoro
// ============================================

/// Timer phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PomodoroMode {
    Pomodoro,
    #[serde(rename = "Short Break")]
    ShortBreak,
    #[serde(rename = "Long Break")]
    LongBreak,
}

/// One completed pomodoro. Immutable once logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSession {
    /// When the session was logged
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    #[serde(default)]
    pub interruptions: u32,
    /// Length in seconds
    pub duration: u32,
}

/// Derived per-day pomodoro counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroStats {
    pub sessions_completed_today: u32,
    /// Consecutive local days with at least one session, ending today or yesterday
    pub focus_streak: u32,
}

// ============================================
// Journal
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: u64,
    pub date: DateTime<Utc>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<String>>,
}

// ============================================
// Daily analytics series
// ============================================

/// Per-day task flow counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub date: DayKey,
    pub completed: u32,
    pub created: u32,
    pub planned: u32,
    pub reactive: u32,
}

/// Per-day mood and productivity sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub date: DayKey,
    /// 1-5
    pub mood_score: u8,
    /// 0-100
    pub productivity_score: u32,
}

/// One (weekday, hour) bucket of the focus heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    /// `Sun`..`Sat`
    pub day: &'static str,
    /// 0-23
    pub hour: u8,
    /// Number of sessions that started in this bucket
    pub value: u32,
}

/// Analytics window selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    /// Today only
    Daily,
    /// Today and the six days before it
    #[default]
    Weekly,
    /// Today and the 29 days before it
    Monthly,
}

impl DateRange {
    /// Days before today included in the window.
    pub fn lookback_days(&self) -> u64 {
        match self {
            DateRange::Daily => 0,
            DateRange::Weekly => 6,
            DateRange::Monthly => 29,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Daily => "daily",
            DateRange::Weekly => "weekly",
            DateRange::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(DateRange::Daily),
            "weekly" | "week" => Ok(DateRange::Weekly),
            "monthly" | "month" => Ok(DateRange::Monthly),
            _ => Err(format!("unknown date range: {}", s)),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
