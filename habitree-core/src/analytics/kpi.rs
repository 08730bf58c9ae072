//! Today's dashboard KPIs.
//!
//! Every ratio guards its denominator: with nothing to measure a KPI reads
//! 0, except habit consistency, which reads 100 when there are no habits.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::AnalyticsSnapshot;
use crate::date::{day_key_in, to_day_key, DayKey};
use crate::types::{Habit, JournalEntry, PomodoroSession, Task, TaskStatus, TimeEntry};

/// Score for moods that are present but not in the table.
const DEFAULT_MOOD_SCORE: u8 = 3;
const MAX_MOOD_SCORE: f64 = 5.0;

/// Tasks done today against tasks that were on today's plate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TaskCompletion {
    pub value: u32,
    pub percentage: f64,
}

/// Snapshot of today's productivity figures.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub tasks_completed: TaskCompletion,
    /// Minutes of pomodoro focus logged today
    pub focus_time: f64,
    /// Percent of today's work that was reactive
    pub reactive_work: f64,
    /// Percent of habits completed today
    pub habit_consistency: f64,
    /// Today's journal mood on a 0-100 scale
    pub mood_index: f64,
    pub productivity_score: u32,
}

/// Compute the dashboard KPIs for the day `now` falls on.
pub fn dashboard_kpis<Tz: TimeZone>(
    snapshot: &AnalyticsSnapshot<'_>,
    now: &DateTime<Tz>,
) -> DashboardKpis {
    let tz = now.timezone();
    let today = to_day_key(now);

    let today_row = snapshot.time_series.iter().find(|e| e.date == today);

    DashboardKpis {
        tasks_completed: task_completion(snapshot.tasks, today),
        focus_time: focus_minutes_on(snapshot.sessions, today, &tz),
        reactive_work: reactive_work_ratio(today_row),
        habit_consistency: habit_consistency(snapshot.habits, today),
        mood_index: mood_index(snapshot.journal, today, &tz),
        productivity_score: daily_productivity_score(snapshot, today).unwrap_or(0),
    }
}

/// Done tasks due today, as a share of open tasks due by today plus those.
pub fn task_completion(tasks: &[Task], today: DayKey) -> TaskCompletion {
    let open_due = tasks
        .iter()
        .filter(|t| t.status != TaskStatus::Done && t.due_date <= today)
        .count();
    let done_today = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Done && t.due_date == today)
        .count();

    let planned = open_due + done_today;
    let percentage = if planned > 0 {
        done_today as f64 / planned as f64 * 100.0
    } else {
        0.0
    };

    TaskCompletion {
        value: u32::try_from(done_today).unwrap_or(u32::MAX),
        percentage,
    }
}

/// Focus minutes of sessions whose local day is `day`.
pub fn focus_minutes_on<Tz: TimeZone>(sessions: &[PomodoroSession], day: DayKey, tz: &Tz) -> f64 {
    let seconds: u64 = sessions
        .iter()
        .filter(|s| day_key_in(&s.date, tz) == day)
        .map(|s| s.duration as u64)
        .sum();
    seconds as f64 / 60.0
}

/// `reactive / (planned + reactive)` as a percentage.
pub fn reactive_work_ratio(entry: Option<&TimeEntry>) -> f64 {
    match entry {
        Some(e) if e.planned + e.reactive > 0 => {
            e.reactive as f64 / (e.planned + e.reactive) as f64 * 100.0
        }
        _ => 0.0,
    }
}

/// Share of habits completed on `today`; 100 when there are none.
pub fn habit_consistency(habits: &[Habit], today: DayKey) -> f64 {
    if habits.is_empty() {
        return 100.0;
    }
    let done = habits.iter().filter(|h| h.is_completed_on(today)).count();
    done as f64 / habits.len() as f64 * 100.0
}

/// Score a journal mood label from 1 (worst) to 5 (best).
///
/// Matching ignores case and surrounding whitespace. Labels outside the
/// table score as neutral.
pub fn mood_score(label: &str) -> u8 {
    match label.trim().to_lowercase().as_str() {
        "happy" | "optimistic" | "excited" => 5,
        "calm" => 4,
        "neutral" => 3,
        "sad" | "anxious" => 2,
        "stressed" | "angry" | "tired" => 1,
        _ => DEFAULT_MOOD_SCORE,
    }
}

/// Mood of the newest journal entry written on `today`, scaled to 0-100.
pub fn mood_index<Tz: TimeZone>(journal: &[JournalEntry], today: DayKey, tz: &Tz) -> f64 {
    journal
        .iter()
        .find(|e| day_key_in(&e.date, tz) == today)
        .and_then(|e| e.mood.as_deref())
        .filter(|mood| !mood.trim().is_empty())
        .map(|mood| mood_score(mood) as f64 / MAX_MOOD_SCORE * 100.0)
        .unwrap_or(0.0)
}

/// Stored productivity sample for `day`, if any.
pub fn daily_productivity_score(snapshot: &AnalyticsSnapshot<'_>, day: DayKey) -> Option<u32> {
    snapshot
        .mood_productivity
        .iter()
        .find(|e| e.date == day)
        .map(|e| e.productivity_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HabitCategory, MoodEntry, TaskPriority};
    use chrono::Utc;

    fn key(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn task(id: u64, due: &str, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("task {}", id),
            description: String::new(),
            priority: TaskPriority::Low,
            due_date: key(due),
            status,
            focus_time: 0,
            pomodoros: 0,
            all_day: None,
            color: None,
        }
    }

    #[test]
    fn test_task_completion() {
        let today = key("2024-06-15");
        let tasks = vec![
            task(1, "2024-06-15", TaskStatus::Done),
            task(2, "2024-06-15", TaskStatus::InProgress),
            task(3, "2024-06-10", TaskStatus::ToDo),
            task(4, "2024-06-20", TaskStatus::ToDo),
            task(5, "2024-06-14", TaskStatus::Done),
        ];
        let completion = task_completion(&tasks, today);
        assert_eq!(completion.value, 1);
        assert!((completion.percentage - 100.0 / 3.0).abs() < 1e-9);

        assert_eq!(task_completion(&[], today), TaskCompletion::default());
    }

    #[test]
    fn test_reactive_ratio() {
        let entry = TimeEntry {
            date: key("2024-06-15"),
            completed: 10,
            created: 10,
            planned: 4,
            reactive: 6,
        };
        assert_eq!(reactive_work_ratio(Some(&entry)), 60.0);
        assert_eq!(reactive_work_ratio(None), 0.0);

        let idle = TimeEntry {
            planned: 0,
            reactive: 0,
            ..entry
        };
        assert_eq!(reactive_work_ratio(Some(&idle)), 0.0);
    }

    #[test]
    fn test_habit_consistency() {
        let today = key("2024-06-15");
        assert_eq!(habit_consistency(&[], today), 100.0);

        let mut done = Habit::new(1, "a", "", HabitCategory::Health, Utc::now());
        done.completions.insert(today, true);
        let not_done = Habit::new(2, "b", "", HabitCategory::Health, Utc::now());
        assert_eq!(habit_consistency(&[done, not_done], today), 50.0);
    }

    #[test]
    fn test_mood_score_table() {
        assert_eq!(mood_score("Happy"), 5);
        assert_eq!(mood_score(" excited "), 5);
        assert_eq!(mood_score("Calm"), 4);
        assert_eq!(mood_score("Neutral"), 3);
        assert_eq!(mood_score("ANXIOUS"), 2);
        assert_eq!(mood_score("Tired"), 1);
        assert_eq!(mood_score("Bewildered"), 3);
    }

    #[test]
    fn test_mood_index_uses_todays_newest_entry() {
        let today = key("2024-06-15");
        let entry = |id, day, mood: Option<&str>| JournalEntry {
            id,
            date: Utc.with_ymd_and_hms(2024, 6, day, 18, 0, 0).unwrap(),
            content: String::new(),
            mood: mood.map(str::to_string),
            insights: None,
        };
        let journal = vec![
            entry(3, 15, Some("Calm")),
            entry(2, 15, Some("Stressed")),
            entry(1, 14, Some("Happy")),
        ];
        assert_eq!(mood_index(&journal, today, &Utc), 80.0);
        assert_eq!(mood_index(&journal[2..], today, &Utc), 0.0);
        assert_eq!(mood_index(&[entry(4, 15, None)], today, &Utc), 0.0);
        assert_eq!(mood_index(&[entry(5, 15, Some("Wistful"))], today, &Utc), 60.0);
    }

    #[test]
    fn test_dashboard_kpis() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 20, 0, 0).unwrap();
        let today = to_day_key(&now);
        let sessions = vec![
            PomodoroSession {
                date: Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap(),
                task_id: None,
                interruptions: 0,
                duration: 1500,
            },
            PomodoroSession {
                date: Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
                task_id: None,
                interruptions: 2,
                duration: 900,
            },
            PomodoroSession {
                date: Utc.with_ymd_and_hms(2024, 6, 14, 10, 0, 0).unwrap(),
                task_id: None,
                interruptions: 0,
                duration: 1500,
            },
        ];
        let time_series = vec![TimeEntry {
            date: today,
            completed: 10,
            created: 10,
            planned: 4,
            reactive: 6,
        }];
        let mood_productivity = vec![MoodEntry {
            date: today,
            mood_score: 4,
            productivity_score: 82,
        }];
        let snapshot = AnalyticsSnapshot {
            sessions: &sessions,
            time_series: &time_series,
            mood_productivity: &mood_productivity,
            ..Default::default()
        };

        let kpis = dashboard_kpis(&snapshot, &now);
        assert_eq!(kpis.focus_time, 40.0);
        assert_eq!(kpis.reactive_work, 60.0);
        assert_eq!(kpis.habit_consistency, 100.0);
        assert_eq!(kpis.mood_index, 0.0);
        assert_eq!(kpis.productivity_score, 82);
        assert_eq!(kpis.tasks_completed.percentage, 0.0);

        assert_eq!(daily_productivity_score(&snapshot, today), Some(82));
        assert_eq!(daily_productivity_score(&snapshot, key("2024-06-14")), None);
    }
}
