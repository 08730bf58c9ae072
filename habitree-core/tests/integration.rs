//! Integration tests for habitree-core
//!
//! These exercise the stores, persistence and analytics together, the way a
//! front end drives them: mutate, save, reload, then compute.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use habitree_core::analytics::{
    dashboard_kpis, daily_productivity_score, filtered_data, generate_insights, Insight,
    HEATMAP_CELLS,
};
use habitree_core::storage::FileStore;
use habitree_core::{
    compute_streaks, DateRange, DayKey, HabitCategory, MoodEntry, NewTask, PomodoroSession,
    TaskPriority, TaskStatus, TimeEntry, Workspace,
};
use tempfile::TempDir;

fn key(s: &str) -> DayKey {
    s.parse().unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 18, 0, 0).unwrap()
}

// ============================================
// Streak properties
// ============================================

#[test]
fn test_streaks_no_completions() {
    let today = key("2024-06-15");
    for previous in [0, 1, 9] {
        let streaks = compute_streaks(&BTreeMap::new(), previous, today);
        assert_eq!(streaks.current, 0);
        assert_eq!(streaks.longest, previous);
    }
}

#[test]
fn test_streaks_three_days_ending_yesterday() {
    let today = key("2024-06-15");
    let completions: BTreeMap<DayKey, bool> =
        (1..=3).map(|n| (today.minus_days(n), true)).collect();
    let streaks = compute_streaks(&completions, 0, today);
    assert_eq!(streaks.current, 3);
    assert_eq!(streaks.longest, 3);
}

#[test]
fn test_streaks_dead_without_today_or_yesterday() {
    let today = key("2024-06-15");
    let completions: BTreeMap<DayKey, bool> =
        (2..=20).map(|n| (today.minus_days(n), true)).collect();
    let streaks = compute_streaks(&completions, 0, today);
    assert_eq!(streaks.current, 0);
    assert_eq!(streaks.longest, 19);
}

#[test]
fn test_longest_monotonic_over_toggle_sequence() {
    let today = key("2024-06-15");
    let mut workspace = Workspace::default();
    let habit = workspace
        .habits
        .add("Meditate", "", HabitCategory::Personal, now());

    // Deterministic pseudo-random toggles over the last two weeks.
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut longest_before = 0;
    for _ in 0..200 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let day = today.minus_days(seed % 14);
        let streaks = workspace
            .habits
            .toggle_completion(habit.id, day, today)
            .unwrap();
        assert!(streaks.longest >= longest_before);
        assert!(streaks.longest >= streaks.current);
        longest_before = streaks.longest;
    }
}

#[test]
fn test_toggle_twice_is_idempotent() {
    let today = key("2024-06-15");
    let mut workspace = Workspace::default();
    let habit = workspace.habits.add("Read", "", HabitCategory::Learning, now());
    for n in [0, 1, 2, 5] {
        workspace
            .habits
            .toggle_completion(habit.id, today.minus_days(n), today)
            .unwrap();
    }
    let before = workspace.habits.get(habit.id).unwrap().clone();

    // Off then on again, for every completed day.
    for n in [0, 1, 2, 5] {
        let day = today.minus_days(n);
        workspace.habits.toggle_completion(habit.id, day, today).unwrap();
        workspace.habits.toggle_completion(habit.id, day, today).unwrap();
        let after = workspace.habits.get(habit.id).unwrap();
        assert_eq!(after.current_streak, before.current_streak);
        assert_eq!(after.longest_streak, before.longest_streak);
    }
}

// ============================================
// Analytics over a persisted workspace
// ============================================

fn seeded_workspace(today: DayKey) -> Workspace {
    let mut workspace = Workspace::default();

    let read = workspace.habits.add("Read", "", HabitCategory::Learning, now());
    workspace.habits.add("Walk", "", HabitCategory::Health, now());
    for n in 0..4 {
        workspace
            .habits
            .toggle_completion(read.id, today.minus_days(n), today)
            .unwrap();
    }

    let task = workspace.tasks.add(
        NewTask {
            title: "Quarterly report".to_string(),
            description: String::new(),
            priority: TaskPriority::High,
            due_date: today,
        },
        now(),
    );
    workspace.tasks.set_status(task.id, TaskStatus::Done).unwrap();

    // Two Monday 09:00 sessions, one today at 10:00.
    for instant in [
        Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 10, 9, 30, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
    ] {
        workspace.log_session(PomodoroSession {
            date: instant,
            task_id: Some(task.id),
            interruptions: 0,
            duration: 1500,
        });
    }

    for n in 0..40 {
        workspace.series.upsert_time_entry(TimeEntry {
            date: today.minus_days(n),
            completed: 10,
            created: 10,
            planned: 4,
            reactive: 6,
        });
        workspace.series.upsert_mood_entry(MoodEntry {
            date: today.minus_days(n),
            mood_score: 4,
            productivity_score: 70 + n as u32 % 20,
        });
    }

    workspace
        .journal
        .add("Shipped the report", Some("Happy".to_string()), None, now());

    workspace
}

#[test]
fn test_workspace_round_trip_through_file_store() {
    habitree_core::logging::init_test();
    let today = key("2024-06-15");
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();

    seeded_workspace(today).save(&mut store).unwrap();
    let loaded = Workspace::load(&store, today).unwrap();

    assert_eq!(loaded.habits.habits().len(), 2);
    let read = loaded
        .habits
        .habits()
        .iter()
        .find(|h| h.title == "Read")
        .unwrap();
    assert_eq!(read.current_streak, 4);
    assert_eq!(read.longest_streak, 4);

    let task = &loaded.tasks.tasks()[0];
    assert_eq!(task.pomodoros, 3);
    assert_eq!(task.focus_time, 75);
    assert_eq!(loaded.sessions.sessions().len(), 3);
    assert_eq!(loaded.series.time_series.len(), 40);
}

#[test]
fn test_window_sizes_and_heatmap() {
    let today = key("2024-06-15");
    let workspace = seeded_workspace(today);
    let snapshot = workspace.snapshot();

    let daily = filtered_data(&snapshot, DateRange::Daily, &now());
    let weekly = filtered_data(&snapshot, DateRange::Weekly, &now());
    let monthly = filtered_data(&snapshot, DateRange::Monthly, &now());

    assert_eq!(daily.time_series.len(), 1);
    assert_eq!(weekly.time_series.len(), 7);
    assert_eq!(monthly.time_series.len(), 30);
    assert_eq!(monthly.mood_productivity.len(), 30);

    assert_eq!(daily.sessions.len(), 1);
    assert_eq!(weekly.sessions.len(), 2);
    assert_eq!(monthly.sessions.len(), 3);

    for window in [&daily, &weekly, &monthly] {
        assert_eq!(window.focus_heatmap.len(), HEATMAP_CELLS);
        let total: u32 = window.focus_heatmap.iter().map(|c| c.value).sum();
        assert_eq!(total, 3);
        assert_eq!(window.habits.len(), 2);
    }

    let monday_nine = daily
        .focus_heatmap
        .iter()
        .find(|c| c.day == "Mon" && c.hour == 9)
        .unwrap();
    assert_eq!(monday_nine.value, 2);
}

#[test]
fn test_dashboard_kpis_for_seeded_day() {
    let today = key("2024-06-15");
    let workspace = seeded_workspace(today);
    let snapshot = workspace.snapshot();

    let kpis = dashboard_kpis(&snapshot, &now());
    assert_eq!(kpis.tasks_completed.value, 1);
    assert_eq!(kpis.tasks_completed.percentage, 100.0);
    assert_eq!(kpis.focus_time, 25.0);
    assert_eq!(kpis.reactive_work, 60.0);
    assert_eq!(kpis.habit_consistency, 50.0);
    assert_eq!(kpis.mood_index, 100.0);
    assert_eq!(kpis.productivity_score, 70);
    assert_eq!(daily_productivity_score(&snapshot, today), Some(70));
    assert_eq!(daily_productivity_score(&snapshot, key("2023-01-01")), None);
}

#[test]
fn test_insights_for_seeded_week() {
    let today = key("2024-06-15");
    let workspace = seeded_workspace(today);
    let weekly = filtered_data(&workspace.snapshot(), DateRange::Weekly, &now());

    let insights = habitree_core::analytics::derive_insights(&weekly);
    assert_eq!(
        insights,
        vec![
            Insight::HighReactiveWork { percentage: 60 },
            Insight::MorningPeak,
            Insight::HabitStreak {
                title: "Read".to_string(),
                days: 4
            },
        ]
    );
    assert_eq!(generate_insights(&weekly).len(), 3);
}

#[test]
fn test_windows_follow_the_callers_zone() {
    // 2024-06-15 18:00 UTC is already the 16th in UTC+9.
    let tz = FixedOffset::east_opt(9 * 3600).unwrap();
    let local_now = now().with_timezone(&tz);
    let workspace = seeded_workspace(key("2024-06-15"));

    let daily = filtered_data(&workspace.snapshot(), DateRange::Daily, &local_now);
    assert_eq!(daily.start, key("2024-06-16"));
    assert!(daily.time_series.is_empty());
    assert!(daily.sessions.is_empty());

    let kpis = dashboard_kpis(&workspace.snapshot(), &local_now);
    assert_eq!(kpis.reactive_work, 0.0);
    assert_eq!(kpis.productivity_score, 0);
}
