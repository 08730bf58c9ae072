//! In-memory record stores.
//!
//! Each store owns the records of one domain and exposes the only mutation
//! points for them. Every mutating call recomputes the derived state it
//! affects (habit streaks, task ordering) before returning, so callers never
//! observe a half-updated record. Persisting is a separate, explicit step:
//! mutate, then [`Workspace::save`].

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsSnapshot;
use crate::date::{day_key_in, DayKey};
use crate::error::{Error, Result};
use crate::storage::{load_json, save_json, KeyValueStore};
use crate::streak::{focus_streak, Streaks};
use crate::types::{
    Habit, HabitCategory, JournalEntry, MoodEntry, NewTask, PomodoroSession, PomodoroStats, Task,
    TaskStatus, TimeEntry, DEFAULT_TASK_COLOR,
};

/// Storage keys for each record collection.
pub mod keys {
    pub const HABITS: &str = "habitree-habits";
    pub const TASKS: &str = "habitree-tasks";
    pub const SESSIONS: &str = "pomodoro-sessions";
    pub const JOURNAL: &str = "journal-entries";
    pub const SERIES: &str = "analytics-series";
}

/// Millisecond timestamp id, bumped past any id already in use.
fn next_id(existing: impl Iterator<Item = u64>, now: DateTime<Utc>) -> u64 {
    let candidate = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    match existing.max() {
        Some(max) if max >= candidate => max + 1,
        _ => candidate,
    }
}

// ============================================
// Habits
// ============================================

#[derive(Debug, Clone, Default)]
pub struct HabitStore {
    habits: Vec<Habit>,
}

impl HabitStore {
    /// Wrap stored habits, refreshing every cached streak.
    pub fn new(habits: Vec<Habit>, today: DayKey) -> Self {
        let mut store = Self { habits };
        store.recalculate_all(today);
        store
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: u64) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Habit> {
        self.habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(Error::HabitNotFound(id))
    }

    /// Create a habit. New habits are listed first.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        category: HabitCategory,
        now: DateTime<Utc>,
    ) -> Habit {
        let id = next_id(self.habits.iter().map(|h| h.id), now);
        let habit = Habit::new(id, title, description, category, now);
        tracing::info!(habit_id = id, category = %category, "Added habit");
        self.habits.insert(0, habit.clone());
        habit
    }

    /// Replace a habit by id and refresh its streaks.
    pub fn update(&mut self, habit: Habit, today: DayKey) -> Result<Streaks> {
        let slot = self.get_mut(habit.id)?;
        *slot = habit;
        Ok(slot.recalculate(today))
    }

    pub fn delete(&mut self, id: u64) -> Result<Habit> {
        let index = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or(Error::HabitNotFound(id))?;
        tracing::info!(habit_id = id, "Deleted habit");
        Ok(self.habits.remove(index))
    }

    /// Flip the completion flag for `day` and refresh the streaks.
    pub fn toggle_completion(&mut self, id: u64, day: DayKey, today: DayKey) -> Result<Streaks> {
        let habit = self.get_mut(id)?;
        let done = !habit.is_completed_on(day);
        habit.completions.insert(day, done);
        let streaks = habit.recalculate(today);
        tracing::debug!(
            habit_id = id,
            day = %day,
            done,
            current = streaks.current,
            longest = streaks.longest,
            "Toggled habit completion"
        );
        Ok(streaks)
    }

    pub fn recalculate_all(&mut self, today: DayKey) {
        for habit in &mut self.habits {
            habit.recalculate(today);
        }
    }
}

// ============================================
// Tasks
// ============================================

/// Tasks, kept ordered by due date.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut store = Self { tasks };
        store.sort();
        store
    }

    fn sort(&mut self) {
        self.tasks.sort_by_key(|t| t.due_date);
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    pub fn add(&mut self, new_task: NewTask, now: DateTime<Utc>) -> Task {
        let id = next_id(self.tasks.iter().map(|t| t.id), now);
        let task = Task {
            id,
            title: new_task.title,
            description: new_task.description,
            priority: new_task.priority,
            due_date: new_task.due_date,
            status: TaskStatus::ToDo,
            focus_time: 0,
            pomodoros: 0,
            all_day: Some(true),
            color: Some(DEFAULT_TASK_COLOR.to_string()),
        };
        tracing::info!(task_id = id, due = %task.due_date, "Added task");
        self.tasks.insert(0, task.clone());
        self.sort();
        task
    }

    pub fn update(&mut self, task: Task) -> Result<()> {
        let slot = self.get_mut(task.id)?;
        *slot = task;
        self.sort();
        Ok(())
    }

    pub fn delete(&mut self, id: u64) -> Result<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        tracing::info!(task_id = id, "Deleted task");
        Ok(self.tasks.remove(index))
    }

    pub fn set_status(&mut self, id: u64, status: TaskStatus) -> Result<()> {
        let task = self.get_mut(id)?;
        tracing::debug!(task_id = id, from = %task.status, to = %status, "Task status changed");
        task.status = status;
        Ok(())
    }

    /// Credit one pomodoro and its focus minutes (rounded) to a task.
    pub fn log_pomodoro(&mut self, id: u64, duration_secs: u32) -> Result<()> {
        let task = self.get_mut(id)?;
        task.pomodoros = task.pomodoros.saturating_add(1);
        task.focus_time = task
            .focus_time
            .saturating_add(duration_secs.saturating_add(30) / 60);
        Ok(())
    }
}

// ============================================
// Pomodoro sessions
// ============================================

/// Append-only session log.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    sessions: Vec<PomodoroSession>,
}

impl SessionLog {
    pub fn new(sessions: Vec<PomodoroSession>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &[PomodoroSession] {
        &self.sessions
    }

    pub fn append(&mut self, session: PomodoroSession) {
        tracing::debug!(
            at = %session.date,
            duration = session.duration,
            task_id = ?session.task_id,
            "Logged pomodoro session"
        );
        self.sessions.push(session);
    }

    /// Sessions on `today` plus the current focus streak.
    pub fn stats<Tz: TimeZone>(&self, today: DayKey, tz: &Tz) -> PomodoroStats {
        let today_count = self
            .sessions
            .iter()
            .filter(|s| day_key_in(&s.date, tz) == today)
            .count();
        PomodoroStats {
            sessions_completed_today: u32::try_from(today_count).unwrap_or(u32::MAX),
            focus_streak: focus_streak(&self.sessions, today, tz),
        }
    }
}

// ============================================
// Journal
// ============================================

/// Journal entries, newest first.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new(entries: Vec<JournalEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn get(&self, id: u64) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn add(
        &mut self,
        content: impl Into<String>,
        mood: Option<String>,
        insights: Option<Vec<String>>,
        now: DateTime<Utc>,
    ) -> JournalEntry {
        let id = next_id(self.entries.iter().map(|e| e.id), now);
        let entry = JournalEntry {
            id,
            date: now,
            content: content.into(),
            mood,
            insights,
        };
        tracing::info!(entry_id = id, mood = ?entry.mood, "Added journal entry");
        self.entries.insert(0, entry.clone());
        entry
    }

    pub fn update(&mut self, entry: JournalEntry) -> Result<()> {
        let slot = self
            .entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or(Error::EntryNotFound(entry.id))?;
        *slot = entry;
        Ok(())
    }
}

// ============================================
// Daily analytics series
// ============================================

/// Per-day time and mood samples, one of each per day key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSeries {
    #[serde(default)]
    pub time_series: Vec<TimeEntry>,
    #[serde(default)]
    pub mood_productivity: Vec<MoodEntry>,
}

impl AnalyticsSeries {
    /// The stored time entry for `day`, if any.
    pub fn time_entry(&self, day: DayKey) -> Option<&TimeEntry> {
        self.time_series
            .binary_search_by_key(&day, |e| e.date)
            .ok()
            .map(|index| &self.time_series[index])
    }

    /// The stored mood entry for `day`, if any.
    pub fn mood_entry(&self, day: DayKey) -> Option<&MoodEntry> {
        self.mood_productivity
            .binary_search_by_key(&day, |e| e.date)
            .ok()
            .map(|index| &self.mood_productivity[index])
    }

    /// Insert or replace the time entry for its day.
    pub fn upsert_time_entry(&mut self, entry: TimeEntry) {
        match self.time_series.binary_search_by_key(&entry.date, |e| e.date) {
            Ok(index) => self.time_series[index] = entry,
            Err(index) => self.time_series.insert(index, entry),
        }
    }

    /// Insert or replace the mood entry for its day.
    pub fn upsert_mood_entry(&mut self, entry: MoodEntry) {
        match self
            .mood_productivity
            .binary_search_by_key(&entry.date, |e| e.date)
        {
            Ok(index) => self.mood_productivity[index] = entry,
            Err(index) => self.mood_productivity.insert(index, entry),
        }
    }

    /// Restore day order and drop duplicate days (last one wins).
    fn normalize(&mut self) {
        fn dedup_by_day<T: Copy>(items: &mut Vec<T>, day: impl Fn(&T) -> DayKey) {
            let mut kept: Vec<T> = Vec::with_capacity(items.len());
            for item in items.drain(..) {
                match kept.iter().position(|k| day(k) == day(&item)) {
                    Some(index) => kept[index] = item,
                    None => kept.push(item),
                }
            }
            kept.sort_by_key(|k| day(k));
            *items = kept;
        }
        dedup_by_day(&mut self.time_series, |e| e.date);
        dedup_by_day(&mut self.mood_productivity, |e| e.date);
    }
}

// ============================================
// Workspace
// ============================================

/// All record stores, loaded from and saved to one key-value store.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub habits: HabitStore,
    pub tasks: TaskStore,
    pub sessions: SessionLog,
    pub journal: Journal,
    pub series: AnalyticsSeries,
}

/// Missing keys load as empty; undecodable ones are logged and treated as empty.
fn load_or_default<T, S>(store: &S, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match load_json(store, key) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Ok(T::default()),
        Err(Error::Json(e)) => {
            tracing::warn!(key, error = %e, "Stored records are unreadable, starting empty");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

impl Workspace {
    /// Load every collection and refresh derived habit streaks.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, today: DayKey) -> Result<Self> {
        let habits: Vec<Habit> = load_or_default(store, keys::HABITS)?;
        let tasks: Vec<Task> = load_or_default(store, keys::TASKS)?;
        let sessions: Vec<PomodoroSession> = load_or_default(store, keys::SESSIONS)?;
        let entries: Vec<JournalEntry> = load_or_default(store, keys::JOURNAL)?;
        let mut series: AnalyticsSeries = load_or_default(store, keys::SERIES)?;
        series.normalize();

        tracing::debug!(
            habits = habits.len(),
            tasks = tasks.len(),
            sessions = sessions.len(),
            journal = entries.len(),
            "Loaded workspace"
        );

        Ok(Self {
            habits: HabitStore::new(habits, today),
            tasks: TaskStore::new(tasks),
            sessions: SessionLog::new(sessions),
            journal: Journal::new(entries),
            series,
        })
    }

    /// Persist every collection.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        save_json(store, keys::HABITS, self.habits.habits())?;
        save_json(store, keys::TASKS, self.tasks.tasks())?;
        save_json(store, keys::SESSIONS, self.sessions.sessions())?;
        save_json(store, keys::JOURNAL, self.journal.entries())?;
        save_json(store, keys::SERIES, &self.series)?;
        Ok(())
    }

    /// Append a session and credit its linked task, if that task still exists.
    pub fn log_session(&mut self, session: PomodoroSession) {
        if let Some(task_id) = session.task_id {
            if let Err(e) = self.tasks.log_pomodoro(task_id, session.duration) {
                tracing::warn!(task_id, error = %e, "Session linked to a missing task");
            }
        }
        self.sessions.append(session);
    }

    /// Borrowed view of every collection for the analytics functions.
    pub fn snapshot(&self) -> AnalyticsSnapshot<'_> {
        AnalyticsSnapshot {
            habits: self.habits.habits(),
            tasks: self.tasks.tasks(),
            sessions: self.sessions.sessions(),
            journal: self.journal.entries(),
            time_series: &self.series.time_series,
            mood_productivity: &self.series.mood_productivity,
        }
    }
}
