//! habitree - habits, tasks and focus analytics from the terminal
//!
//! Every command loads the record stores, applies at most one mutation,
//! saves if something changed, and prints the result.

mod report;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use habitree_core::date::to_day_key;
use habitree_core::storage::FileStore;
use habitree_core::{
    Config, DateRange, DayKey, HabitCategory, MoodEntry, NewTask, PomodoroMode, PomodoroSession,
    TaskPriority, TaskStatus, TimeEntry, Workspace,
};

/// Mood score stored when only productivity is given for a new day.
const NEUTRAL_MOOD: u8 = 3;

#[derive(Parser)]
#[command(name = "habitree")]
#[command(about = "Track habits, tasks and pomodoro focus, and see how your days add up")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Manage habits
    Habit {
        #[command(subcommand)]
        action: HabitAction,
    },
    /// Manage tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Log pomodoro sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Write and read journal entries
    Journal {
        #[command(subcommand)]
        action: JournalAction,
    },
    /// Record daily work and mood samples
    Series {
        #[command(subcommand)]
        action: SeriesAction,
    },
    /// Today's KPIs
    Dashboard {
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Windowed analytics with insights
    Analytics {
        /// daily, weekly or monthly (default from config)
        #[arg(short, long)]
        range: Option<DateRange>,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum HabitAction {
    /// Create a daily habit
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Health, Productivity, Learning, Personal or Finance
        #[arg(short, long, default_value = "Personal")]
        category: HabitCategory,
    },
    /// Flip a habit's completion for a day (default today)
    Toggle {
        id: u64,
        #[arg(long)]
        date: Option<DayKey>,
    },
    /// List habits with their streaks
    List {
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Delete a habit
    Delete { id: u64 },
}

#[derive(Subcommand)]
enum TaskAction {
    /// Create a task
    Add {
        title: String,
        /// Due date, YYYY-MM-DD (default today)
        #[arg(long)]
        due: Option<DayKey>,
        #[arg(short, long, default_value = "Medium")]
        priority: TaskPriority,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Move a task to another status ("To Do", "In Progress", "Done")
    Status { id: u64, status: TaskStatus },
    /// List tasks by due date
    List {
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Delete a task
    Delete { id: u64 },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Log a finished pomodoro
    Log {
        /// Task to credit with the focus time
        #[arg(short, long)]
        task: Option<u64>,
        /// Session length (default: configured pomodoro length)
        #[arg(short, long)]
        minutes: Option<u32>,
        #[arg(short, long, default_value_t = 0)]
        interruptions: u32,
    },
    /// Sessions today and the focus streak
    Stats,
}

#[derive(Subcommand)]
enum JournalAction {
    /// Write an entry
    Add {
        content: String,
        #[arg(short, long)]
        mood: Option<String>,
    },
    /// Show entries, newest first
    List {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum SeriesAction {
    /// Record one day's samples; flags left out keep their stored values
    Record {
        #[arg(long)]
        date: Option<DayKey>,
        #[arg(long)]
        completed: Option<u32>,
        #[arg(long)]
        created: Option<u32>,
        #[arg(long)]
        planned: Option<u32>,
        #[arg(long)]
        reactive: Option<u32>,
        /// Mood score, 1-5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        mood: Option<u8>,
        /// Productivity score, 0-100
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
        productivity: Option<u32>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard =
        habitree_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let now = Local::now();
    let today = to_day_key(&now);

    let data_dir = config.data_dir();
    tracing::debug!(path = %data_dir.display(), "Opening record store");
    let mut store = FileStore::open(&data_dir).context("failed to open record store")?;
    let mut workspace = Workspace::load(&store, today).context("failed to load records")?;

    let changed = run(args.command, &mut workspace, &config, now)?;

    if changed {
        workspace.save(&mut store).context("failed to save records")?;
    }

    Ok(())
}

/// Execute one command. Returns whether records were modified.
fn run(
    command: Command,
    workspace: &mut Workspace,
    config: &Config,
    now: DateTime<Local>,
) -> Result<bool> {
    let today = to_day_key(&now);
    let now_utc: DateTime<Utc> = now.with_timezone(&Utc);

    match command {
        Command::Habit { action } => match action {
            HabitAction::Add {
                title,
                description,
                category,
            } => {
                let habit = workspace.habits.add(title, description, category, now_utc);
                println!("Added habit {} ({}) [{}]", habit.title, habit.id, category);
                Ok(true)
            }
            HabitAction::Toggle { id, date } => {
                let day = date.unwrap_or(today);
                let streaks = workspace.habits.toggle_completion(id, day, today)?;
                let done = workspace
                    .habits
                    .get(id)
                    .map(|h| h.is_completed_on(day))
                    .unwrap_or(false);
                println!(
                    "{} {}: current streak {}, longest {}",
                    if done { "Completed" } else { "Cleared" },
                    day,
                    streaks.current,
                    streaks.longest
                );
                Ok(true)
            }
            HabitAction::List { format } => {
                let json = format == OutputFormat::Json;
                report::print_habits(workspace.habits.habits(), today, json)?;
                Ok(false)
            }
            HabitAction::Delete { id } => {
                let habit = workspace.habits.delete(id)?;
                println!("Deleted habit {}", habit.title);
                Ok(true)
            }
        },

        Command::Task { action } => match action {
            TaskAction::Add {
                title,
                due,
                priority,
                description,
            } => {
                let task = workspace.tasks.add(
                    NewTask {
                        title,
                        description,
                        priority,
                        due_date: due.unwrap_or(today),
                    },
                    now_utc,
                );
                println!("Added task {} ({}) due {}", task.title, task.id, task.due_date);
                Ok(true)
            }
            TaskAction::Status { id, status } => {
                workspace.tasks.set_status(id, status)?;
                println!("Task {} is now {}", id, status);
                Ok(true)
            }
            TaskAction::List { format } => {
                let json = format == OutputFormat::Json;
                report::print_tasks(workspace.tasks.tasks(), today, json)?;
                Ok(false)
            }
            TaskAction::Delete { id } => {
                let task = workspace.tasks.delete(id)?;
                println!("Deleted task {}", task.title);
                Ok(true)
            }
        },

        Command::Session { action } => match action {
            SessionAction::Log {
                task,
                minutes,
                interruptions,
            } => {
                if let Some(task_id) = task {
                    if workspace.tasks.get(task_id).is_none() {
                        anyhow::bail!("No task with id {}", task_id);
                    }
                }
                let duration = minutes
                    .map(|m| m.saturating_mul(60))
                    .unwrap_or_else(|| config.pomodoro.duration_for(PomodoroMode::Pomodoro));
                workspace.log_session(PomodoroSession {
                    date: now_utc,
                    task_id: task,
                    interruptions,
                    duration,
                });
                let stats = workspace.sessions.stats(today, &Local);
                println!(
                    "Logged {} focus session. Today: {} session(s), focus streak {} day(s)",
                    habitree_core::format::format_minutes(duration as f64 / 60.0),
                    stats.sessions_completed_today,
                    stats.focus_streak
                );
                let next = config
                    .pomodoro
                    .next_mode(PomodoroMode::Pomodoro, stats.sessions_completed_today);
                println!(
                    "Next up: {} ({})",
                    mode_label(next),
                    habitree_core::format::format_minutes(
                        config.pomodoro.duration_for(next) as f64 / 60.0
                    )
                );
                Ok(true)
            }
            SessionAction::Stats => {
                let stats = workspace.sessions.stats(today, &Local);
                println!("Sessions today: {}", stats.sessions_completed_today);
                println!("Focus streak:   {} day(s)", stats.focus_streak);
                Ok(false)
            }
        },

        Command::Journal { action } => match action {
            JournalAction::Add { content, mood } => {
                let entry = workspace.journal.add(content, mood, None, now_utc);
                println!("Saved journal entry {}", entry.id);
                Ok(true)
            }
            JournalAction::List { limit } => {
                report::print_journal(workspace.journal.entries(), limit);
                Ok(false)
            }
        },

        Command::Series { action } => match action {
            SeriesAction::Record {
                date,
                completed,
                created,
                planned,
                reactive,
                mood,
                productivity,
            } => {
                let day = date.unwrap_or(today);
                let counts = [completed, created, planned, reactive];
                let has_counts = counts.iter().any(Option::is_some);
                if !has_counts && mood.is_none() && productivity.is_none() {
                    anyhow::bail!("Nothing to record for {}", day);
                }

                if has_counts {
                    let stored = workspace.series.time_entry(day).copied();
                    let base = stored.unwrap_or(TimeEntry {
                        date: day,
                        completed: 0,
                        created: 0,
                        planned: 0,
                        reactive: 0,
                    });
                    workspace.series.upsert_time_entry(TimeEntry {
                        date: day,
                        completed: completed.unwrap_or(base.completed),
                        created: created.unwrap_or(base.created),
                        planned: planned.unwrap_or(base.planned),
                        reactive: reactive.unwrap_or(base.reactive),
                    });
                }

                if mood.is_some() || productivity.is_some() {
                    let stored = workspace.series.mood_entry(day).copied();
                    workspace.series.upsert_mood_entry(MoodEntry {
                        date: day,
                        mood_score: mood
                            .or(stored.map(|e| e.mood_score))
                            .unwrap_or(NEUTRAL_MOOD),
                        productivity_score: productivity
                            .or(stored.map(|e| e.productivity_score))
                            .unwrap_or(0),
                    });
                }
                println!("Recorded samples for {}", day);
                Ok(true)
            }
        },

        Command::Dashboard { format } => {
            report::print_dashboard(workspace, config, now, format == OutputFormat::Json)?;
            Ok(false)
        }

        Command::Analytics { range, format } => {
            let range = range.unwrap_or(config.dashboard.default_range);
            report::print_analytics(workspace, range, now, format == OutputFormat::Json)?;
            Ok(false)
        }
    }
}

fn mode_label(mode: PomodoroMode) -> &'static str {
    match mode {
        PomodoroMode::Pomodoro => "focus",
        PomodoroMode::ShortBreak => "short break",
        PomodoroMode::LongBreak => "long break",
    }
}
