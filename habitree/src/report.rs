//! Text and JSON rendering for the read-only commands.

use anyhow::Result;
use chrono::{DateTime, Local};
use habitree_core::analytics::heatmap::{peak_cell, total_intensity};
use habitree_core::analytics::{
    category_breakdown, daily_focus_minutes, dashboard_kpis, derive_insights, filtered_data,
    planned_vs_reactive, top_habit_consistency,
};
use habitree_core::date::to_day_key;
use habitree_core::format::{format_hour_span, format_minutes, format_relative_day, percent_bar};
use habitree_core::{Config, DateRange, DayKey, Habit, JournalEntry, Task, Workspace};
use serde_json::json;

const BAR_WIDTH: usize = 20;

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================
// Record listings
// ============================================

pub fn print_habits(habits: &[Habit], today: DayKey, json: bool) -> Result<()> {
    if json {
        return print_json(&habits);
    }
    if habits.is_empty() {
        println!("No habits yet. Add one with `habitree habit add <title>`.");
        return Ok(());
    }

    println!(
        "{:<15} {:<24} {:<13} {:>5} {:>7} {:>6}",
        "ID", "TITLE", "CATEGORY", "TODAY", "CURRENT", "BEST"
    );
    for habit in habits {
        println!(
            "{:<15} {:<24} {:<13} {:>5} {:>7} {:>6}",
            habit.id,
            truncate(&habit.title, 24),
            habit.category.as_str(),
            if habit.is_completed_on(today) { "x" } else { "-" },
            habit.current_streak,
            habit.longest_streak
        );
    }
    Ok(())
}

pub fn print_tasks(tasks: &[Task], today: DayKey, json: bool) -> Result<()> {
    if json {
        return print_json(&tasks);
    }
    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    println!(
        "{:<15} {:<28} {:<12} {:<8} {:>10} {:>6}",
        "ID", "TITLE", "STATUS", "PRIORITY", "DUE", "FOCUS"
    );
    for task in tasks {
        println!(
            "{:<15} {:<28} {:<12} {:<8} {:>10} {:>6}",
            task.id,
            truncate(&task.title, 28),
            task.status.as_str(),
            format!("{:?}", task.priority),
            format_relative_day(task.due_date, today),
            format_minutes(task.focus_time as f64)
        );
    }
    Ok(())
}

pub fn print_journal(entries: &[JournalEntry], limit: usize) {
    if entries.is_empty() {
        println!("The journal is empty.");
        return;
    }
    for entry in entries.iter().take(limit) {
        let written = entry.date.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        match entry.mood.as_deref().filter(|m| !m.trim().is_empty()) {
            Some(mood) => println!("{} ({})", written, mood),
            None => println!("{}", written),
        }
        println!("  {}", entry.content);
    }
}

// ============================================
// Dashboard
// ============================================

pub fn print_dashboard(
    workspace: &Workspace,
    config: &Config,
    now: DateTime<Local>,
    json: bool,
) -> Result<()> {
    let today = to_day_key(&now);
    let snapshot = workspace.snapshot();
    let kpis = dashboard_kpis(&snapshot, &now);
    let stats = workspace.sessions.stats(today, &Local);
    let top = top_habit_consistency(snapshot.habits, today, config.dashboard.top_habits);

    if json {
        return print_json(&json!({
            "date": today,
            "kpis": kpis,
            "pomodoro": stats,
            "topHabits": top,
        }));
    }

    println!("Dashboard for {}", today);
    println!();
    println!(
        "  Tasks completed   {} ({:.0}%)",
        kpis.tasks_completed.value, kpis.tasks_completed.percentage
    );
    println!("  Focus time        {}", format_minutes(kpis.focus_time));
    println!(
        "  Reactive work     {} {:.0}%",
        percent_bar(kpis.reactive_work, BAR_WIDTH),
        kpis.reactive_work
    );
    println!(
        "  Habit consistency {} {:.0}%",
        percent_bar(kpis.habit_consistency, BAR_WIDTH),
        kpis.habit_consistency
    );
    println!(
        "  Mood index        {} {:.0}",
        percent_bar(kpis.mood_index, BAR_WIDTH),
        kpis.mood_index
    );
    println!("  Productivity      {}", kpis.productivity_score);
    println!();
    println!(
        "  Pomodoros today {}, focus streak {} day(s)",
        stats.sessions_completed_today, stats.focus_streak
    );

    if !top.is_empty() {
        println!();
        println!("Top habits");
        for habit in &top {
            println!(
                "  {:<24} streak {:>3} (best {:>3})  {:.0}% this week",
                truncate(&habit.title, 24),
                habit.current_streak,
                habit.longest_streak,
                habit.completion_rate
            );
        }
    }
    Ok(())
}

// ============================================
// Analytics
// ============================================

pub fn print_analytics(
    workspace: &Workspace,
    range: DateRange,
    now: DateTime<Local>,
    json: bool,
) -> Result<()> {
    let snapshot = workspace.snapshot();
    let window = filtered_data(&snapshot, range, &now);
    let insights = derive_insights(&window);
    let focus = daily_focus_minutes(&window, &Local);
    let split = planned_vs_reactive(&window);
    let categories = category_breakdown(&window.habits);

    tracing::debug!(
        range = %range,
        insights = insights.len(),
        "Rendering analytics"
    );

    if json {
        let messages: Vec<String> = insights.iter().map(|i| i.message()).collect();
        let daily_focus: Vec<_> = focus
            .iter()
            .map(|(day, minutes)| json!({ "date": day, "minutes": minutes }))
            .collect();
        return print_json(&json!({
            "window": window,
            "insights": messages,
            "dailyFocus": daily_focus,
            "plannedVsReactive": split,
            "categories": categories,
        }));
    }

    println!("{} analytics since {}", capitalize(range.as_str()), window.start);
    println!();

    println!("Insights");
    for insight in &insights {
        println!("  * {}", insight);
    }

    if !focus.is_empty() {
        println!();
        println!("Daily focus");
        for (day, minutes) in &focus {
            println!("  {}  {}", day, format_minutes(*minutes));
        }
    }

    println!();
    println!(
        "Planned vs reactive: {} planned, {} reactive",
        split.planned, split.reactive
    );

    println!(
        "Sessions in window: {} (all-time heatmap total {})",
        window.sessions.len(),
        total_intensity(&window.focus_heatmap)
    );
    if let Some(peak) = peak_cell(&window.focus_heatmap) {
        println!(
            "Busiest slot: {} {} ({} sessions)",
            peak.day,
            format_hour_span(peak.hour),
            peak.value
        );
    }

    if !categories.is_empty() {
        println!();
        println!("Habits by category");
        for entry in &categories {
            println!("  {:<13} {}", entry.category.as_str(), entry.count);
        }
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
