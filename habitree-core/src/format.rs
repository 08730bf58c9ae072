//! Formatting helpers shared by front ends.

use crate::date::DayKey;

/// Format minutes as hours and minutes (e.g., "1h 05m", "40m").
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    let hours = total / 60;
    let mins = total % 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Format a day relative to today (e.g., "today", "3d ago", "in 2d").
pub fn format_relative_day(day: DayKey, today: DayKey) -> String {
    match day.days_until(today) {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        -1 => "tomorrow".to_string(),
        n if n > 1 && n < 7 => format!("{}d ago", n),
        n if n < -1 && n > -7 => format!("in {}d", -n),
        _ => day.date().format("%b %d").to_string(),
    }
}

/// Format an hour of day as a one-hour span (e.g., "9am-10am").
pub fn format_hour_span(hour: u8) -> String {
    let label = |h: u8| -> String {
        match h % 24 {
            0 => "12am".to_string(),
            h @ 1..=11 => format!("{}am", h),
            12 => "12pm".to_string(),
            h => format!("{}pm", h - 12),
        }
    };
    format!("{}-{}", label(hour), label(hour.wrapping_add(1) % 24))
}

/// Render a percentage as a fixed-width text bar.
pub fn percent_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(40.0), "40m");
        assert_eq!(format_minutes(65.4), "1h 05m");
        assert_eq!(format_minutes(-3.0), "0m");
    }

    #[test]
    fn test_format_relative_day() {
        let today = key("2024-06-15");
        assert_eq!(format_relative_day(today, today), "today");
        assert_eq!(format_relative_day(key("2024-06-14"), today), "yesterday");
        assert_eq!(format_relative_day(key("2024-06-16"), today), "tomorrow");
        assert_eq!(format_relative_day(key("2024-06-12"), today), "3d ago");
        assert_eq!(format_relative_day(key("2024-06-17"), today), "in 2d");
        assert_eq!(format_relative_day(key("2024-05-01"), today), "May 01");
    }

    #[test]
    fn test_format_hour_span() {
        assert_eq!(format_hour_span(0), "12am-1am");
        assert_eq!(format_hour_span(9), "9am-10am");
        assert_eq!(format_hour_span(12), "12pm-1pm");
        assert_eq!(format_hour_span(23), "11pm-12am");
    }

    #[test]
    fn test_percent_bar() {
        assert_eq!(percent_bar(50.0, 10), "#####.....");
        assert_eq!(percent_bar(150.0, 4), "####");
        assert_eq!(percent_bar(0.0, 3), "...");
    }
}
