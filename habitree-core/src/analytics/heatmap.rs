//! Focus heatmap: session counts by local weekday and hour.

use std::ops::RangeInclusive;

use chrono::{Datelike, TimeZone, Timelike};

use crate::date::WEEKDAY_LABELS;
use crate::types::{HeatmapCell, PomodoroSession};

/// Cells in the dense 7×24 grid.
pub const HEATMAP_CELLS: usize = 7 * 24;

/// Bucket sessions by (weekday, hour) in `tz`.
///
/// Always returns all 168 cells, Sunday first, hours ascending within a day.
pub fn build_heatmap<Tz: TimeZone>(sessions: &[PomodoroSession], tz: &Tz) -> Vec<HeatmapCell> {
    let mut grid = [[0u32; 24]; 7];

    for session in sessions {
        let local = session.date.with_timezone(tz);
        let day = local.weekday().num_days_from_sunday() as usize;
        let hour = local.hour() as usize;
        grid[day][hour] += 1;
    }

    let mut cells = Vec::with_capacity(HEATMAP_CELLS);
    for (day, hours) in grid.iter().enumerate() {
        for (hour, &value) in hours.iter().enumerate() {
            cells.push(HeatmapCell {
                day: WEEKDAY_LABELS[day],
                hour: hour as u8,
                value,
            });
        }
    }
    cells
}

/// Sum of all cell values.
pub fn total_intensity(cells: &[HeatmapCell]) -> u32 {
    cells.iter().map(|c| c.value).sum()
}

/// The busiest cell, first one on ties; `None` when every cell is empty.
pub fn peak_cell(cells: &[HeatmapCell]) -> Option<&HeatmapCell> {
    cells
        .iter()
        .filter(|c| c.value > 0)
        .fold(None, |best: Option<&HeatmapCell>, cell| match best {
            Some(b) if b.value >= cell.value => Some(b),
            _ => Some(cell),
        })
}

/// Mean cell value over the given hours of every weekday.
///
/// An empty selection divides by one, yielding zero.
pub fn mean_intensity(cells: &[HeatmapCell], hours: RangeInclusive<u8>) -> f64 {
    let (sum, count) = cells
        .iter()
        .filter(|c| hours.contains(&c.hour))
        .fold((0u64, 0u64), |(sum, count), c| (sum + c.value as u64, count + 1));
    sum as f64 / count.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, Utc};

    fn session(date: DateTime<Utc>) -> PomodoroSession {
        PomodoroSession {
            date,
            task_id: None,
            interruptions: 0,
            duration: 1500,
        }
    }

    #[test]
    fn test_empty_log_gives_dense_zero_grid() {
        let cells = build_heatmap(&[], &Utc);
        assert_eq!(cells.len(), HEATMAP_CELLS);
        assert!(cells.iter().all(|c| c.value == 0));
        assert_eq!(cells[0].day, "Sun");
        assert_eq!(cells[0].hour, 0);
        assert_eq!(cells[167].day, "Sat");
        assert_eq!(cells[167].hour, 23);
        assert!(peak_cell(&cells).is_none());
    }

    #[test]
    fn test_two_monday_mornings_land_in_one_cell() {
        // 2024-01-08 and 2024-01-15 are Mondays.
        let sessions = vec![
            session(Utc.with_ymd_and_hms(2024, 1, 8, 9, 5, 0).unwrap()),
            session(Utc.with_ymd_and_hms(2024, 1, 15, 9, 40, 0).unwrap()),
        ];
        let cells = build_heatmap(&sessions, &Utc);

        let monday_nine = cells
            .iter()
            .find(|c| c.day == "Mon" && c.hour == 9)
            .unwrap();
        assert_eq!(monday_nine.value, 2);
        assert_eq!(total_intensity(&cells), 2);
        assert_eq!(peak_cell(&cells), Some(monday_nine));
    }

    #[test]
    fn test_buckets_use_target_zone() {
        // Sunday 23:30 UTC is Monday 01:30 at UTC+2.
        let sessions = vec![session(Utc.with_ymd_and_hms(2024, 1, 7, 23, 30, 0).unwrap())];
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let cells = build_heatmap(&sessions, &tz);
        let hit: Vec<_> = cells.iter().filter(|c| c.value > 0).collect();
        assert_eq!(hit.len(), 1);
        assert_eq!((hit[0].day, hit[0].hour), ("Mon", 1));
    }

    #[test]
    fn test_cell_sum_matches_session_count() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let sessions: Vec<_> = (0..50)
            .map(|i| session(start + chrono::Duration::minutes(i * 97)))
            .collect();
        let cells = build_heatmap(&sessions, &Utc);
        assert_eq!(cells.len(), HEATMAP_CELLS);
        assert_eq!(total_intensity(&cells), 50);
    }

    #[test]
    fn test_mean_intensity_over_hours() {
        let sessions = vec![
            session(Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap()),
            session(Utc.with_ymd_and_hms(2024, 1, 9, 10, 0, 0).unwrap()),
        ];
        let cells = build_heatmap(&sessions, &Utc);
        assert!((mean_intensity(&cells, 8..=11) - 2.0 / 28.0).abs() < 1e-12);
        assert_eq!(mean_intensity(&cells, 13..=16), 0.0);
        assert_eq!(mean_intensity(&[], 8..=11), 0.0);
    }
}
