//! Calendar day keys.
//!
//! Per-day data (habit completions, daily time series, due dates) is keyed by
//! the user's **local** calendar day, formatted as `YYYY-MM-DD`. Streaks are
//! counted in local days, so converting an instant to a key always goes
//! through a time zone.
//!
//! Day differences are taken between the two days at 12:00 local time and
//! rounded to whole days. On a daylight-saving transition a "day" is 23 or
//! 25 hours long; measuring noon to noon keeps such a pair exactly one day
//! apart instead of slipping to zero or two.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Short weekday labels, indexed 0=Sunday..6=Saturday.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A local calendar day, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// strftime pattern of the textual form.
    pub const FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(date: NaiveDate) -> Self {
        DayKey(date)
    }

    /// Build a key from its parts, `None` for an impossible date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(DayKey)
    }

    /// Today's key according to the system clock and local time zone.
    pub fn today() -> Self {
        to_day_key(&Local::now())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The previous calendar day, `None` at the start of the representable range.
    pub fn pred(self) -> Option<Self> {
        self.0.pred_opt().map(DayKey)
    }

    /// This day minus `n` days, saturating at the earliest representable date.
    pub fn minus_days(self, n: u64) -> Self {
        DayKey(self.0.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN))
    }

    /// This day plus `n` days, saturating at the latest representable date.
    pub fn plus_days(self, n: u64) -> Self {
        DayKey(self.0.checked_add_days(Days::new(n)).unwrap_or(NaiveDate::MAX))
    }

    /// Whole days from `self` to `other` in the local time zone.
    ///
    /// Positive when `other` is later.
    pub fn days_until(self, other: DayKey) -> i64 {
        days_between_in(self, other, &Local)
    }

    /// True iff `next` is exactly one calendar day after `self`.
    pub fn is_followed_by(self, next: DayKey) -> bool {
        self.days_until(next) == 1
    }

    /// Day of week, 0=Sunday..6=Saturday.
    pub fn weekday_index(&self) -> u8 {
        self.0.weekday().num_days_from_sunday() as u8
    }

    /// Short weekday label (`Mon`, `Tue`, ...).
    pub fn weekday_label(&self) -> &'static str {
        WEEKDAY_LABELS[self.weekday_index() as usize]
    }

    /// The first instant of this day in `tz`.
    pub fn start_of_day<Tz: TimeZone>(self, tz: &Tz) -> DateTime<Tz> {
        let midnight = self.0.and_time(NaiveTime::MIN);
        // A DST jump can skip local midnight; fall back to reading it as UTC.
        tz.from_local_datetime(&midnight)
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
    }

    /// 12:00 of this day in `tz`, the reference point for day arithmetic.
    pub fn noon<Tz: TimeZone>(self, tz: &Tz) -> Option<DateTime<Tz>> {
        let noon = NaiveTime::from_hms_opt(12, 0, 0)?;
        tz.from_local_datetime(&self.0.and_time(noon)).earliest()
    }
}

/// Whole days from `a` to `b`, both pinned to noon in `tz` before differencing.
pub fn days_between_in<Tz: TimeZone>(a: DayKey, b: DayKey, tz: &Tz) -> i64 {
    match (a.noon(tz), b.noon(tz)) {
        (Some(noon_a), Some(noon_b)) => {
            let secs = noon_b.signed_duration_since(noon_a).num_seconds();
            (secs as f64 / SECONDS_PER_DAY).round() as i64
        }
        _ => b.0.signed_duration_since(a.0).num_days(),
    }
}

/// The calendar day an instant falls on, in the instant's own time zone.
pub fn to_day_key<Tz: TimeZone>(instant: &DateTime<Tz>) -> DayKey {
    DayKey(instant.date_naive())
}

/// The calendar day an instant falls on when viewed from `tz`.
pub fn day_key_in<Tz: TimeZone, Src: TimeZone>(instant: &DateTime<Src>, tz: &Tz) -> DayKey {
    to_day_key(&instant.with_timezone(tz))
}

/// `today` minus `n` days.
pub fn days_ago(today: DayKey, n: u64) -> DayKey {
    today.minus_days(n)
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // Accept full ISO timestamps too; only the date prefix matters.
        let trimmed = s.trim();
        let prefix = match (trimmed.get(..10), trimmed.get(10..)) {
            (Some(date), Some(rest)) if rest.is_empty() || rest.starts_with('T') => date,
            _ => return Err(Error::InvalidDayKey(s.to_string())),
        };
        NaiveDate::parse_from_str(prefix, Self::FORMAT)
            .map(DayKey)
            .map_err(|_| Error::InvalidDayKey(s.to_string()))
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        DayKey(date)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
