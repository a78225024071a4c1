//! Time-of-day parsing and display formatting.

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::error::{DashboardError, Result};

/// A time value whose date component carries no meaning.
pub type TimeOfDay = NaiveTime;

const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_DAY: u64 = 86_400 * NANOS_PER_SECOND;
const MILLIS_PER_DAY: u64 = 86_400_000;

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Parses a command-line time bound such as `08:00` or `08:00:00`.
pub fn parse_time_of_day(input: &str) -> Result<TimeOfDay> {
    let trimmed = input.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .map(fold_leap_second)
        .ok_or_else(|| DashboardError::InvalidTime {
            input: input.to_string(),
        })
}

/// Parses a spreadsheet text cell holding a bare time, a date-time, or an
/// ISO 8601 duration such as `PT08H04M16S` (OpenDocument time cells).
///
/// The date part of a date-time is dropped.
pub fn parse_time_text(input: &str) -> Option<TimeOfDay> {
    let trimmed = input.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.time())
        })
        .map(fold_leap_second)
        .or_else(|| parse_iso_duration(trimmed))
}

/// chrono accepts `:60` and stores it as a nanosecond field of one second or
/// more. Such values are clamped to the last nanosecond of the minute so the
/// time stays on the ordinary clock.
fn fold_leap_second(time: TimeOfDay) -> TimeOfDay {
    match time.nanosecond() {
        n if n >= 1_000_000_000 => time.with_nanosecond(999_999_999).unwrap_or(time),
        _ => time,
    }
}

/// Reads `P[nD]T[nH][nM][n[.f]S]` as the time of day it reaches from
/// midnight. Whole days wrap, as they do for date serials.
pub fn parse_iso_duration(input: &str) -> Option<TimeOfDay> {
    let body = input.strip_prefix('P')?;
    let (days, clock) = body.split_once('T').unwrap_or((body, ""));
    if days.is_empty() && clock.is_empty() {
        return None;
    }
    if !days.is_empty() {
        days.strip_suffix('D')?.parse::<u64>().ok()?;
    }

    let mut nanos: u64 = 0;
    let mut units: &[(char, u64)] = &[
        ('H', 3_600 * NANOS_PER_SECOND),
        ('M', 60 * NANOS_PER_SECOND),
        ('S', NANOS_PER_SECOND),
    ];
    let mut rest = clock;
    while !rest.is_empty() {
        let end = rest.find(|c: char| c.is_ascii_alphabetic())?;
        let (number, tail) = rest.split_at(end);
        let unit = tail.chars().next()?;
        // each unit at most once, in H, M, S order
        let position = units.iter().position(|(u, _)| *u == unit)?;
        let scale = units[position].1;
        units = &units[position + 1..];

        let value: f64 = number.parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        nanos = nanos.checked_add((value * scale as f64).round() as u64)?;
        rest = &tail[1..];
    }

    from_nanos_since_midnight(nanos % NANOS_PER_DAY)
}

/// Converts a spreadsheet date serial into the time of day of its fractional part.
///
/// Serials are rounded to the millisecond so `0.5` is exactly noon rather than
/// one floating point step before it.
pub fn from_day_fraction(serial: f64) -> Option<TimeOfDay> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let millis = (serial.fract() * MILLIS_PER_DAY as f64).round() as u64 % MILLIS_PER_DAY;
    NaiveTime::from_num_seconds_from_midnight_opt(
        (millis / 1000) as u32,
        ((millis % 1000) * 1_000_000) as u32,
    )
}

/// Nanoseconds elapsed since midnight. A leap second counts as the last
/// nanosecond of its minute.
pub fn nanos_since_midnight(time: TimeOfDay) -> u64 {
    let nanos = u64::from(time.nanosecond()).min(NANOS_PER_SECOND - 1);
    u64::from(time.num_seconds_from_midnight()) * NANOS_PER_SECOND + nanos
}

/// Inverse of [`nanos_since_midnight`] for values within one day.
pub fn from_nanos_since_midnight(nanos: u64) -> Option<TimeOfDay> {
    let secs = u32::try_from(nanos / NANOS_PER_SECOND).ok()?;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, (nanos % NANOS_PER_SECOND) as u32)
}

/// A validated `strftime` pattern used to display times of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeFormat {
    pattern: String,
}

impl TimeFormat {
    pub const COLON: &'static str = "%H:%M:%S";
    pub const LETTERED: &'static str = "h%H:m%M:s%S";

    /// `08:04:16`
    pub fn colon() -> Self {
        Self {
            pattern: Self::COLON.to_string(),
        }
    }

    /// `h08:m04:s16`
    pub fn lettered() -> Self {
        Self {
            pattern: Self::LETTERED.to_string(),
        }
    }

    /// Accepts any pattern chrono can render for a bare time of day.
    /// Date fields such as `%Y` are rejected.
    pub fn custom(pattern: &str) -> Result<Self> {
        let invalid = pattern.is_empty()
            || StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
            || write!(String::new(), "{}", NaiveTime::MIN.format(pattern)).is_err();
        if invalid {
            return Err(DashboardError::InvalidTimeFormat {
                pattern: pattern.to_string(),
            });
        }
        Ok(Self {
            pattern: pattern.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, time: TimeOfDay) -> String {
        time.format(&self.pattern).to_string()
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self::colon()
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl FromStr for TimeFormat {
    type Err = DashboardError;

    /// `colon`, `lettered`, or a raw strftime pattern.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "colon" => Ok(Self::colon()),
            "lettered" => Ok(Self::lettered()),
            other => Self::custom(other),
        }
    }
}

impl TryFrom<String> for TimeFormat {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeFormat> for String {
    fn from(value: TimeFormat) -> Self {
        value.pattern
    }
}
