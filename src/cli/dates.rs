use std::fmt::Display;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_english::parse_date_string;
use clap::ValueEnum;

use crate::utils::time::{day_start, parse_day};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Reads a moment typed by the user. `YYYY-MM-DD` means the start of that day, anything else is
/// handed to chrono-english ("yesterday", "3 days ago", "15/03/2025 12:00").
pub fn parse_moment(input: &str, now: DateTime<Utc>, style: DateStyle) -> Result<DateTime<Utc>> {
    if let Some(day) = parse_day(input) {
        return Ok(day_start(day));
    }
    parse_date_string(input.trim(), now, style.into())
        .map_err(|e| anyhow!("Can't understand date {input:?}: {e}"))
}

/// Same as [parse_moment] but only keeps the calendar day.
pub fn parse_calendar_day(input: &str, now: DateTime<Utc>, style: DateStyle) -> Result<NaiveDate> {
    parse_moment(input, now, style).map(|moment| moment.date_naive())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{parse_calendar_day, parse_moment, DateStyle};

    #[test]
    fn test_iso_day_is_start_of_day() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap();
        assert_eq!(
            parse_moment("2024-01-02", now, DateStyle::Uk).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_relative_day() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap();
        assert_eq!(
            parse_calendar_day("yesterday", now, DateStyle::Uk).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
        );
    }

    #[test]
    fn test_date_style() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap();
        assert_eq!(
            parse_calendar_day("03/04/2024", now, DateStyle::Uk).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 3).unwrap()
        );
        assert_eq!(
            parse_calendar_day("03/04/2024", now, DateStyle::Us).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }

    #[test]
    fn test_garbage() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap();
        assert!(parse_moment("the day after never", now, DateStyle::Uk).is_err());
    }
}
