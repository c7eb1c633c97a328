use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// This is the standard way of converting a day to a string in wordtally. Zero padded, so
/// lexicographic order of the output matches chronological order.
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a day written as `YYYY-MM-DD`.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Returns the moment a calendar day starts. Days are always interpreted in UTC.
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
