//! Time utilities: whole-minute durations and stored timestamp handling.

use chrono::{DateTime, Local};

/// Whole minutes elapsed between `start` and `end`, rounded down.
/// Negative when `end` precedes `start`.
pub fn minutes_between(start: &DateTime<Local>, end: &DateTime<Local>) -> i64 {
    (*end - *start).num_seconds().div_euclid(60)
}

/// Timestamp representation used in every table.
pub fn to_db_timestamp(ts: &DateTime<Local>) -> String {
    ts.to_rfc3339()
}

pub fn from_db_timestamp(s: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Local))
}

pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}
