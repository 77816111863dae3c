use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime};

/// Monday of the week containing `date`. Sunday belongs to the week that
/// started six days earlier.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date - Days::new(offset)
}

/// Monday of the week containing the local date of `ts`.
pub fn week_start_at(ts: &DateTime<Local>) -> NaiveDate {
    week_start_of(ts.date_naive())
}

/// Monday of the week before the one starting at `week_start`.
pub fn previous_week(week_start: NaiveDate) -> NaiveDate {
    week_start - Days::new(7)
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Parse a user supplied timestamp.
///
/// Accepted forms: RFC 3339 (`2025-09-01T09:00:00+02:00`) and local
/// `YYYY-MM-DD HH:MM[:SS]` / `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];

    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
}
