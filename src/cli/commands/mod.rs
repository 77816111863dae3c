pub mod board;
pub mod clock;
pub mod config;
pub mod db;
pub mod history;
pub mod init;
pub mod log;
pub mod register;
pub mod rollover;
pub mod settle;
pub mod status;
pub mod top_up;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::sqlite_store::SqliteStore;
use crate::errors::{AppError, AppResult};
use crate::models::user::CurrentUser;
use crate::utils::date::{parse_date, parse_timestamp, week_start_at, week_start_of};
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

pub(crate) fn open_store(cfg: &Config) -> AppResult<SqliteStore> {
    SqliteStore::open(&cfg.database, cfg.busy_timeout_ms)
}

pub(crate) fn current_user(cli: &Cli) -> AppResult<CurrentUser> {
    let id = cli
        .user
        .as_deref()
        .ok_or_else(|| AppError::InvalidUser("this command needs --user <ID>".into()))?;
    CurrentUser::new(id)
}

/// `--at` value, or now.
pub(crate) fn resolve_timestamp(at: Option<&String>) -> AppResult<DateTime<Local>> {
    match at {
        Some(s) => parse_timestamp(s).ok_or_else(|| AppError::InvalidTime(s.to_string())),
        None => Ok(Local::now()),
    }
}

/// Monday of the week given by `--week` (any day of it), or of `fallback`.
pub(crate) fn resolve_week(
    week: Option<&String>,
    fallback: &DateTime<Local>,
) -> AppResult<NaiveDate> {
    match week {
        Some(s) => parse_date(s)
            .map(week_start_of)
            .ok_or_else(|| AppError::InvalidDate(s.to_string())),
        None => Ok(week_start_at(fallback)),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Other(format!("JSON serialization failed: {}", e)))?;
    println!("{}", out);
    Ok(())
}
