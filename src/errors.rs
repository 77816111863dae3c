//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store / database
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Record for {0} was modified concurrently, retry the operation")]
    ConcurrentModification(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("Invalid number of hours: {0}")]
    InvalidHours(i64),

    // ---------------------------
    // Time clock
    // ---------------------------
    #[error("Clock-out time must be later than the last clock-in ({0})")]
    InvalidTimeOrder(String),

    #[error("No active clock-in for {0}")]
    NoActiveClockIn(String),

    #[error("{0} is already clocked in since {1}")]
    AlreadyClockedIn(String, String),

    #[error("Cannot undo while {0} is clocked in")]
    CannotUndoWhileClockedIn(String),

    #[error("Nothing to undo for {0}")]
    NothingToUndo(String),

    #[error("Week {0} is closed and can no longer change")]
    WeekClosed(String),

    #[error("Work time for {0} would become negative ({1} min)")]
    NegativeWorkTime(String, i64),

    // ---------------------------
    // Users / authorization
    // ---------------------------
    #[error("User '{0}' already exists")]
    UserExists(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // ---------------------------
    // Rollover
    // ---------------------------
    #[error("Weekly rollover completed with {0} per-user failure(s)")]
    PartialRollover(usize),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
