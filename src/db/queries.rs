use crate::errors::{AppError, AppResult};
use crate::models::assessment::PenaltyAssessment;
use crate::models::penalty_record::{PenaltyPatch, PenaltyRecord};
use crate::models::user::User;
use crate::models::work_record::WorkRecord;
use crate::models::work_status::WorkStatus;
use crate::utils::date::format_date;
use crate::utils::time::{from_db_timestamp, to_db_timestamp};
use chrono::{Local, NaiveDate};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const WORK_COLUMNS: &str = "id, user_id, week_start, total_work_time, remaining_time, \
     work_status, last_clock_in, last_increase, undo_pending, version, created_at, updated_at";

const PENALTY_COLUMNS: &str =
    "id, user_id, accumulated_penalty, additional_hours, version, created_at, updated_at";

const ASSESSMENT_COLUMNS: &str = "user_id, week_start, total_work_time, shortfall, \
     hours_used, penalty, bank_before, bank_after, assessed_at";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_week(row: &Row, col: &str) -> Result<NaiveDate> {
    let s: String = row.get(col)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .map_err(|_| conversion_error(0, AppError::InvalidDate(s)))
}

/// True for UNIQUE / PRIMARY KEY violations (not foreign keys or CHECKs).
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

// ---------------------------
// work_records
// ---------------------------

pub fn map_work_record(row: &Row) -> Result<WorkRecord> {
    let status_str: String = row.get("work_status")?;
    let work_status = WorkStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(
            0,
            AppError::Other(format!("Invalid work status: {}", status_str)),
        )
    })?;

    let last_clock_in = match row.get::<_, Option<String>>("last_clock_in")? {
        Some(s) => Some(
            from_db_timestamp(&s).ok_or_else(|| conversion_error(0, AppError::InvalidTime(s)))?,
        ),
        None => None,
    };

    Ok(WorkRecord {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        week_start: parse_week(row, "week_start")?,
        total_work_time: row.get("total_work_time")?,
        remaining_time: row.get("remaining_time")?,
        work_status,
        last_clock_in,
        last_increase: row.get("last_increase")?,
        undo_pending: row.get("undo_pending")?,
        version: row.get("version")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn load_work_record(
    conn: &Connection,
    user_id: &str,
    week_start: &NaiveDate,
) -> AppResult<Option<WorkRecord>> {
    let sql = format!(
        "SELECT {WORK_COLUMNS} FROM work_records WHERE user_id = ?1 AND week_start = ?2"
    );
    let rec = conn
        .query_row(&sql, params![user_id, format_date(week_start)], map_work_record)
        .optional()?;
    Ok(rec)
}

pub fn load_work_record_by_id(conn: &Connection, id: i64) -> AppResult<Option<WorkRecord>> {
    let sql = format!("SELECT {WORK_COLUMNS} FROM work_records WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_work_record).optional()?)
}

pub fn load_work_records_by_week(
    conn: &Connection,
    week_start: &NaiveDate,
    status: Option<WorkStatus>,
) -> AppResult<Vec<WorkRecord>> {
    let week = format_date(week_start);
    let mut out = Vec::new();

    match status {
        Some(st) => {
            let sql = format!(
                "SELECT {WORK_COLUMNS} FROM work_records
                 WHERE week_start = ?1 AND work_status = ?2
                 ORDER BY user_id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            for r in stmt.query_map(params![week, st.to_db_str()], map_work_record)? {
                out.push(r?);
            }
        }
        None => {
            let sql = format!(
                "SELECT {WORK_COLUMNS} FROM work_records
                 WHERE week_start = ?1
                 ORDER BY user_id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            for r in stmt.query_map([week], map_work_record)? {
                out.push(r?);
            }
        }
    }

    Ok(out)
}

/// Insert a new work record and return its id.
pub fn insert_work_record(conn: &Connection, rec: &WorkRecord) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO work_records (user_id, week_start, total_work_time, remaining_time,
                                   work_status, last_clock_in, last_increase, undo_pending,
                                   version, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10)",
        params![
            rec.user_id,
            format_date(&rec.week_start),
            rec.total_work_time,
            rec.remaining_time,
            rec.work_status.to_db_str(),
            rec.last_clock_in.as_ref().map(to_db_timestamp),
            rec.last_increase,
            rec.undo_pending,
            rec.created_at,
            rec.updated_at,
        ],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => Err(AppError::ConcurrentModification(rec.key())),
        Err(e) => Err(e.into()),
    }
}

/// Version-checked update of every mutable column.
pub fn update_work_record(conn: &Connection, rec: &WorkRecord) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE work_records
         SET total_work_time = ?1, remaining_time = ?2, work_status = ?3,
             last_clock_in = ?4, last_increase = ?5, undo_pending = ?6,
             version = version + 1, updated_at = ?7
         WHERE id = ?8 AND version = ?9",
        params![
            rec.total_work_time,
            rec.remaining_time,
            rec.work_status.to_db_str(),
            rec.last_clock_in.as_ref().map(to_db_timestamp),
            rec.last_increase,
            rec.undo_pending,
            Local::now().to_rfc3339(),
            rec.id,
            rec.version,
        ],
    )?;

    if changed == 0 {
        return Err(AppError::ConcurrentModification(rec.key()));
    }
    Ok(())
}

// ---------------------------
// penalty_records
// ---------------------------

pub fn map_penalty_record(row: &Row) -> Result<PenaltyRecord> {
    Ok(PenaltyRecord {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        accumulated_penalty: row.get("accumulated_penalty")?,
        additional_hours: row.get("additional_hours")?,
        version: row.get("version")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn load_penalty_record(conn: &Connection, user_id: &str) -> AppResult<Option<PenaltyRecord>> {
    let sql = format!("SELECT {PENALTY_COLUMNS} FROM penalty_records WHERE user_id = ?1");
    Ok(conn.query_row(&sql, [user_id], map_penalty_record).optional()?)
}

pub fn load_penalty_records(conn: &Connection) -> AppResult<Vec<PenaltyRecord>> {
    let sql = format!("SELECT {PENALTY_COLUMNS} FROM penalty_records ORDER BY user_id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_penalty_record)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_penalty_record(conn: &Connection, rec: &PenaltyRecord) -> AppResult<()> {
    conn.execute(
        "INSERT INTO penalty_records (user_id, accumulated_penalty, additional_hours,
                                      version, created_at, updated_at)
         VALUES (?1, ?2, ?3, 1, ?4, ?5)",
        params![
            rec.user_id,
            rec.accumulated_penalty,
            rec.additional_hours,
            rec.created_at,
            rec.updated_at,
        ],
    )?;
    Ok(())
}

/// Apply `patch`; untouched columns keep their value.
pub fn patch_penalty_record(
    conn: &Connection,
    user_id: &str,
    patch: &PenaltyPatch,
) -> AppResult<PenaltyRecord> {
    let changed = conn.execute(
        "UPDATE penalty_records
         SET accumulated_penalty = COALESCE(?1, accumulated_penalty),
             additional_hours    = COALESCE(?2, additional_hours),
             version = version + 1,
             updated_at = ?3
         WHERE user_id = ?4 AND (?5 IS NULL OR version = ?5)",
        params![
            patch.accumulated_penalty,
            patch.additional_hours,
            Local::now().to_rfc3339(),
            user_id,
            patch.expected_version,
        ],
    )?;

    if changed == 0 {
        return match load_penalty_record(conn, user_id)? {
            None => Err(AppError::NotFound(format!("penalty record for '{}'", user_id))),
            Some(_) => Err(AppError::ConcurrentModification(format!(
                "penalty record of '{}'",
                user_id
            ))),
        };
    }

    load_penalty_record(conn, user_id)?
        .ok_or_else(|| AppError::NotFound(format!("penalty record for '{}'", user_id)))
}

pub fn add_hours_to_all(conn: &Connection, hours: i64) -> AppResult<usize> {
    let changed = conn.execute(
        "UPDATE penalty_records
         SET additional_hours = additional_hours + ?1,
             version = version + 1,
             updated_at = ?2",
        params![hours, Local::now().to_rfc3339()],
    )?;
    Ok(changed)
}

// ---------------------------
// users
// ---------------------------

pub fn insert_user(conn: &Connection, user: &User) -> AppResult<()> {
    let res = conn.execute(
        "INSERT INTO users (id, created_at) VALUES (?1, ?2)",
        params![user.id, user.created_at],
    );

    match res {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => Err(AppError::UserExists(user.id.clone())),
        Err(e) => Err(e.into()),
    }
}

pub fn load_user_ids(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT id FROM users ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn user_exists(conn: &Connection, user_id: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM users WHERE id = ?1")?;
    Ok(stmt.exists([user_id])?)
}

// ---------------------------
// penalty_assessments
// ---------------------------

pub fn map_assessment(row: &Row) -> Result<PenaltyAssessment> {
    Ok(PenaltyAssessment {
        user_id: row.get("user_id")?,
        week_start: parse_week(row, "week_start")?,
        total_work_time: row.get("total_work_time")?,
        shortfall: row.get("shortfall")?,
        hours_used: row.get("hours_used")?,
        penalty: row.get("penalty")?,
        bank_before: row.get("bank_before")?,
        bank_after: row.get("bank_after")?,
        assessed_at: row.get("assessed_at")?,
    })
}

pub fn assessment_exists(
    conn: &Connection,
    user_id: &str,
    week_start: &NaiveDate,
) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM penalty_assessments WHERE user_id = ?1 AND week_start = ?2",
    )?;
    Ok(stmt.exists(params![user_id, format_date(week_start)])?)
}

/// Insert the marker unless one already exists. Returns whether it was inserted.
pub fn insert_assessment(conn: &Connection, a: &PenaltyAssessment) -> AppResult<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO penalty_assessments
             (user_id, week_start, total_work_time, shortfall, hours_used,
              penalty, bank_before, bank_after, assessed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            a.user_id,
            format_date(&a.week_start),
            a.total_work_time,
            a.shortfall,
            a.hours_used,
            a.penalty,
            a.bank_before,
            a.bank_after,
            a.assessed_at,
        ],
    )?;
    Ok(changed == 1)
}

pub fn load_assessments(conn: &Connection, user_id: &str) -> AppResult<Vec<PenaltyAssessment>> {
    let sql = format!(
        "SELECT {ASSESSMENT_COLUMNS} FROM penalty_assessments
         WHERE user_id = ?1
         ORDER BY week_start DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([user_id], map_assessment)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
