use crate::errors::AppResult;
use chrono::{Local, SecondsFormat};
use rusqlite::{Connection, params};

/// Append one row to the internal `log` table and return its id.
///
/// `target` is the object the operation acted on (`user@week`, a user id,
/// `all`), empty when there is none.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<i64> {
    let date = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);

    conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message) VALUES (?1, ?2, ?3, ?4)",
    )?
    .execute(params![date, operation, target.trim(), message])?;

    Ok(conn.last_insert_rowid())
}
