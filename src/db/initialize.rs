use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

/// Bring the schema up to date. Fails if a migration is still pending
/// afterwards, so no operation runs against a partial schema.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;

    let left = pending_migrations(conn)?;
    if !left.is_empty() {
        return Err(AppError::Migration(format!(
            "still pending after upgrade: {}",
            left.join(", ")
        )));
    }
    Ok(())
}
