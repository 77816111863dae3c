use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};

/// Handle the `db` maintenance subcommand. Flags combine and run in a fixed
/// order: migrate, info, check, vacuum.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    let mut pool = DbPool::with_busy_timeout(&cfg.database, cfg.busy_timeout_ms)?;

    if *migrate {
        let pending = pending_migrations(&pool.conn)?;
        if pending.is_empty() {
            info("Schema is up to date, no migration to run.");
        } else {
            info(format!("Running {} migration(s)…", pending.len()));
            run_pending_migrations(&pool.conn)?;
            success("Migration completed.");
        }
    }

    if *show_info {
        stats::print_db_info(&mut pool, &cfg.database)?;
    }

    if *check {
        let result: String = pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
        if result != "ok" {
            return Err(AppError::Other(format!("integrity check failed: {}", result)));
        }

        let mut fk = pool.conn.prepare("PRAGMA foreign_key_check;")?;
        let orphans = fk.query_map([], |row| row.get::<_, String>(0))?.count();
        if orphans > 0 {
            return Err(AppError::Other(format!(
                "{} row(s) reference a missing user",
                orphans
            )));
        }

        success("Integrity check passed.");
    }

    if *vacuum {
        pool.conn.execute_batch("VACUUM;")?;
        success("Vacuum completed.");
    }

    Ok(())
}
