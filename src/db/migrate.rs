use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. It also holds the migration markers,
/// so it is created before anything else.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250901_0001_create_users",
        description: "Created users table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            created_at  TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250901_0002_create_work_records",
        description: "Created work_records table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS work_records (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id          TEXT NOT NULL REFERENCES users(id),
            week_start       TEXT NOT NULL,
            total_work_time  INTEGER NOT NULL DEFAULT 0 CHECK(total_work_time >= 0),
            remaining_time   INTEGER NOT NULL CHECK(remaining_time >= 0),
            work_status      TEXT NOT NULL DEFAULT 'out' CHECK(work_status IN ('in','out')),
            last_clock_in    TEXT,
            last_increase    INTEGER NOT NULL DEFAULT 0,
            version          INTEGER NOT NULL DEFAULT 1,
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL,
            UNIQUE(user_id, week_start)
        );

        CREATE INDEX IF NOT EXISTS idx_work_records_week_status
            ON work_records(week_start, work_status);
        "#,
    },
    Migration {
        version: "20250901_0003_create_penalty_records",
        description: "Created penalty_records table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS penalty_records (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id              TEXT NOT NULL UNIQUE REFERENCES users(id),
            accumulated_penalty  INTEGER NOT NULL DEFAULT 0 CHECK(accumulated_penalty >= 0),
            additional_hours     INTEGER NOT NULL DEFAULT 10 CHECK(additional_hours >= 0),
            version              INTEGER NOT NULL DEFAULT 1,
            created_at           TEXT NOT NULL,
            updated_at           TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250915_0004_create_penalty_assessments",
        description: "Created penalty_assessments table (one row per assessed user/week)",
        sql: r#"
        CREATE TABLE IF NOT EXISTS penalty_assessments (
            user_id          TEXT NOT NULL REFERENCES users(id),
            week_start       TEXT NOT NULL,
            total_work_time  INTEGER NOT NULL,
            shortfall        INTEGER NOT NULL,
            hours_used       INTEGER NOT NULL,
            penalty          INTEGER NOT NULL,
            bank_before      INTEGER NOT NULL,
            bank_after       INTEGER NOT NULL,
            assessed_at      TEXT NOT NULL,
            PRIMARY KEY (user_id, week_start)
        );
        "#,
    },
    Migration {
        version: "20250922_0005_add_undo_pending",
        description: "Added work_records.undo_pending (undo of sub-minute clock-outs)",
        sql: r#"
        ALTER TABLE work_records ADD COLUMN undo_pending INTEGER NOT NULL DEFAULT 0;
        UPDATE work_records SET undo_pending = 1 WHERE last_increase > 0;
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Run one migration and its marker in the same transaction.
fn apply(conn: &Connection, m: &Migration) -> Result<bool> {
    if is_applied(conn, m.version)? {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;
    tx.commit()?;

    Ok(true)
}

/// Versions of every known migration, oldest first.
pub fn known_versions() -> Vec<&'static str> {
    MIGRATIONS.iter().map(|m| m.version).collect()
}

/// Public entry point: run all pending migrations.
///
/// Called by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if apply(conn, m)? {
            success(format!("Migration applied: {} → {}", m.version, m.description));
        }
    }

    Ok(())
}

/// Versions still waiting to be applied.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}
