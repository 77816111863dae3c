use crate::db::migrate::{known_versions, pending_migrations};
use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::format_amount;
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, table: &str) -> rusqlite::Result<i64> {
    pool.conn
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) SCHEMA
    //
    let pending = pending_migrations(&pool.conn)?;
    println!(
        "{}• Migrations:{} {}/{} applied",
        CYAN,
        RESET,
        known_versions().len() - pending.len(),
        known_versions().len()
    );

    //
    // 3) ROW COUNTS
    //
    println!(
        "{}• Users:{} {}{}{}",
        CYAN,
        RESET,
        GREEN,
        count(pool, "users")?,
        RESET
    );
    println!(
        "{}• Work records:{} {}{}{}",
        CYAN,
        RESET,
        GREEN,
        count(pool, "work_records")?,
        RESET
    );
    println!(
        "{}• Assessments:{} {}{}{}",
        CYAN,
        RESET,
        GREEN,
        count(pool, "penalty_assessments")?,
        RESET
    );

    //
    // 4) WEEK RANGE
    //
    let first_week: Option<String> = pool
        .conn
        .query_row(
            "SELECT week_start FROM work_records ORDER BY week_start ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_week: Option<String> = pool
        .conn
        .query_row(
            "SELECT week_start FROM work_records ORDER BY week_start DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    println!("{}• Week range:{}", CYAN, RESET);
    println!(
        "    from: {}",
        first_week.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );
    println!(
        "    to:   {}",
        last_week.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    //
    // 5) OUTSTANDING PENALTIES
    //
    let outstanding: i64 = pool.conn.query_row(
        "SELECT COALESCE(SUM(accumulated_penalty), 0) FROM penalty_records",
        [],
        |row| row.get(0),
    )?;
    println!(
        "{}• Outstanding penalties:{} {}",
        CYAN,
        RESET,
        format_amount(outstanding)
    );

    println!();
    Ok(())
}
