use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::sqlite_store::SqliteStore;
use crate::errors::AppResult;
use crate::store::RecordStore;
use crate::ui::messages::{success, warning};
use crate::utils::mins2readable;

/// Handle `init`: config directory and file (skipped with `--test`), then the
/// database with every migration applied.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?
        .to_string_lossy()
        .to_string();

    let cfg = Config::with_database(db_path.clone());
    let store = SqliteStore::open(&cfg.database, cfg.busy_timeout_ms)?;

    if let Err(e) = store.audit("init", "", &format!("Database initialized at {}", db_path)) {
        warning(format!("Failed to write internal log: {}", e));
    }

    println!(
        "🗓️  Weekly target {} | starting bank {}h | monthly top-up {}h",
        mins2readable(cfg.weekly_target_minutes, false, false),
        cfg.initial_additional_hours,
        cfg.monthly_top_up_hours
    );
    success(format!("rWeekLog initialized ({}).", db_path));
    Ok(())
}
