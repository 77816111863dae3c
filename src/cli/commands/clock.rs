use crate::cli::commands::{current_user, open_store, resolve_timestamp, resolve_week};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::clock::ClockLogic;
use crate::core::policy::WorkPolicy;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::mins2readable;
use crate::utils::time::format_timestamp;
use chrono::Local;

/// Handle `in`, `out` and `undo`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let me = current_user(cli)?;
    let policy = WorkPolicy::from(cfg);

    match &cli.command {
        Commands::In { at } => {
            let ts = resolve_timestamp(at.as_ref())?;
            let week = resolve_week(None, &ts)?;

            let mut store = open_store(cfg)?;
            let rec = ClockLogic::clock_in(&mut store, &policy, &me.user_id, week, ts)?;

            success(format!(
                "⏱️  {} clocked in at {} (week {}).",
                rec.user_id,
                format_timestamp(&ts),
                rec.week_str()
            ));
        }

        Commands::Out { at, week } => {
            let ts = resolve_timestamp(at.as_ref())?;
            let week = resolve_week(week.as_ref(), &ts)?;

            let mut store = open_store(cfg)?;
            let rec = ClockLogic::clock_out(&mut store, &policy, &me.user_id, week, ts)?;

            success(format!(
                "🏁 {} clocked out at {}: +{} | total {} | remaining {}",
                rec.user_id,
                format_timestamp(&ts),
                mins2readable(rec.last_increase, false, false),
                mins2readable(rec.total_work_time, false, false),
                mins2readable(rec.remaining_time, false, false)
            ));
        }

        Commands::Undo { week } => {
            let week = resolve_week(week.as_ref(), &Local::now())?;

            let mut store = open_store(cfg)?;
            let rec = ClockLogic::undo_last_clock_out(&mut store, &policy, &me.user_id, week)?;

            success(format!(
                "↩️  Last clock-out reverted for {}: total {} | remaining {}",
                rec.key(),
                mins2readable(rec.total_work_time, false, false),
                mins2readable(rec.remaining_time, false, false)
            ));
        }

        _ => {}
    }

    Ok(())
}
