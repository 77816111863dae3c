use crate::cli::commands::{current_user, open_store, print_json, resolve_week};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::report::ReportLogic;
use crate::errors::AppResult;
use crate::store::RecordStore;
use crate::utils::colors::{RESET, color_for_remaining, colorize_optional};
use crate::utils::format_amount;
use crate::utils::formatting::bold;
use crate::utils::mins2readable;
use crate::utils::time::format_timestamp;
use chrono::Local;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { week, json } = &cli.command {
        let me = current_user(cli)?;
        let week = resolve_week(week.as_ref(), &Local::now())?;

        let store = open_store(cfg)?;
        let rec = ReportLogic::week_status(&store, &me.user_id, week)?;

        if *json {
            return print_json(&rec);
        }

        let since = rec
            .last_clock_in
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_else(|| "--".into());

        println!("\n=== {} | week {} ===", bold(&rec.user_id), rec.week_str());
        println!("Status:    {}", rec.work_status.label());
        println!("Since:     {}", colorize_optional(&since));
        println!(
            "Worked:    {}",
            mins2readable(rec.total_work_time, false, false)
        );
        println!(
            "Remaining: {}{}{}",
            color_for_remaining(rec.remaining_time),
            mins2readable(rec.remaining_time, false, false),
            RESET
        );

        if let Some(account) = store.get_penalty_record(&me.user_id)? {
            println!(
                "Penalty:   {} | Bank: {}h",
                format_amount(account.accumulated_penalty),
                account.additional_hours
            );
        }
    }

    Ok(())
}
