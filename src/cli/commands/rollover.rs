use crate::cli::commands::{open_store, print_json, resolve_timestamp};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::policy::WorkPolicy;
use crate::core::rollover::{RolloverLogic, RolloverReport};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, success, warning};
use crate::utils::date::format_date;
use crate::utils::format_amount;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Rollover { now, strict, json } = cmd {
        let now = resolve_timestamp(now.as_ref())?;

        let mut store = open_store(cfg)?;
        let report = RolloverLogic::run(&mut store, &WorkPolicy::from(cfg), now)?;

        if *json {
            print_json(&report)?;
        } else {
            print_report(&report);
        }

        if *strict && !report.is_complete() {
            return Err(AppError::PartialRollover(report.failures.len()));
        }
    }

    Ok(())
}

fn print_report(report: &RolloverReport) {
    header(format!(
        "Rollover {} → {}",
        format_date(&report.previous_week),
        format_date(&report.current_week)
    ));

    println!("Auto clocked-out : {}", report.force_closed.len());
    println!(
        "Assessed         : {} (already assessed: {})",
        report.assessed.len(),
        report.already_assessed.len()
    );

    for a in report.assessed.iter().filter(|a| a.shortfall > 0) {
        println!(
            "  - {}: worked {} min, shortfall {} min, bank {}h → {}h, penalty {}",
            a.user_id,
            a.total_work_time,
            a.shortfall,
            a.bank_before,
            a.bank_after,
            format_amount(a.penalty)
        );
    }

    println!("Penalties charged: {}", format_amount(report.total_penalty()));
    println!(
        "Seeded           : {} (already present: {})",
        report.seeded.len(),
        report.already_seeded.len()
    );

    if report.is_complete() {
        success("Weekly rollover completed.");
    } else {
        warning(format!(
            "Weekly rollover completed with {} failure(s):",
            report.failures.len()
        ));
        for f in &report.failures {
            println!("  - {} [{}]: {}", f.user_id, f.step, f.message);
        }
    }
}
