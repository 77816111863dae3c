use crate::cli::commands::{current_user, open_store, print_json};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::report::ReportLogic;
use crate::errors::AppResult;
use crate::utils::colors::{RESET, color_for_penalty};
use crate::utils::date::format_date;
use crate::utils::table::{Column, Table};
use crate::utils::{format_amount, mins2readable};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::History { user_id, json } = &cli.command {
        let user_id = match user_id {
            Some(id) => id.clone(),
            None => current_user(cli)?.user_id,
        };

        let store = open_store(cfg)?;
        let history = ReportLogic::assessment_history(&store, &user_id)?;

        if *json {
            return print_json(&history);
        }

        if history.is_empty() {
            println!("No assessed weeks for {}.", user_id);
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::left("Week"),
            Column::right("Worked"),
            Column::right("Shortfall"),
            Column::right("Bank used"),
            Column::right("Bank"),
            Column::right("Penalty"),
        ]);

        for a in &history {
            table.add_row(vec![
                format_date(&a.week_start),
                mins2readable(a.total_work_time, false, false),
                mins2readable(a.shortfall, false, false),
                format!("{}h", a.hours_used),
                format!("{}h → {}h", a.bank_before, a.bank_after),
                format!(
                    "{}{}{}",
                    color_for_penalty(a.penalty),
                    format_amount(a.penalty),
                    RESET
                ),
            ]);
        }

        println!("📅 Assessed weeks for {}:\n", user_id);
        print!("{}", table.render());
    }

    Ok(())
}
