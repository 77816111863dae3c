use crate::cli::commands::{open_store, print_json};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::ReportLogic;
use crate::errors::AppResult;
use crate::utils::colors::{RESET, color_for_penalty};
use crate::utils::format_amount;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Board { json } = cmd {
        let store = open_store(cfg)?;
        let accounts = ReportLogic::penalty_board(&store)?;

        if *json {
            return print_json(&accounts);
        }

        if accounts.is_empty() {
            println!("No registered users.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::left("User"),
            Column::right("Penalty"),
            Column::right("Bank (h)"),
        ]);

        for a in &accounts {
            table.add_row(vec![
                a.user_id.clone(),
                format!(
                    "{}{}{}",
                    color_for_penalty(a.accumulated_penalty),
                    format_amount(a.accumulated_penalty),
                    RESET
                ),
                a.additional_hours.to_string(),
            ]);
        }

        println!("💰 Penalty board:\n");
        print!("{}", table.render());
    }

    Ok(())
}
