use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::top_up::TopUpLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::TopUp { hours } = cmd {
        let hours = hours.unwrap_or(cfg.monthly_top_up_hours);

        let mut store = open_store(cfg)?;
        let updated = TopUpLogic::apply(&mut store, hours)?;

        success(format!(
            "➕ Added {}h of additional hours to {} account(s).",
            hours, updated
        ));
    }

    Ok(())
}
