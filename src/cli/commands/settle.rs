use crate::cli::commands::{current_user, open_store};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::settle::SettleLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Settle { user_id } = &cli.command {
        let me = current_user(cli)?;
        let target = user_id.clone().unwrap_or_else(|| me.user_id.clone());

        let mut store = open_store(cfg)?;
        let account = SettleLogic::apply(&mut store, &target, &me)?;

        success(format!(
            "💸 Penalties settled for {} (now {}).",
            account.user_id, account.accumulated_penalty
        ));
    }

    Ok(())
}
