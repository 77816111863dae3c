use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::policy::WorkPolicy;
use crate::core::register::RegisterLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Register { user_id } = cmd {
        let mut store = open_store(cfg)?;
        let policy = WorkPolicy::from(cfg);

        let user = RegisterLogic::apply(&mut store, &policy, user_id, Local::now())?;

        success(format!(
            "👤 Registered '{}' ({}h of additional hours).",
            user.id, policy.initial_additional_hours
        ));
    }

    Ok(())
}
