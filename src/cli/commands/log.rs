use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print, tail } = cmd
        && (*print || tail.is_some())
    {
        let mut pool = DbPool::with_busy_timeout(&cfg.database, cfg.busy_timeout_ms)?;
        LogLogic::print_log(&mut pool, *tail)?;
    }

    Ok(())
}
