//! rWeekLog library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (time clock, weekly rollover, penalty accounts).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Register { .. } => cli::commands::register::handle(&cli.command, cfg),
        Commands::In { .. } | Commands::Out { .. } | Commands::Undo { .. } => {
            cli::commands::clock::handle(cli, cfg)
        }
        Commands::Status { .. } => cli::commands::status::handle(cli, cfg),
        Commands::Board { .. } => cli::commands::board::handle(&cli.command, cfg),
        Commands::History { .. } => cli::commands::history::handle(cli, cfg),
        Commands::Settle { .. } => cli::commands::settle::handle(cli, cfg),
        Commands::Rollover { .. } => cli::commands::rollover::handle(&cli.command, cfg),
        Commands::TopUp { .. } => cli::commands::top_up::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once and handed to every command
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
