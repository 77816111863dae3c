use crate::cli::parser::Commands;
use crate::config::{Config, migrate};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate: run_migrate,
    } = cmd
    {
        let path = Config::config_file();

        // ---- PRINT CONFIG ----
        if *print_config {
            println!("📄 Current configuration:\n");
            let yaml = serde_yaml::to_string(cfg)
                .map_err(|e| AppError::Config(format!("Failed to render configuration: {}", e)))?;
            println!("{}", yaml);
        }

        if (*check || *run_migrate) && !path.exists() {
            info(format!(
                "No configuration file at {} (defaults in use). Run `rweeklog init` to create one.",
                path.display()
            ));
            return Ok(());
        }

        // ---- CHECK CONFIG ----
        if *check {
            cfg.validate()?;
            let missing = migrate::missing_keys(&path)?;
            if missing.is_empty() {
                success("Configuration file is complete.");
            } else {
                warning(format!(
                    "Missing fields (defaults in use): {}. Run `rweeklog config --migrate`.",
                    missing.join(", ")
                ));
            }
        }

        // ---- MIGRATE CONFIG ----
        if *run_migrate {
            migrate::fill_missing_keys(&path)?;
        }
    }

    Ok(())
}
