use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod migrate; // use submodule at src/config/migrate.rs

/// What happens when a user clocks in while already clocked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClockInPolicy {
    /// Refuse the second clock-in (`AlreadyClockedIn`).
    #[default]
    Reject,
    /// Overwrite `last_clock_in` with the new timestamp.
    Overwrite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_weekly_target")]
    pub weekly_target_minutes: i64,
    #[serde(default = "default_initial_hours")]
    pub initial_additional_hours: i64,
    #[serde(default = "default_top_up_hours")]
    pub monthly_top_up_hours: i64,
    #[serde(default = "default_low_tier_threshold")]
    pub low_tier_threshold_minutes: i64,
    #[serde(default = "default_low_tier_penalty")]
    pub low_tier_penalty: i64,
    #[serde(default = "default_high_tier_penalty")]
    pub high_tier_penalty: i64,
    #[serde(default)]
    pub clock_in_policy: ClockInPolicy,
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

fn default_weekly_target() -> i64 {
    1200
}
fn default_initial_hours() -> i64 {
    10
}
fn default_top_up_hours() -> i64 {
    10
}
fn default_low_tier_threshold() -> i64 {
    600
}
fn default_low_tier_penalty() -> i64 {
    10_000
}
fn default_high_tier_penalty() -> i64 {
    5_000
}
fn default_busy_timeout() -> u64 {
    5_000
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file().to_string_lossy().to_string())
    }
}

impl Config {
    pub fn with_database(database: String) -> Self {
        Self {
            database,
            weekly_target_minutes: default_weekly_target(),
            initial_additional_hours: default_initial_hours(),
            monthly_top_up_hours: default_top_up_hours(),
            low_tier_threshold_minutes: default_low_tier_threshold(),
            low_tier_penalty: default_low_tier_penalty(),
            high_tier_penalty: default_high_tier_penalty(),
            clock_in_policy: ClockInPolicy::default(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rweeklog")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rweeklog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rweeklog.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rweeklog.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        let mut cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the penalty engine cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        if self.weekly_target_minutes <= 0 {
            return Err(AppError::Config(
                "weekly_target_minutes must be positive".into(),
            ));
        }
        if self.low_tier_threshold_minutes < 0
            || self.low_tier_threshold_minutes > self.weekly_target_minutes
        {
            return Err(AppError::Config(
                "low_tier_threshold_minutes must be between 0 and weekly_target_minutes".into(),
            ));
        }
        if self.initial_additional_hours < 0 || self.monthly_top_up_hours < 0 {
            return Err(AppError::Config(
                "additional hours settings cannot be negative".into(),
            ));
        }
        if self.low_tier_penalty < 0 || self.high_tier_penalty < 0 {
            return Err(AppError::Config("penalty amounts cannot be negative".into()));
        }
        Ok(())
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = expand_tilde(&name);
            if p.is_absolute() { p } else { dir.join(p) }
        } else {
            dir.join("rweeklog.sqlite")
        };

        let config = Config::with_database(db_path.to_string_lossy().to_string());

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}
