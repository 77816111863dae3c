use clap::{Parser, Subcommand};

/// Command-line interface definition for rWeekLog
#[derive(Parser)]
#[command(
    name = "rweeklog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track weekly working hours, roll weeks over and settle shortfall penalties (SQLite)",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// User on whose behalf the command runs
    #[arg(global = true, long = "user", short = 'u')]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show or upgrade the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "tail", value_name = "N", help = "Only show the last N rows")]
        tail: Option<usize>,
    },

    /// Register a user (penalty account + current week record)
    Register {
        /// User id
        user_id: String,
    },

    /// Clock in (requires --user)
    In {
        /// Clock-in time (YYYY-MM-DD HH:MM or RFC 3339), default now
        #[arg(long = "at")]
        at: Option<String>,
    },

    /// Clock out (requires --user)
    Out {
        /// Clock-out time (YYYY-MM-DD HH:MM or RFC 3339), default now
        #[arg(long = "at")]
        at: Option<String>,

        /// Any date of the week to close the interval in (default: week of --at)
        #[arg(long = "week", value_name = "YYYY-MM-DD")]
        week: Option<String>,
    },

    /// Revert the latest clock-out of the week (requires --user)
    Undo {
        #[arg(long = "week", value_name = "YYYY-MM-DD")]
        week: Option<String>,
    },

    /// Show a user's record for a week (requires --user)
    Status {
        #[arg(long = "week", value_name = "YYYY-MM-DD")]
        week: Option<String>,

        #[arg(long = "json", help = "Print the record as JSON")]
        json: bool,
    },

    /// Show every user's accumulated penalty and hour bank
    Board {
        #[arg(long = "json", help = "Print the board as JSON")]
        json: bool,
    },

    /// Show past weekly assessments (default: --user)
    History {
        user_id: Option<String>,

        #[arg(long = "json", help = "Print the history as JSON")]
        json: bool,
    },

    /// Settle a user's accumulated penalty (only your own)
    Settle {
        /// User whose penalty is settled (default: --user)
        user_id: Option<String>,
    },

    /// Weekly rollover: auto clock-out, penalty assessment, new week records
    Rollover {
        /// Reference time (default now); the week containing it is opened
        #[arg(long = "now")]
        now: Option<String>,

        #[arg(long = "strict", help = "Exit with an error if any user failed")]
        strict: bool,

        #[arg(long = "json", help = "Print the rollover report as JSON")]
        json: bool,
    },

    /// Monthly top-up of every user's additional hours
    TopUp {
        /// Hours to add (default: monthly_top_up_hours from config)
        #[arg(long = "hours", allow_hyphen_values = true)]
        hours: Option<i64>,
    },
}
