#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Local, NaiveDate};
use rweeklog::core::policy::WorkPolicy;
use rweeklog::core::register::RegisterLogic;
use rweeklog::db::sqlite_store::SqliteStore;
use rweeklog::utils::date::{parse_date, parse_timestamp};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rwl() -> Command {
    cargo_bin_cmd!("rweeklog")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rweeklog.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize a test DB through the CLI
pub fn init(db_path: &str) {
    rwl()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Local timestamp from "YYYY-MM-DD HH:MM"
pub fn ts(s: &str) -> DateTime<Local> {
    parse_timestamp(s).expect("valid test timestamp")
}

pub fn day(s: &str) -> NaiveDate {
    parse_date(s).expect("valid test date")
}

/// Monday 2025-09-01, the week most tests work in
pub fn week1() -> NaiveDate {
    day("2025-09-01")
}

/// In-memory store with `users` registered during week1
pub fn store_with_users(users: &[&str]) -> SqliteStore {
    let mut store = SqliteStore::open_in_memory().expect("open in-memory store");
    let policy = WorkPolicy::default();
    for u in users {
        RegisterLogic::apply(&mut store, &policy, u, ts("2025-09-01 08:00")).expect("register");
    }
    store
}
