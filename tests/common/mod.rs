#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use assert_cmd::{assert::Assert, Command};
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated admin home directory.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Runs the shell in script mode against `home`, feeding `input` on stdin.
pub fn run_script(home: &Path, input: &str) -> Assert {
    Command::cargo_bin("cabin_admin_cli")
        .expect("binary built")
        .env("CABIN_ADMIN_CLI_SCRIPT", "1")
        .env("CABIN_ADMIN_HOME", home)
        .env_remove("RUST_LOG")
        .write_stdin(input.to_string())
        .assert()
}

/// `YYYY-MM-DD` for today plus `days`.
pub fn day(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

/// A home with one 100/10 cabin and one guest.
pub fn seeded_home() -> PathBuf {
    let home = temp_home();
    run_script(
        &home,
        "add-cabin 001 4 100 10\nadd-guest \"Jonas Schmedtmann\" jonas@example.com\nexit\n",
    )
    .success();
    home
}
