#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use spender_core::{
    config::{Config, ConfigManager},
    core::services::CategoryService,
    ledger::Ledger,
    storage::JsonStorage,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Backup retention used by every test environment.
pub const TEST_RETENTION: usize = 3;

/// Creates isolated storage and config managers backed by a unique directory.
pub fn setup_test_env() -> (JsonStorage, ConfigManager) {
    let base = temp_base();
    let config = Config {
        backup_retention: TEST_RETENTION,
        ..Config::default()
    };
    let storage =
        JsonStorage::from_config(Some(base.clone()), &config).expect("create json storage");
    let config = ConfigManager::with_base_dir(base).expect("create config manager");
    (storage, config)
}

pub fn seeded_ledger(name: &str) -> Ledger {
    let mut ledger = Ledger::new(name);
    CategoryService::seed_defaults(&mut ledger).expect("seed categories");
    spender_core::init();
    ledger
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
