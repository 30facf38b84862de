#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use household_ledger::{
    config::Config,
    core::{time::FixedClock, LedgerManager},
    storage::{JsonStorage, LedgerStore},
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique data directory that outlives the calling test.
pub fn temp_data_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().join("data");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn store_in(dir: &Path) -> LedgerStore {
    let storage = JsonStorage::new(dir).expect("create json storage backend");
    LedgerStore::new(Box::new(storage))
}

pub fn open_in(dir: &Path, today: NaiveDate) -> LedgerManager {
    open_with(dir, today, Config::default())
}

pub fn open_with(dir: &Path, today: NaiveDate, config: Config) -> LedgerManager {
    let (manager, _) = LedgerManager::open(store_in(dir), config, Box::new(FixedClock(today)))
        .expect("open ledger manager");
    manager
}

/// Manager over a fresh directory; returns the directory for reopening.
pub fn setup_test_env(today: NaiveDate) -> (LedgerManager, PathBuf) {
    let dir = temp_data_dir();
    (open_in(&dir, today), dir)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn amount(units: i64) -> Decimal {
    Decimal::new(units, 0)
}
