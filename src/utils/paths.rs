use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".household_ledger";
const DATA_DIR: &str = "data";
const CONFIG_FILE: &str = "config.json";

/// Application data directory: `HOUSEHOLD_LEDGER_HOME` or `~/.household_ledger`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("HOUSEHOLD_LEDGER_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding the key-value records (ledger, view state, theme).
pub fn data_dir_in(base: &Path) -> PathBuf {
    base.join(DATA_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}
