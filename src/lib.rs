#![doc(test(attr(deny(warnings))))]

//! Household Ledger tracks monthly income and expense entries grouped by
//! year and month, with monthly recurrence, paid/pending status and
//! duplicate cleanup, persisted to a local key-value store.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::config::{Config, ConfigManager};
pub use crate::core::services::{ServiceError, ServiceResult};
pub use crate::core::{ChangeObserver, LedgerChange, LedgerManager};
pub use crate::errors::{LedgerError, ValidationError};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and logs the build this binary came from.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(
            version = build.version,
            git_hash = build.git_hash,
            tree = build.tree,
            profile = build.profile,
            built_at = build.timestamp,
            "Household Ledger tracing initialized."
        );
    });
}

/// Opens the ledger stored under the configured data directory using the
/// system clock.
pub fn open_default() -> ServiceResult<(LedgerManager, crate::core::LoadMetadata)> {
    let config = ConfigManager::new()
        .and_then(|manager| manager.load())
        .map_err(|err| ServiceError::Invalid(err.to_string()))?;
    let backend = storage::JsonStorage::new(config.resolve_data_dir())?;
    let store = storage::LedgerStore::new(Box::new(backend));
    LedgerManager::open(store, config, Box::new(crate::core::time::SystemClock))
}
