pub mod json_backend;
pub mod ledger_store;
pub mod memory;
pub mod migration;

use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Record holding the whole multi-year ledger document.
pub const LEDGER_KEY: &str = "ledger";
/// Zero-based index of the viewed month.
pub const VIEW_MONTH_KEY: &str = "view_month";
pub const VIEW_YEAR_KEY: &str = "view_year";
pub const THEME_KEY: &str = "theme";
/// Raw copy of a ledger record that could not be parsed.
pub const CORRUPT_LEDGER_KEY: &str = "ledger_corrupt";

/// String key-value persistence, one value per record key.
pub trait StorageBackend: Send + Sync {
    /// Returns `None` when the key was never written.
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub use json_backend::JsonStorage;
pub use ledger_store::{LedgerStore, LoadReport, Theme};
pub use memory::MemoryStorage;
