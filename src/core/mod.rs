pub mod ledger_manager;
pub mod services;
pub mod time;

pub use ledger_manager::{ChangeObserver, ClearMonthReport, LedgerChange, LedgerManager, LoadMetadata};
