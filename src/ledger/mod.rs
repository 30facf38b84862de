//! Ledger data model: entries, periods, and the year/month/kind tree.

pub mod draft;
pub mod entry;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod period;

pub use draft::{EntryDraft, EntryForm, FormPurpose};
pub use entry::{CategoryType, Entry, EntryStatus};
pub use ledger::{Ledger, MonthBook, YearBook};
pub use period::{Month, Period, ViewContext};
