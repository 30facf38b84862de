pub mod duplicate_service;
pub mod recurrence_service;
pub mod series_service;
pub mod summary_service;

pub use duplicate_service::{
    DedupeReport, DedupeScope, DuplicateService, IdentityKey, InsertOutcome, RemovedDuplicate,
};
pub use recurrence_service::{ProjectionReport, RecurrenceService};
pub use series_service::{DeleteMode, DeleteReport, EditOutcome, EditReport, EntryRef, SeriesService};
pub use summary_service::{EntryFilter, SummaryService, Totals};

use crate::errors::{LedgerError, ValidationError};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests;
