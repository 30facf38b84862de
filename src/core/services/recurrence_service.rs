//! Projects a submitted entry across the months of its recurrence.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::{
    config::{Config, SeedPlacement},
    errors::ValidationError,
    ledger::{Entry, EntryDraft, EntryStatus, Ledger, Period, ViewContext},
};

use super::{
    duplicate_service::{DuplicateService, InsertOutcome},
    ServiceError, ServiceResult,
};

/// Where each occurrence of a projection ended up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionReport {
    pub description: String,
    pub inserted: Vec<Period>,
    pub skipped: Vec<Period>,
    pub series_id: Option<Uuid>,
    pub persist_warning: Option<String>,
}

impl ProjectionReport {
    pub fn attempted(&self) -> usize {
        self.inserted.len() + self.skipped.len()
    }
}

impl fmt::Display for ProjectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inserted.as_slice() {
            [] => write!(f, "'{}' was not added", self.description)?,
            [only] => write!(f, "Added '{}' to {}", self.description, only)?,
            many => write!(f, "Added '{}' to {} months", self.description, many.len())?,
        }
        if !self.skipped.is_empty() {
            write!(f, " ({} duplicate(s) skipped)", self.skipped.len())?;
        }
        Ok(())
    }
}

pub struct RecurrenceService;

impl RecurrenceService {
    /// Inserts the seed entry and, for recurring drafts, one occurrence per
    /// following month until the recurrence count is reached.
    ///
    /// Validation happens before anything is written, so a rejected draft
    /// leaves the ledger untouched. Persisting is left to the caller.
    pub fn project(
        ledger: &mut Ledger,
        draft: &EntryDraft,
        view: ViewContext,
        config: &Config,
    ) -> ServiceResult<ProjectionReport> {
        let seed = draft.to_entry(config)?;
        let seed_period = match config.seed_placement {
            SeedPlacement::EntryDate => Period::of_date(seed.entry_date),
            SeedPlacement::ViewingMonth => view.period(),
        };

        let count = seed.recurrence_count.unwrap_or(1);
        let series_id = seed.recurring.then(Uuid::new_v4);
        let mut report = ProjectionReport {
            description: seed.description.clone(),
            series_id,
            ..ProjectionReport::default()
        };

        let mut occurrences = Vec::new();
        for (offset, period) in Self::occurrence_periods(seed_period, count).enumerate() {
            let mut entry = if offset == 0 {
                seed.clone()
            } else {
                Self::occurrence(&seed, period, config.recurrence_day_cap)?
            };
            entry.series_id = series_id;
            if offset > 0 {
                entry.status = Self::status_for(period, view, seed.status);
            }
            occurrences.push((period, entry));
        }

        for (period, entry) in occurrences {
            match DuplicateService::insert_unique(ledger, period, draft.kind, entry) {
                InsertOutcome::Inserted => report.inserted.push(period),
                InsertOutcome::SkippedDuplicate => report.skipped.push(period),
            }
        }

        tracing::info!(
            description = %report.description,
            kind = %draft.kind,
            inserted = report.inserted.len(),
            skipped = report.skipped.len(),
            "projected entry"
        );
        Ok(report)
    }

    /// `count` consecutive periods starting at `seed`, rolling into the next
    /// year after December. Always yields at least the seed.
    pub fn occurrence_periods(seed: Period, count: u32) -> impl Iterator<Item = Period> {
        std::iter::successors(Some(seed), |period| Some(period.next())).take(count.max(1) as usize)
    }

    /// Occurrences strictly after the viewed month start out pending.
    pub fn status_for(period: Period, view: ViewContext, submitted: EntryStatus) -> EntryStatus {
        if view.is_future(period) {
            EntryStatus::Pending
        } else {
            submitted
        }
    }

    fn occurrence(seed: &Entry, period: Period, day_cap: u32) -> ServiceResult<Entry> {
        let entry_date = Self::shift(seed.entry_date, period, day_cap, "entry_date")?;
        let due_date = seed
            .due_date
            .map(|due| Self::shift(due, period, day_cap, "due_date"))
            .transpose()?;

        let mut entry = seed.clone();
        entry.entry_date = entry_date;
        entry.due_date = due_date;
        Ok(entry)
    }

    fn shift(
        date: NaiveDate,
        period: Period,
        day_cap: u32,
        field: &'static str,
    ) -> ServiceResult<NaiveDate> {
        period
            .date_with_day(date.day(), day_cap)
            .ok_or(ServiceError::Validation(ValidationError::InvalidDate { field }))
    }
}
