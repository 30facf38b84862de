//! Edit and delete for entries that may belong to a monthly series.

use std::fmt;

use uuid::Uuid;

use crate::{
    config::{Config, SeriesMatching},
    ledger::{CategoryType, Entry, EntryDraft, Ledger, Month, Period, ViewContext},
};

use super::ServiceResult;

/// Position of an entry inside the viewed year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef {
    pub month: Month,
    pub kind: CategoryType,
    pub index: usize,
}

impl EntryRef {
    pub fn new(month: Month, kind: CategoryType, index: usize) -> Self {
        Self { month, kind, index }
    }

    pub fn period(&self, view: ViewContext) -> Period {
        Period::new(view.year, self.month)
    }
}

/// Which edit path was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Replaced at the same position.
    Updated,
    /// Category type changed; appended to the new bucket.
    Moved,
    /// Recurring flag changed; removed and appended to the same bucket.
    Recreated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditReport {
    pub outcome: EditOutcome,
    /// Where the edited entry now lives.
    pub location: EntryRef,
    pub persist_warning: Option<String>,
}

impl fmt::Display for EditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            EditOutcome::Updated => f.write_str("Entry updated"),
            EditOutcome::Moved => write!(f, "Entry moved to {}", self.location.kind.label()),
            EditOutcome::Recreated => f.write_str("Entry recreated"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    ThisOccurrence,
    ThisAndFuture,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteReport {
    pub removed: usize,
    /// Periods an entry was removed from, target first.
    pub periods: Vec<Period>,
    pub persist_warning: Option<String>,
}

impl fmt::Display for DeleteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.removed {
            0 => f.write_str("Nothing removed"),
            1 => f.write_str("Entry removed"),
            n => write!(f, "Recurring entry removed from {n} months"),
        }
    }
}

pub struct SeriesService;

impl SeriesService {
    /// Applies `draft` to the entry at `target`.
    ///
    /// Returns `Ok(None)` when nothing lives at `target`. The draft is
    /// validated before the ledger is touched.
    pub fn edit(
        ledger: &mut Ledger,
        view: ViewContext,
        target: EntryRef,
        draft: &EntryDraft,
        config: &Config,
    ) -> ServiceResult<Option<EditReport>> {
        let period = target.period(view);
        let Some(original) = ledger.entry(period, target.kind, target.index).cloned() else {
            tracing::debug!(%period, kind = %target.kind, index = target.index, "edit target missing");
            return Ok(None);
        };

        let mut updated = draft.to_entry(config)?;
        updated.series_id = match (updated.recurring, original.recurring) {
            (false, _) => None,
            (true, true) => original.series_id,
            (true, false) => Some(Uuid::new_v4()),
        };

        let outcome = if draft.kind != target.kind {
            EditOutcome::Moved
        } else if updated.recurring != original.recurring {
            EditOutcome::Recreated
        } else {
            EditOutcome::Updated
        };

        let location = match outcome {
            EditOutcome::Updated => {
                ledger.bucket_mut(period, target.kind)[target.index] = updated;
                target
            }
            EditOutcome::Moved | EditOutcome::Recreated => {
                ledger.bucket_mut(period, target.kind).remove(target.index);
                let bucket = ledger.bucket_mut(period, draft.kind);
                bucket.push(updated);
                EntryRef::new(target.month, draft.kind, bucket.len() - 1)
            }
        };

        tracing::info!(
            %period,
            from = %target.kind,
            to = %location.kind,
            outcome = ?outcome,
            description = %original.description,
            "edited entry"
        );
        Ok(Some(EditReport {
            outcome,
            location,
            persist_warning: None,
        }))
    }

    /// Removes the entry at `target`, and for recurring entries in
    /// [`DeleteMode::ThisAndFuture`] the first matching occurrence in each
    /// later month of the viewed year. The following year is included only
    /// when the target month is not December.
    pub fn delete(
        ledger: &mut Ledger,
        view: ViewContext,
        target: EntryRef,
        mode: DeleteMode,
        config: &Config,
    ) -> ServiceResult<Option<DeleteReport>> {
        let period = target.period(view);
        let Some(bucket) = ledger.existing_bucket_mut(period, target.kind) else {
            tracing::debug!(%period, kind = %target.kind, index = target.index, "delete target missing");
            return Ok(None);
        };
        if target.index >= bucket.len() {
            tracing::debug!(%period, kind = %target.kind, index = target.index, "delete target missing");
            return Ok(None);
        }

        let removed_entry = bucket.remove(target.index);
        let mut report = DeleteReport {
            removed: 1,
            periods: vec![period],
            persist_warning: None,
        };

        if removed_entry.recurring && mode == DeleteMode::ThisAndFuture {
            for later in Self::cascade_periods(period) {
                let Some(bucket) = ledger.existing_bucket_mut(later, target.kind) else {
                    continue;
                };
                let position = bucket.iter().position(|candidate| {
                    Self::same_series(&removed_entry, candidate, config.series_matching)
                });
                if let Some(position) = position {
                    bucket.remove(position);
                    report.removed += 1;
                    report.periods.push(later);
                }
            }
        }

        tracing::info!(
            %period,
            kind = %target.kind,
            mode = ?mode,
            removed = report.removed,
            description = %removed_entry.description,
            "deleted entry"
        );
        Ok(Some(report))
    }

    /// Periods visited by a cascading delete anchored at `anchor`.
    pub fn cascade_periods(anchor: Period) -> Vec<Period> {
        let mut periods: Vec<Period> = Month::ALL[anchor.month.index() + 1..]
            .iter()
            .map(|month| Period::new(anchor.year, *month))
            .collect();
        if !anchor.month.is_december() {
            periods.extend(
                Month::ALL
                    .iter()
                    .map(|month| Period::new(anchor.year + 1, *month)),
            );
        }
        periods
    }

    /// Whether `candidate` belongs to the same series as `target`.
    ///
    /// Id matching falls back to field matching when `target` predates
    /// series ids.
    pub fn same_series(target: &Entry, candidate: &Entry, matching: SeriesMatching) -> bool {
        match (matching, target.series_id) {
            (SeriesMatching::SeriesId, Some(id)) => candidate.series_id == Some(id),
            _ => target.shares_fields_with(candidate),
        }
    }
}
