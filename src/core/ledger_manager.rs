use std::fmt;

use crate::config::Config;
use crate::core::services::{
    DedupeReport, DedupeScope, DeleteMode, DeleteReport, DuplicateService, EditReport, EntryFilter,
    EntryRef, ProjectionReport, RecurrenceService, SeriesService, ServiceResult, SummaryService,
    Totals,
};
use crate::core::time::Clock;
use crate::ledger::{
    CategoryType, Entry, EntryDraft, EntryForm, FormPurpose, Ledger, Month, Period, ViewContext,
};
use crate::storage::{LedgerStore, Theme};

/// What a completed operation changed. Sent to every [`ChangeObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerChange {
    Loaded,
    EntriesAdded { inserted: Vec<Period> },
    EntryEdited { location: EntryRef },
    EntriesRemoved { periods: Vec<Period> },
    DuplicatesRemoved { removed: usize },
    MonthCleared { period: Period, removed: usize },
    ViewChanged(ViewContext),
    ThemeChanged(Theme),
}

/// Re-render hook for whatever presents the ledger.
pub trait ChangeObserver {
    fn on_change(&self, change: &LedgerChange);
}

/// Metadata describing the outcome of opening the ledger.
#[derive(Debug, Clone, Default)]
pub struct LoadMetadata {
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClearMonthReport {
    pub period: Period,
    pub removed: usize,
    pub persist_warning: Option<String>,
}

impl fmt::Display for ClearMonthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cleared ({} entries)", self.period, self.removed)
    }
}

/// Session facade: owns the ledger, the viewed month and the store, and
/// persists exactly once after each completed mutation.
///
/// Mutating methods take `&mut self`, so a submission cannot start while
/// another one is still running.
pub struct LedgerManager {
    ledger: Ledger,
    view: ViewContext,
    theme: Theme,
    config: Config,
    store: LedgerStore,
    clock: Box<dyn Clock>,
    observers: Vec<Box<dyn ChangeObserver>>,
}

impl LedgerManager {
    /// Restores view state, theme and ledger from `store`.
    pub fn open(
        store: LedgerStore,
        config: Config,
        clock: Box<dyn Clock>,
    ) -> ServiceResult<(Self, LoadMetadata)> {
        let view = store.load_view(&config, clock.as_ref());
        let report = store.load(view.year)?;
        let theme = store.load_theme();
        let metadata = LoadMetadata {
            warnings: report.warnings,
            migrations: report.migrations,
            entries: report.ledger.entry_count(),
        };
        tracing::info!(
            year = view.year,
            month = %view.month,
            entries = metadata.entries,
            warnings = metadata.warnings.len(),
            "ledger opened"
        );
        let manager = Self {
            ledger: report.ledger,
            view,
            theme,
            config,
            store,
            clock,
            observers: Vec::new(),
        };
        Ok((manager, metadata))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn view(&self) -> ViewContext {
        self.view
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn subscribe(&mut self, observer: Box<dyn ChangeObserver>) {
        self.observers.push(observer);
    }

    /// Creates an entry, projecting it forward when it recurs.
    pub fn submit(&mut self, draft: &EntryDraft) -> ServiceResult<ProjectionReport> {
        let mut report = RecurrenceService::project(&mut self.ledger, draft, self.view, &self.config)?;
        report.persist_warning = self.persist();
        self.notify(LedgerChange::EntriesAdded {
            inserted: report.inserted.clone(),
        });
        Ok(report)
    }

    /// Parses raw field values and submits them.
    pub fn submit_form(&mut self, form: EntryForm) -> ServiceResult<ProjectionReport> {
        let draft = form.into_draft(FormPurpose::Create, self.clock.as_ref())?;
        self.submit(&draft)
    }

    pub fn edit(&mut self, target: EntryRef, draft: &EntryDraft) -> ServiceResult<Option<EditReport>> {
        let Some(mut report) =
            SeriesService::edit(&mut self.ledger, self.view, target, draft, &self.config)?
        else {
            return Ok(None);
        };
        report.persist_warning = self.persist();
        self.notify(LedgerChange::EntryEdited {
            location: report.location,
        });
        Ok(Some(report))
    }

    pub fn edit_form(&mut self, target: EntryRef, form: EntryForm) -> ServiceResult<Option<EditReport>> {
        let draft = form.into_draft(FormPurpose::Edit, self.clock.as_ref())?;
        self.edit(target, &draft)
    }

    pub fn delete(&mut self, target: EntryRef, mode: DeleteMode) -> ServiceResult<Option<DeleteReport>> {
        let Some(mut report) =
            SeriesService::delete(&mut self.ledger, self.view, target, mode, &self.config)?
        else {
            return Ok(None);
        };
        report.persist_warning = self.persist();
        self.notify(LedgerChange::EntriesRemoved {
            periods: report.periods.clone(),
        });
        Ok(Some(report))
    }

    /// Removes duplicates in `scope`. Nothing is written when none were found.
    pub fn dedupe(&mut self, scope: DedupeScope) -> DedupeReport {
        let mut report = DuplicateService::dedupe(&mut self.ledger, scope);
        if report.removed > 0 {
            report.persist_warning = self.persist();
            self.notify(LedgerChange::DuplicatesRemoved {
                removed: report.removed,
            });
        }
        tracing::info!(removed = report.removed, scope = ?scope, "duplicate cleanup finished");
        report
    }

    /// Duplicate cleanup limited to the viewed year.
    pub fn dedupe_viewed_year(&mut self) -> DedupeReport {
        self.dedupe(DedupeScope::Year(self.view.year))
    }

    /// Deletes every entry of the viewed month.
    pub fn clear_month(&mut self) -> ClearMonthReport {
        let period = self.view.period();
        let removed = self.ledger.clear_month(period);
        let persist_warning = self.persist();
        self.notify(LedgerChange::MonthCleared { period, removed });
        ClearMonthReport {
            period,
            removed,
            persist_warning,
        }
    }

    /// Switches the viewed month and year. The year is clamped into the
    /// configured bounds. Returns a warning if the view could not be saved.
    pub fn set_view(&mut self, month: Month, year: i32) -> Option<String> {
        let view = ViewContext::new(year, month).with_year_clamped(
            year,
            self.config.min_year,
            self.config.max_year,
        );
        if view == self.view {
            return None;
        }
        self.view = view;
        let warning = self.store.save_view(view).err().map(|err| {
            tracing::warn!(error = %err, "failed to save view state");
            err.to_string()
        });
        self.notify(LedgerChange::ViewChanged(view));
        warning
    }

    /// Moves one month back, stopping at January.
    pub fn previous_month(&mut self) -> Option<String> {
        match self.view.month.index().checked_sub(1).and_then(Month::from_index) {
            Some(month) => self.set_view(month, self.view.year),
            None => None,
        }
    }

    /// Moves one month forward, stopping at December.
    pub fn next_month(&mut self) -> Option<String> {
        match Month::from_index(self.view.month.index() + 1) {
            Some(month) => self.set_view(month, self.view.year),
            None => None,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> Option<String> {
        self.theme = theme;
        let warning = self.store.save_theme(theme).err().map(|err| {
            tracing::warn!(error = %err, "failed to save theme");
            err.to_string()
        });
        self.notify(LedgerChange::ThemeChanged(theme));
        warning
    }

    pub fn toggle_theme(&mut self) -> Option<String> {
        self.set_theme(self.theme.toggled())
    }

    pub fn month_totals(&self) -> Totals {
        SummaryService::month_totals(&self.ledger, self.view.period())
    }

    pub fn year_totals(&self) -> Totals {
        SummaryService::year_totals(&self.ledger, self.view.year)
    }

    pub fn categories(&self) -> Vec<String> {
        SummaryService::categories(&self.ledger, self.view.year, &self.config.default_category)
    }

    /// Entries of the viewed month for `kind`, with their bucket positions.
    pub fn entries(&self, kind: CategoryType, filter: &EntryFilter) -> Vec<(usize, &Entry)> {
        SummaryService::filtered(&self.ledger, self.view.period(), kind, filter)
    }

    pub fn overdue(&self) -> Vec<&Entry> {
        SummaryService::overdue(&self.ledger, self.view.period(), self.clock.today())
    }

    fn persist(&self) -> Option<String> {
        match self.store.persist_all(&self.ledger) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(error = %err, "ledger changed in memory but could not be saved");
                Some(err.to_string())
            }
        }
    }

    fn notify(&self, change: LedgerChange) {
        for observer in &self.observers {
            observer.on_change(&change);
        }
    }
}
