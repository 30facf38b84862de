use super::{amount, date};
use crate::config::{Config, SeedPlacement};
use crate::core::services::{RecurrenceService, ServiceError};
use crate::errors::ValidationError;
use crate::ledger::{CategoryType, EntryDraft, EntryStatus, Ledger, Month, Period, ViewContext};

fn rent(entry_date: chrono::NaiveDate, count: u32) -> EntryDraft {
    EntryDraft::new(CategoryType::FixedExpense, "Rent", amount(1500), entry_date)
        .category("Home")
        .monthly(count)
}

#[test]
fn recurring_entry_fills_requested_months() {
    let mut ledger = Ledger::new();
    let view = ViewContext::new(2025, Month::March);
    let report = RecurrenceService::project(
        &mut ledger,
        &rent(date(2025, 3, 5), 4),
        view,
        &Config::default(),
    )
    .unwrap();

    assert_eq!(report.inserted.len(), 4);
    assert!(report.skipped.is_empty());
    for month in [Month::March, Month::April, Month::May, Month::June] {
        let bucket = ledger.bucket(Period::new(2025, month), CategoryType::FixedExpense);
        assert_eq!(bucket.len(), 1, "{month}");
    }
    assert!(ledger
        .bucket(Period::new(2025, Month::July), CategoryType::FixedExpense)
        .is_empty());
}

#[test]
fn projection_rolls_into_next_year() {
    let mut ledger = Ledger::new();
    let view = ViewContext::new(2025, Month::November);
    let report = RecurrenceService::project(
        &mut ledger,
        &rent(date(2025, 11, 5), 3),
        view,
        &Config::default(),
    )
    .unwrap();

    assert_eq!(
        report.inserted,
        vec![
            Period::new(2025, Month::November),
            Period::new(2025, Month::December),
            Period::new(2026, Month::January),
        ]
    );
    let january = &ledger.bucket(Period::new(2026, Month::January), CategoryType::FixedExpense)[0];
    assert_eq!(january.entry_date, date(2026, 1, 5));
}

#[test]
fn occurrence_days_are_capped() {
    let mut ledger = Ledger::new();
    let view = ViewContext::new(2025, Month::January);
    let draft = rent(date(2025, 1, 31), 3).due(date(2025, 1, 31));
    RecurrenceService::project(&mut ledger, &draft, view, &Config::default()).unwrap();

    let seed = &ledger.bucket(Period::new(2025, Month::January), CategoryType::FixedExpense)[0];
    assert_eq!(seed.entry_date, date(2025, 1, 31));

    let feb = &ledger.bucket(Period::new(2025, Month::February), CategoryType::FixedExpense)[0];
    assert_eq!(feb.entry_date, date(2025, 2, 28));
    assert_eq!(feb.due_date, Some(date(2025, 2, 28)));

    let mar = &ledger.bucket(Period::new(2025, Month::March), CategoryType::FixedExpense)[0];
    assert_eq!(mar.entry_date, date(2025, 3, 28));
}

#[test]
fn future_occurrences_start_pending() {
    let mut ledger = Ledger::new();
    let view = ViewContext::new(2025, Month::May);
    let draft = rent(date(2025, 5, 10), 3).status(EntryStatus::Paid);
    RecurrenceService::project(&mut ledger, &draft, view, &Config::default()).unwrap();

    let status = |month| ledger.bucket(Period::new(2025, month), CategoryType::FixedExpense)[0].status;
    assert_eq!(status(Month::May), EntryStatus::Paid);
    assert_eq!(status(Month::June), EntryStatus::Pending);
    assert_eq!(status(Month::July), EntryStatus::Pending);
}

#[test]
fn occurrences_in_past_months_keep_submitted_status() {
    let mut ledger = Ledger::new();
    // Browsing August while back-filling a series that started in June.
    let view = ViewContext::new(2025, Month::August);
    let draft = rent(date(2025, 6, 1), 4).status(EntryStatus::Paid);
    RecurrenceService::project(&mut ledger, &draft, view, &Config::default()).unwrap();

    let status = |month| ledger.bucket(Period::new(2025, month), CategoryType::FixedExpense)[0].status;
    assert_eq!(status(Month::July), EntryStatus::Paid);
    assert_eq!(status(Month::August), EntryStatus::Paid);
    assert_eq!(status(Month::September), EntryStatus::Pending);
}

#[test]
fn occurrences_share_one_series_id() {
    let mut ledger = Ledger::new();
    let view = ViewContext::new(2025, Month::January);
    let report = RecurrenceService::project(
        &mut ledger,
        &rent(date(2025, 1, 5), 12),
        view,
        &Config::default(),
    )
    .unwrap();

    let id = report.series_id.expect("recurring projection has an id");
    let ids: Vec<_> = ledger
        .buckets()
        .flat_map(|(_, _, entries)| entries.iter().map(|entry| entry.series_id))
        .collect();
    assert_eq!(ids.len(), 12);
    assert!(ids.iter().all(|entry_id| *entry_id == Some(id)));
}

#[test]
fn single_entry_is_inserted_once() {
    let mut ledger = Ledger::new();
    let view = ViewContext::new(2025, Month::April);
    let draft = EntryDraft::new(
        CategoryType::VariableExpense,
        "Groceries",
        amount(230),
        date(2025, 4, 12),
    )
    .category("Food");

    let first = RecurrenceService::project(&mut ledger, &draft, view, &Config::default()).unwrap();
    let second = RecurrenceService::project(&mut ledger, &draft, view, &Config::default()).unwrap();

    assert_eq!(first.inserted.len(), 1);
    assert_eq!(first.series_id, None);
    assert_eq!(second.inserted.len(), 0);
    assert_eq!(second.skipped, vec![Period::new(2025, Month::April)]);
    assert_eq!(ledger.entry_count(), 1);
}

#[test]
fn missing_count_defaults_to_twelve() {
    let mut ledger = Ledger::new();
    let view = ViewContext::new(2025, Month::January);
    let mut draft = rent(date(2025, 1, 5), 0);
    draft.recurrence_count = None;
    let report = RecurrenceService::project(&mut ledger, &draft, view, &Config::default()).unwrap();
    assert_eq!(report.attempted(), 12);
}

#[test]
fn viewing_month_placement_puts_seed_in_view() {
    let mut ledger = Ledger::new();
    let config = Config {
        seed_placement: SeedPlacement::ViewingMonth,
        ..Config::default()
    };
    let view = ViewContext::new(2025, Month::June);
    let draft = EntryDraft::new(CategoryType::Income, "Bonus", amount(800), date(2025, 2, 14));

    let report = RecurrenceService::project(&mut ledger, &draft, view, &config).unwrap();

    assert_eq!(report.inserted, vec![Period::new(2025, Month::June)]);
    let entry = &ledger.bucket(Period::new(2025, Month::June), CategoryType::Income)[0];
    assert_eq!(entry.entry_date, date(2025, 2, 14));
}

#[test]
fn invalid_draft_leaves_ledger_untouched() {
    let mut ledger = Ledger::new();
    let view = ViewContext::new(2025, Month::January);
    let draft = rent(date(2025, 1, 10), 6).due(date(2025, 1, 2));

    let err = RecurrenceService::project(&mut ledger, &draft, view, &Config::default()).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::DueBeforeEntry)
    ));
    assert!(ledger.is_empty());
    assert!(ledger.year(2025).is_none());
}

#[test]
fn blank_category_uses_default() {
    let mut ledger = Ledger::new();
    let view = ViewContext::new(2025, Month::January);
    let draft = EntryDraft::new(CategoryType::Income, "Salary", amount(4000), date(2025, 1, 5));
    RecurrenceService::project(&mut ledger, &draft, view, &Config::default()).unwrap();
    let entry = &ledger.bucket(Period::new(2025, Month::January), CategoryType::Income)[0];
    assert_eq!(entry.category, "Other");
}

#[test]
fn due_day_is_projected_into_each_occurrence_month() {
    let mut ledger = Ledger::new();
    let view = ViewContext::new(2025, Month::January);
    let draft = rent(date(2025, 1, 20), 3).due(date(2025, 2, 10));
    RecurrenceService::project(&mut ledger, &draft, view, &Config::default()).unwrap();

    let entry = |month| {
        ledger.bucket(Period::new(2025, month), CategoryType::FixedExpense)[0].clone()
    };
    assert_eq!(entry(Month::January).due_date, Some(date(2025, 2, 10)));
    let feb = entry(Month::February);
    assert_eq!(feb.entry_date, date(2025, 2, 20));
    assert_eq!(feb.due_date, Some(date(2025, 2, 10)));
    assert_eq!(entry(Month::March).due_date, Some(date(2025, 3, 10)));
}

#[test]
fn oversized_recurrence_count_is_rejected() {
    let mut ledger = Ledger::new();
    let view = ViewContext::new(2025, Month::January);
    let config = Config::default();

    let err = RecurrenceService::project(&mut ledger, &rent(date(2025, 1, 5), u32::MAX), view, &config)
        .unwrap_err();

    match err {
        ServiceError::Validation(err) => {
            assert_eq!(err, ValidationError::RecurrenceTooLong { max: 120 });
            assert_eq!(err.field(), "recurrence_count");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(ledger.is_empty());

    let report =
        RecurrenceService::project(&mut ledger, &rent(date(2025, 1, 5), 120), view, &config).unwrap();
    assert_eq!(report.inserted.len(), 120);
}
