mod common;

use common::{amount, date, open_in, setup_test_env};
use household_ledger::{
    core::services::DedupeScope,
    ledger::{CategoryType, EntryDraft, Month, Period},
};

#[test]
fn repeated_recurring_submission_is_cleaned_to_one_per_month() {
    let (mut manager, dir) = setup_test_env(date(2025, 1, 1));
    let draft = EntryDraft::new(CategoryType::FixedExpense, "Rent", amount(1800), date(2025, 1, 1))
        .category("Home")
        .monthly(3);
    manager.submit(&draft).unwrap();
    manager.submit(&draft).unwrap();
    assert_eq!(manager.ledger().entry_count(), 6);

    let report = manager.dedupe_viewed_year();

    assert_eq!(report.removed, 3);
    assert!(report.persist_warning.is_none());
    for month in [Month::January, Month::February, Month::March] {
        let bucket = manager
            .ledger()
            .bucket(Period::new(2025, month), CategoryType::FixedExpense);
        assert_eq!(bucket.len(), 1, "{month}");
    }
    assert_eq!(open_in(&dir, date(2025, 1, 1)).ledger().entry_count(), 3);
}

#[test]
fn second_pass_finds_nothing() {
    let (mut manager, _) = setup_test_env(date(2025, 1, 1));
    let draft = EntryDraft::new(CategoryType::Income, "Rent share", amount(600), date(2025, 1, 2))
        .monthly(2);
    manager.submit(&draft).unwrap();
    manager.submit(&draft).unwrap();

    assert_eq!(manager.dedupe(DedupeScope::All).removed, 2);
    let again = manager.dedupe(DedupeScope::All);
    assert_eq!(again.removed, 0);
    assert_eq!(again.to_string(), "No duplicates found");
}

#[test]
fn single_entries_on_different_dates_survive() {
    let (mut manager, _) = setup_test_env(date(2025, 5, 1));
    manager.set_view(Month::May, 2025);
    for day in [3, 17] {
        manager
            .submit(
                &EntryDraft::new(CategoryType::VariableExpense, "Taxi", amount(30), date(2025, 5, day))
                    .category("Transport"),
            )
            .unwrap();
    }

    let report = manager.dedupe_viewed_year();

    assert_eq!(report.removed, 0);
    assert_eq!(manager.ledger().entry_count(), 2);
}

#[test]
fn year_scope_leaves_other_years_alone() {
    let (mut manager, _) = setup_test_env(date(2025, 1, 1));
    // Recurring lookalikes on the same date are both accepted on insert.
    for year in [2024, 2025] {
        let draft = EntryDraft::new(CategoryType::FixedExpense, "Gym", amount(80), date(year, 2, 1))
            .category("Health")
            .monthly(1);
        manager.submit(&draft).unwrap();
        manager.submit(&draft).unwrap();
    }
    let feb = |year| {
        manager
            .ledger()
            .bucket(Period::new(year, Month::February), CategoryType::FixedExpense)
            .len()
    };
    assert_eq!((feb(2024), feb(2025)), (2, 2));

    let report = manager.dedupe(DedupeScope::Year(2025));

    assert_eq!(report.removed, 1);
    assert_eq!(report.details[0].period, Period::new(2025, Month::February));
    assert_eq!(
        manager
            .ledger()
            .bucket(Period::new(2024, Month::February), CategoryType::FixedExpense)
            .len(),
        2
    );
}
