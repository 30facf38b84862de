mod common;

use std::fs;

use common::{amount, date, open_in, setup_test_env, store_in, temp_data_dir};
use household_ledger::{
    config::Config,
    core::{time::FixedClock, LedgerManager},
    ledger::{CategoryType, EntryDraft, EntryStatus, Month, Period, ViewContext},
    storage::Theme,
};
use serde_json::Value;

fn populate(manager: &mut LedgerManager) {
    manager
        .submit(
            &EntryDraft::new(CategoryType::Income, "Salary", amount(5200), date(2025, 2, 5))
                .category("Work")
                .monthly(12),
        )
        .unwrap();
    manager
        .submit(
            &EntryDraft::new(
                CategoryType::VariableExpense,
                "Pharmacy",
                rust_decimal::Decimal::new(3775, 2),
                date(2025, 2, 11),
            )
            .status(EntryStatus::Pending)
            .due(date(2025, 2, 20)),
        )
        .unwrap();
}

#[test]
fn reload_is_structurally_identical() {
    let (mut manager, dir) = setup_test_env(date(2025, 2, 1));
    populate(&mut manager);

    let reopened = open_in(&dir, date(2025, 2, 1));

    assert_eq!(reopened.ledger(), manager.ledger());
    let pharmacy = &reopened
        .ledger()
        .bucket(Period::new(2025, Month::February), CategoryType::VariableExpense)[0];
    assert_eq!(pharmacy.amount.to_string(), "37.75");
    assert_eq!(pharmacy.due_date, Some(date(2025, 2, 20)));
}

#[test]
fn ledger_record_uses_year_month_kind_layout() {
    let (mut manager, dir) = setup_test_env(date(2025, 2, 1));
    populate(&mut manager);

    let raw = fs::read_to_string(dir.join("ledger.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();

    let salary = &value["2025"]["February"]["income"][0];
    assert_eq!(salary["description"], "Salary");
    assert_eq!(salary["recurring"], true);
    assert_eq!(salary["recurrence_count"], 12);
    assert!(salary["series_id"].is_string());
    assert!(value["2026"]["January"]["income"].is_array());
}

#[test]
fn month_keyed_data_is_migrated_once() {
    let dir = temp_data_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("ledger.json"),
        r#"{
            "March": {
                "income": [
                    { "description": "Salary", "amount": 4000, "category": "Work",
                      "entry_date": "2023-03-05", "status": "paid", "recurring": false }
                ]
            },
            "Total": {}
        }"#,
    )
    .unwrap();
    fs::write(dir.join("view_year.json"), "2024").unwrap();

    let (manager, metadata) = LedgerManager::open(
        store_in(&dir),
        Config::default(),
        Box::new(FixedClock(date(2024, 8, 1))),
    )
    .unwrap();

    assert_eq!(metadata.migrations.len(), 1);
    assert_eq!(metadata.warnings.len(), 1);
    assert_eq!(
        manager
            .ledger()
            .bucket(Period::new(2024, Month::March), CategoryType::Income)
            .len(),
        1
    );
    assert!(manager.ledger().year(2024).unwrap().get(&Month::April).is_none());

    let raw: Value =
        serde_json::from_str(&fs::read_to_string(dir.join("ledger.json")).unwrap()).unwrap();
    assert!(raw.get("March").is_none());
    assert!(raw["2024"]["March"]["income"].is_array());

    let (again, metadata) = LedgerManager::open(
        store_in(&dir),
        Config::default(),
        Box::new(FixedClock(date(2024, 8, 1))),
    )
    .unwrap();
    assert!(metadata.migrations.is_empty());
    assert_eq!(again.ledger(), manager.ledger());
}

#[test]
fn out_of_range_view_records_fall_back() {
    let dir = temp_data_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("view_month.json"), "12").unwrap();
    fs::write(dir.join("view_year.json"), "1999").unwrap();

    let manager = open_in(&dir, date(2026, 9, 30));

    assert_eq!(manager.view(), ViewContext::new(2026, Month::January));
}

#[test]
fn view_and_theme_survive_reopen() {
    let (mut manager, dir) = setup_test_env(date(2025, 2, 1));
    assert_eq!(manager.theme(), Theme::Light);

    assert!(manager.set_view(Month::September, 2027).is_none());
    assert!(manager.toggle_theme().is_none());

    let reopened = open_in(&dir, date(2025, 2, 1));
    assert_eq!(reopened.view(), ViewContext::new(2027, Month::September));
    assert_eq!(reopened.theme(), Theme::Dark);
}

#[test]
fn failed_write_preserves_previous_record() {
    let (mut manager, dir) = setup_test_env(date(2025, 2, 1));
    populate(&mut manager);
    let path = dir.join("ledger.json");
    let original = fs::read_to_string(&path).unwrap();

    // A directory at the temp path makes the atomic write fail before rename.
    fs::create_dir_all(dir.join("ledger.json.tmp")).unwrap();
    let report = manager
        .submit(&EntryDraft::new(
            CategoryType::VariableExpense,
            "Books",
            amount(60),
            date(2025, 2, 14),
        ))
        .unwrap();

    assert!(report.persist_warning.is_some());
    assert_eq!(report.inserted.len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert_eq!(
        manager
            .ledger()
            .bucket(Period::new(2025, Month::February), CategoryType::VariableExpense)
            .len(),
        2
    );
}
