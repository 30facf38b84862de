mod recurrence_service_tests;

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub(super) fn amount(units: i64) -> Decimal {
    Decimal::new(units, 0)
}
