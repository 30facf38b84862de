use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar month used as the second level of the ledger tree.
///
/// Declaration order is calendar order, so derived `Ord` sorts January first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Zero-based index (January = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns `None` for anything outside `0..=11`.
    pub fn from_index(index: usize) -> Option<Month> {
        Self::ALL.get(index).copied()
    }

    /// Converts a chrono month number (1..=12).
    pub fn from_number(number: u32) -> Option<Month> {
        number
            .checked_sub(1)
            .and_then(|idx| Self::from_index(idx as usize))
    }

    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    pub fn from_name(name: &str) -> Option<Month> {
        Self::ALL
            .iter()
            .copied()
            .find(|month| month.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn is_december(self) -> bool {
        self == Month::December
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A (year, month) slot in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub month: Month,
}

impl Period {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    pub fn of_date(date: NaiveDate) -> Self {
        // chrono guarantees 1..=12
        let month = Month::from_number(date.month()).unwrap_or(Month::January);
        Self::new(date.year(), month)
    }

    /// The following month, rolling into January of the next year after December.
    pub fn next(self) -> Self {
        match Month::from_index(self.month.index() + 1) {
            Some(month) => Self::new(self.year, month),
            None => Self::new(self.year + 1, Month::January),
        }
    }

    /// Builds a date inside this period using `min(day, cap)` as the day of month.
    ///
    /// With `cap <= 28` the result is valid for every month.
    pub fn date_with_day(self, day: u32, cap: u32) -> Option<NaiveDate> {
        let day = day.min(cap).max(1);
        NaiveDate::from_ymd_opt(self.year, self.month.number(), day)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

/// The month/year the user is currently browsing.
///
/// Passed explicitly into every operation that needs it (status policy,
/// edit/delete targets, default insertion slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewContext {
    pub year: i32,
    pub month: Month,
}

impl ViewContext {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    pub fn period(&self) -> Period {
        Period::new(self.year, self.month)
    }

    /// Whether `period` lies strictly after the viewed month.
    pub fn is_future(&self, period: Period) -> bool {
        period > self.period()
    }

    pub fn with_month(self, month: Month) -> Self {
        Self { month, ..self }
    }

    /// Changes the viewed year, clamping into `[min_year, max_year]`.
    pub fn with_year_clamped(self, year: i32, min_year: i32, max_year: i32) -> Self {
        Self {
            year: year.clamp(min_year, max_year.max(min_year)),
            ..self
        }
    }
}
