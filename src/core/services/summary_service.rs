use std::{collections::BTreeSet, fmt};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ledger::{CategoryType, Entry, EntryStatus, Ledger, Month, Period};

/// Per-kind sums for a month or a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: Decimal,
    pub fixed_expenses: Decimal,
    pub variable_expenses: Decimal,
}

impl Totals {
    pub fn total_expenses(&self) -> Decimal {
        self.fixed_expenses + self.variable_expenses
    }

    pub fn balance(&self) -> Decimal {
        self.income - self.total_expenses()
    }

    pub fn of_kind(&self, kind: CategoryType) -> Decimal {
        match kind {
            CategoryType::Income => self.income,
            CategoryType::FixedExpense => self.fixed_expenses,
            CategoryType::VariableExpense => self.variable_expenses,
        }
    }

    fn record(&mut self, kind: CategoryType, amount: Decimal) {
        match kind {
            CategoryType::Income => self.income += amount,
            CategoryType::FixedExpense => self.fixed_expenses += amount,
            CategoryType::VariableExpense => self.variable_expenses += amount,
        }
    }
}

impl std::ops::Add for Totals {
    type Output = Totals;

    fn add(self, rhs: Totals) -> Totals {
        Totals {
            income: self.income + rhs.income,
            fixed_expenses: self.fixed_expenses + rhs.fixed_expenses,
            variable_expenses: self.variable_expenses + rhs.variable_expenses,
        }
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "income {:.2} | expenses {:.2} | balance {:.2}",
            self.income,
            self.total_expenses(),
            self.balance()
        )
    }
}

/// Narrowing applied to one bucket before display.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub category: Option<String>,
    pub status: Option<EntryStatus>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
}

impl EntryFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.status.is_none() && self.search.is_none()
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(category) = &self.category {
            if &entry.category != category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if entry.status != status {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => entry
                .description
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn month_totals(ledger: &Ledger, period: Period) -> Totals {
        let mut totals = Totals::default();
        for kind in CategoryType::ALL {
            for entry in ledger.bucket(period, kind) {
                totals.record(kind, entry.amount);
            }
        }
        totals
    }

    pub fn year_totals(ledger: &Ledger, year: i32) -> Totals {
        Month::ALL
            .iter()
            .map(|month| Self::month_totals(ledger, Period::new(year, *month)))
            .fold(Totals::default(), |acc, month| acc + month)
    }

    /// Sorted, de-duplicated categories used anywhere in `year`.
    pub fn categories(ledger: &Ledger, year: i32, default_category: &str) -> Vec<String> {
        ledger
            .buckets()
            .filter(|(period, _, _)| period.year == year)
            .flat_map(|(_, _, entries)| entries.iter())
            .map(|entry| match entry.category.trim() {
                "" => default_category.to_string(),
                other => other.to_string(),
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Entries of one bucket passing `filter`, with their bucket positions.
    pub fn filtered<'a>(
        ledger: &'a Ledger,
        period: Period,
        kind: CategoryType,
        filter: &EntryFilter,
    ) -> Vec<(usize, &'a Entry)> {
        ledger
            .bucket(period, kind)
            .iter()
            .enumerate()
            .filter(|(_, entry)| filter.matches(entry))
            .collect()
    }

    /// Pending entries whose due date has passed.
    pub fn overdue<'a>(ledger: &'a Ledger, period: Period, today: NaiveDate) -> Vec<&'a Entry> {
        CategoryType::ALL
            .iter()
            .flat_map(|kind| ledger.bucket(period, *kind))
            .filter(|entry| entry.is_overdue(today))
            .collect()
    }
}
