use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    entry::{CategoryType, Entry},
    period::{Month, Period},
};

/// Entries of one month, keyed by category type.
pub type MonthBook = BTreeMap<CategoryType, Vec<Entry>>;

/// Months of one year.
pub type YearBook = BTreeMap<Month, MonthBook>;

/// Multi-year ledger tree: year → month → category type → ordered entries.
///
/// Serializes transparently as
/// `{ "<year>": { "<Month>": { "<kind>": [Entry, ...] } } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    years: BTreeMap<i32, YearBook>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_years(years: BTreeMap<i32, YearBook>) -> Self {
        Self { years }
    }

    /// Read-only bucket access. Never creates the slot.
    pub fn bucket(&self, period: Period, kind: CategoryType) -> &[Entry] {
        self.years
            .get(&period.year)
            .and_then(|year| year.get(&period.month))
            .and_then(|month| month.get(&kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the bucket for the slot, creating every missing level first.
    pub fn bucket_mut(&mut self, period: Period, kind: CategoryType) -> &mut Vec<Entry> {
        self.years
            .entry(period.year)
            .or_default()
            .entry(period.month)
            .or_default()
            .entry(kind)
            .or_default()
    }

    /// Bucket access for mutation without creating anything.
    pub fn existing_bucket_mut(
        &mut self,
        period: Period,
        kind: CategoryType,
    ) -> Option<&mut Vec<Entry>> {
        self.years
            .get_mut(&period.year)
            .and_then(|year| year.get_mut(&period.month))
            .and_then(|month| month.get_mut(&kind))
    }

    pub fn entry(&self, period: Period, kind: CategoryType, index: usize) -> Option<&Entry> {
        self.bucket(period, kind).get(index)
    }

    pub fn year(&self, year: i32) -> Option<&YearBook> {
        self.years.get(&year)
    }

    /// Visits every touched bucket in chronological order.
    pub fn buckets(&self) -> impl Iterator<Item = (Period, CategoryType, &[Entry])> + '_ {
        self.years.iter().flat_map(|(year, months)| {
            months.iter().flat_map(move |(month, kinds)| {
                kinds
                    .iter()
                    .map(move |(kind, entries)| (Period::new(*year, *month), *kind, entries.as_slice()))
            })
        })
    }

    /// Mutable variant of [`Ledger::buckets`], optionally limited to one year.
    pub fn buckets_mut(
        &mut self,
        year: Option<i32>,
    ) -> impl Iterator<Item = (Period, CategoryType, &mut Vec<Entry>)> + '_ {
        self.years
            .iter_mut()
            .filter(move |(y, _)| year.map_or(true, |only| **y == only))
            .flat_map(|(year, months)| {
                let year = *year;
                months.iter_mut().flat_map(move |(month, kinds)| {
                    let period = Period::new(year, *month);
                    kinds
                        .iter_mut()
                        .map(move |(kind, entries)| (period, *kind, entries))
                })
            })
    }

    /// Drops every bucket of the month. Returns how many entries were removed.
    pub fn clear_month(&mut self, period: Period) -> usize {
        self.years
            .get_mut(&period.year)
            .and_then(|year| year.remove(&period.month))
            .map(|kinds| kinds.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn month_has_entries(&self, period: Period) -> bool {
        CategoryType::ALL
            .iter()
            .any(|kind| !self.bucket(period, *kind).is_empty())
    }

    pub fn entry_count(&self) -> usize {
        self.buckets().map(|(_, _, entries)| entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}
