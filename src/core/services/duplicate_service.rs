//! Entry identity rules shared by insertion and bulk cleanup.

use std::{collections::HashSet, fmt};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ledger::{CategoryType, Entry, Ledger, Period};

const REPORT_DETAIL_LIMIT: usize = 5;

/// Key under which the cleanup pass considers two entries the same.
///
/// Recurring entries ignore the date so that one copy per bucket survives;
/// single entries include it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Recurring {
        description: String,
        amount: Decimal,
        category: String,
    },
    Single {
        description: String,
        amount: Decimal,
        category: String,
        entry_date: NaiveDate,
    },
}

impl IdentityKey {
    pub fn of(entry: &Entry) -> Self {
        let description = entry.description.clone();
        let amount = entry.amount.normalize();
        let category = entry.category.clone();
        if entry.recurring {
            IdentityKey::Recurring {
                description,
                amount,
                category,
            }
        } else {
            IdentityKey::Single {
                description,
                amount,
                category,
                entry_date: entry.entry_date,
            }
        }
    }
}

/// Result of a guarded single insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    SkippedDuplicate,
}

/// Buckets visited by [`DuplicateService::dedupe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupeScope {
    All,
    Year(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemovedDuplicate {
    pub period: Period,
    pub kind: CategoryType,
    pub description: String,
    pub amount: Decimal,
}

impl fmt::Display for RemovedDuplicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: {} ({:.2})",
            self.period,
            self.kind.label(),
            self.description,
            self.amount
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupeReport {
    pub removed: usize,
    pub details: Vec<RemovedDuplicate>,
    pub persist_warning: Option<String>,
}

impl fmt::Display for DedupeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.removed == 0 {
            return f.write_str("No duplicates found");
        }
        write!(f, "Removed {} duplicate(s)", self.removed)?;
        for detail in self.details.iter().take(REPORT_DETAIL_LIMIT) {
            write!(f, "\n{detail}")?;
        }
        if self.details.len() > REPORT_DETAIL_LIMIT {
            write!(f, "\n... and {} more", self.details.len() - REPORT_DETAIL_LIMIT)?;
        }
        Ok(())
    }
}

pub struct DuplicateService;

impl DuplicateService {
    /// Whether inserting `candidate` next to `existing` would create a duplicate.
    ///
    /// A recurring candidate clashes with a recurring entry carrying the same
    /// description, amount and category on a *different* date; an identical
    /// date is not treated as a clash. A single candidate clashes only with a
    /// single entry equal on every field including the date.
    pub fn is_duplicate(existing: &Entry, candidate: &Entry) -> bool {
        let same_fields = existing.description == candidate.description
            && existing.amount == candidate.amount
            && existing.category == candidate.category;
        if !same_fields {
            return false;
        }
        if candidate.recurring {
            existing.recurring && existing.entry_date != candidate.entry_date
        } else {
            !existing.recurring && existing.entry_date == candidate.entry_date
        }
    }

    pub fn find_duplicate<'a>(bucket: &'a [Entry], candidate: &Entry) -> Option<&'a Entry> {
        bucket
            .iter()
            .find(|existing| Self::is_duplicate(existing, candidate))
    }

    /// Appends `entry` to its bucket unless it duplicates something already there.
    pub fn insert_unique(
        ledger: &mut Ledger,
        period: Period,
        kind: CategoryType,
        entry: Entry,
    ) -> InsertOutcome {
        let bucket = ledger.bucket_mut(period, kind);
        if let Some(existing) = Self::find_duplicate(bucket, &entry) {
            tracing::warn!(
                %period,
                %kind,
                description = %entry.description,
                amount = %entry.amount,
                existing_date = %existing.entry_date,
                candidate_date = %entry.entry_date,
                "skipping duplicate entry"
            );
            return InsertOutcome::SkippedDuplicate;
        }
        tracing::debug!(%period, %kind, description = %entry.description, "inserting entry");
        bucket.push(entry);
        InsertOutcome::Inserted
    }

    /// Rebuilds every bucket in scope keeping the first entry per [`IdentityKey`].
    pub fn dedupe(ledger: &mut Ledger, scope: DedupeScope) -> DedupeReport {
        let year = match scope {
            DedupeScope::All => None,
            DedupeScope::Year(year) => Some(year),
        };
        let mut report = DedupeReport::default();
        for (period, kind, bucket) in ledger.buckets_mut(year) {
            let mut seen = HashSet::new();
            let before = std::mem::take(bucket);
            for entry in before {
                if seen.insert(IdentityKey::of(&entry)) {
                    bucket.push(entry);
                } else {
                    tracing::info!(%period, %kind, description = %entry.description, "removing duplicate");
                    report.details.push(RemovedDuplicate {
                        period,
                        kind,
                        description: entry.description,
                        amount: entry.amount,
                    });
                }
            }
        }
        report.removed = report.details.len();
        report
    }
}
