use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bucket an entry is filed under inside a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    Income,
    #[serde(rename = "fixed_expenses")]
    FixedExpense,
    #[serde(rename = "variable_expenses")]
    VariableExpense,
}

impl CategoryType {
    pub const ALL: [CategoryType; 3] = [
        CategoryType::Income,
        CategoryType::FixedExpense,
        CategoryType::VariableExpense,
    ];

    /// Key used for this bucket in the persisted document.
    pub fn storage_key(self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::FixedExpense => "fixed_expenses",
            CategoryType::VariableExpense => "variable_expenses",
        }
    }

    pub fn from_storage_key(key: &str) -> Option<CategoryType> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.storage_key() == key.trim())
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryType::Income => "Income",
            CategoryType::FixedExpense => "Fixed expenses",
            CategoryType::VariableExpense => "Variable expenses",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Paid,
    Pending,
}

impl EntryStatus {
    pub fn parse(value: &str) -> Option<EntryStatus> {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => Some(EntryStatus::Paid),
            "pending" => Some(EntryStatus::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::Paid => f.write_str("paid"),
            EntryStatus::Pending => f.write_str("pending"),
        }
    }
}

/// One ledger line stored in a (year, month, category type) bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub entry_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: EntryStatus,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_count: Option<u32>,
    /// Shared by every occurrence generated from one recurrence request.
    /// Absent on single entries and on data written before series ids existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<Uuid>,
}

impl Entry {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        entry_date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            entry_date,
            due_date: None,
            status: EntryStatus::Paid,
            recurring: false,
            recurrence_count: None,
            series_id: None,
        }
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Marks the entry as part of a monthly series.
    pub fn with_recurrence(mut self, count: u32, series_id: Option<Uuid>) -> Self {
        self.recurring = true;
        self.recurrence_count = Some(count);
        self.series_id = series_id;
        self
    }

    /// Field-tuple series membership: same description, amount and category,
    /// both recurring.
    pub fn shares_fields_with(&self, other: &Entry) -> bool {
        self.recurring
            && other.recurring
            && self.description == other.description
            && self.amount == other.amount
            && self.category == other.category
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == EntryStatus::Pending && self.due_date.is_some_and(|due| due < today)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.description, self.amount)
    }
}
