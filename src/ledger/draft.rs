//! Submitted field values, before they become ledger entries.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::entry::{CategoryType, Entry, EntryStatus};
use crate::{config::Config, core::time::Clock, errors::ValidationError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Typed field set for a new or edited entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub kind: CategoryType,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub entry_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: EntryStatus,
    pub recurring: bool,
    pub recurrence_count: Option<u32>,
}

impl EntryDraft {
    pub fn new(
        kind: CategoryType,
        description: impl Into<String>,
        amount: Decimal,
        entry_date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            amount,
            category: String::new(),
            entry_date: Some(entry_date),
            due_date: None,
            status: EntryStatus::Paid,
            recurring: false,
            recurrence_count: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn monthly(mut self, count: u32) -> Self {
        self.recurring = true;
        self.recurrence_count = Some(count);
        self
    }

    /// Checks every field rule and returns the entry date on success.
    pub fn validate(&self) -> Result<NaiveDate, ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(ValidationError::InvalidAmount);
        }
        let entry_date = self
            .entry_date
            .ok_or(ValidationError::MissingDate { field: "entry_date" })?;
        if let Some(due) = self.due_date {
            if due < entry_date {
                return Err(ValidationError::DueBeforeEntry);
            }
        }
        Ok(entry_date)
    }

    /// Validates and builds the entry, without a series id.
    pub fn to_entry(&self, config: &Config) -> Result<Entry, ValidationError> {
        let entry_date = self.validate()?;
        let category = match self.category.trim() {
            "" => config.default_category.clone(),
            other => other.to_string(),
        };
        let mut entry = Entry::new(self.description.trim(), self.amount, category, entry_date)
            .with_status(self.status)
            .with_due_date(self.due_date);
        if self.recurring {
            let count = config.recurrence_count(self.recurrence_count);
            if count > config.max_recurrence_count {
                return Err(ValidationError::RecurrenceTooLong {
                    max: config.max_recurrence_count,
                });
            }
            entry = entry.with_recurrence(count, None);
        }
        Ok(entry)
    }
}

/// Whether a blank entry date may default to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPurpose {
    Create,
    Edit,
}

/// Raw values as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    pub kind: Option<CategoryType>,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub entry_date: String,
    pub due_date: String,
    pub status: String,
    pub recurring: bool,
    pub recurrence_count: String,
}

impl EntryForm {
    pub fn into_draft(
        self,
        purpose: FormPurpose,
        clock: &dyn Clock,
    ) -> Result<EntryDraft, ValidationError> {
        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let amount = parse_amount(&self.amount)?;
        let entry_date = match (parse_date(&self.entry_date, "entry_date")?, purpose) {
            (Some(date), _) => date,
            (None, FormPurpose::Create) => clock.today(),
            (None, FormPurpose::Edit) => {
                return Err(ValidationError::MissingDate { field: "entry_date" })
            }
        };
        let due_date = parse_date(&self.due_date, "due_date")?;
        let recurrence_count = if self.recurring {
            self.recurrence_count.trim().parse::<u32>().ok()
        } else {
            None
        };

        let draft = EntryDraft {
            kind: self.kind.unwrap_or(CategoryType::Income),
            description,
            amount,
            category: self.category.trim().to_string(),
            entry_date: Some(entry_date),
            due_date,
            status: EntryStatus::parse(&self.status).unwrap_or_default(),
            recurring: self.recurring,
            recurrence_count,
        };
        draft.validate()?;
        Ok(draft)
    }
}

fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let amount = Decimal::from_str(raw.trim()).map_err(|_| ValidationError::InvalidAmount)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::InvalidAmount);
    }
    Ok(amount)
}

fn parse_date(raw: &str, field: &'static str) -> Result<Option<NaiveDate>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate { field })
}
