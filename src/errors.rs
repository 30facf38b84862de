use thiserror::Error;

/// Failures raised by the persistence layer.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Rejected submission. Raised before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("description is required")]
    EmptyDescription,
    #[error("amount must be a number greater than or equal to zero")]
    InvalidAmount,
    #[error("{field} is required")]
    MissingDate { field: &'static str },
    #[error("{field} is not a valid date")]
    InvalidDate { field: &'static str },
    #[error("due date cannot be earlier than the entry date")]
    DueBeforeEntry,
    #[error("recurrence count cannot exceed {max} months")]
    RecurrenceTooLong { max: u32 },
}

impl ValidationError {
    /// Name of the offending form field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyDescription => "description",
            ValidationError::InvalidAmount => "amount",
            ValidationError::MissingDate { field } | ValidationError::InvalidDate { field } => {
                field
            }
            ValidationError::DueBeforeEntry => "due_date",
            ValidationError::RecurrenceTooLong { .. } => "recurrence_count",
        }
    }
}
