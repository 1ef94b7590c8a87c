use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq)]
pub enum LedgerError {
    /// Decimal input could not be turned into minor units
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Interval name outside the closed set
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// Calendar arithmetic left the representable instant range
    #[error("Instant out of range")]
    InstantOutOfRange,

    /// An atomic write lost a race against a concurrent writer
    #[error("Persistence conflict: {0}")]
    PersistenceConflict(String),

    /// Cost split cannot be applied to the given participant set
    #[error("Inconsistent participants: {0}")]
    InconsistentParticipants(String),

    /// Replayed balances do not sum to the replayed ledger total
    #[error("Conservation violated: expected {expected} minor units, got {actual}")]
    ConservationViolated { expected: i64, actual: i64 },

    #[error("Group {0} not found")]
    GroupNotFound(String),

    #[error("Recurring payment {0} not found")]
    RecurringPaymentNotFound(String),

    #[error("User {0} is not a group member")]
    NotGroupMember(String),

    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    #[error("Unauthorized")]
    Unauthorized,

    /// The store refused a write that would leave its records inconsistent
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl LedgerError {
    pub fn invalid_input(field: &str, title: &str, description: impl Into<String>) -> Self {
        LedgerError::InvalidInput(
            field.to_string(),
            FieldError {
                field: field.to_string(),
                title: title.to_string(),
                description: description.into(),
            },
        )
    }
}
