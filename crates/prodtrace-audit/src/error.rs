//! Error types for audit derivation.

use thiserror::Error;

use prodtrace_model::{Misalignment, ModelError};

/// Errors that prevent an audit record from being produced or repaired.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuditError {
    /// A positional array does not line up with the ingredient list.
    ///
    /// A misaligned record is a compliance defect and must never be stored.
    #[error("`{field}` has {actual} entries but there are {expected} ingredients")]
    Misaligned {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    InvalidScheduleId(#[from] ModelError),

    #[error("schedule {schedule} is for recipe {actual:?}, not {expected:?}")]
    RecipeMismatch {
        schedule: String,
        expected: String,
        actual: String,
    },

    #[error("recipe {0:?} not found")]
    UnknownRecipe(String),

    /// The stored record could not be parsed.
    #[error("unreadable record: {0}")]
    Unreadable(String),
}

impl From<Misalignment> for AuditError {
    fn from(value: Misalignment) -> Self {
        Self::Misaligned {
            field: value.field,
            expected: value.expected,
            actual: value.actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
