use thiserror::Error;

use crate::schedule::ScheduleStatus;

/// Errors raised while constructing or mutating model values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid department code: {0:?}")]
    InvalidDepartment(String),

    #[error("invalid schedule id {id:?}: {reason}")]
    InvalidScheduleId { id: String, reason: String },

    #[error("cannot move schedule from {from} to {to}")]
    InvalidTransition {
        from: ScheduleStatus,
        to: ScheduleStatus,
    },

    #[error("quality score {0} is outside 1..=10")]
    InvalidQualityScore(u8),

    #[error("quantity must be a finite, non-negative number (got {0})")]
    InvalidQuantity(f64),
}

pub type Result<T> = std::result::Result<T, ModelError>;
