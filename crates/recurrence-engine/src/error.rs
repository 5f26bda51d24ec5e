//! Error types for recurrence-engine operations.
//!
//! Generation itself never fails; only parsing and interop do.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unsupported recurrence: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, RecurrenceError>;
