use thiserror::Error;

use crate::storage::StoreError;

/// Failures surfaced by [Tracker](super::Tracker) operations. After any of them the in-memory
/// records are the same as before the call.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("amount must be a number greater than zero, got {0:?}")]
    InvalidAmount(String),
    #[error("month must look like YYYY-MM, got {0:?}")]
    InvalidMonth(String),
    #[error("failed to import CSV: {0}")]
    Import(#[from] ImportError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A CSV line that couldn't be understood. Any of these aborts the whole import.
#[derive(Debug, Error, PartialEq)]
pub enum ImportError {
    #[error("line {line}: {value:?} is not a YYYY-MM-DD date")]
    InvalidDate { line: usize, value: String },
    #[error("line {line}: {value:?} is not a positive amount")]
    InvalidAmount { line: usize, value: String },
    #[error("line {line}: quoted field is never closed")]
    UnterminatedQuote { line: usize },
}
