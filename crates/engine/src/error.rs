//! The module contains the errors the engine can throw.
//!
//! Data-quality problems inside a single record are **not** errors: the
//! summary fold reports them as [`Diagnostic`]s and keeps going. The variants
//! below are raised only at the ledger boundary or on contract violations:
//!
//! - [`InvalidAmount`] thrown when a money string cannot be parsed.
//! - [`InvalidTimestamp`] thrown when a timestamp has no lossless UTC instant.
//! - [`InvalidRecord`] thrown when a store document misses a required field.
//! - [`NotASequence`] thrown when a ledger export is not a list of documents.
//!
//!  [`Diagnostic`]: crate::Diagnostic
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidTimestamp`]: EngineError::InvalidTimestamp
//!  [`InvalidRecord`]: EngineError::InvalidRecord
//!  [`NotASequence`]: EngineError::NotASequence
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Expected a sequence of transactions, got {0}")]
    NotASequence(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidTimestamp(a), Self::InvalidTimestamp(b)) => a == b,
            (Self::InvalidRecord(a), Self::InvalidRecord(b)) => a == b,
            (Self::NotASequence(a), Self::NotASequence(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
