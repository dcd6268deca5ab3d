//! Profiler and utility error types.

use thiserror::Error;

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, KeyprofError>;

/// Errors raised while loading records or running collection utilities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeyprofError {
    /// I/O error while reading or writing a file
    #[error("I/O error: {0}")]
    Io(String),

    /// Input line is not valid JSON
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Input line is valid JSON but not an object
    #[error("Line {line} is not a JSON object")]
    NotARecord { line: usize },

    /// Field is present but does not hold a sequence
    #[error("Field '{field}' is not an array")]
    NotASequence { field: String },

    /// Malformed dotted field path
    #[error("Invalid field path: '{0}'")]
    InvalidPath(String),

    /// No record with the given `_id`
    #[error("Record not found: _id={0}")]
    RecordNotFound(String),

    /// Record with the same `_id` already exists
    #[error("Duplicate _id: {0}")]
    DuplicateId(String),

    /// Configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<std::io::Error> for KeyprofError {
    fn from(err: std::io::Error) -> Self {
        KeyprofError::Io(err.to_string())
    }
}
