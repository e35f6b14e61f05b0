//! Error types for the data-loader crate.
//!
//! Missing dataset files are not errors (they load as empty tables), so
//! everything here describes a file that exists but cannot be trusted.

use thiserror::Error;

/// Errors that can occur while loading and validating the tourism snapshots.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected the file (bad quoting, ragged rows, ...)
    #[error("CSV error in {file}: {source}")]
    CsvError {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A row could not be converted into its record type
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Event identifiers must be unique across the events table
    #[error("Duplicate event id {id}")]
    DuplicateEventId { id: u32 },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
