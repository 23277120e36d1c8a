//! Error types for medstock-store.

use std::path::PathBuf;

/// Result type for medstock-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in medstock-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No record carries the requested batch number.
    #[error("Batch not found: {0}")]
    BatchNotFound(String),

    /// Restocking would push the batch quantity past `i64::MAX`.
    #[error("Restocking {batch} by {added} would overflow its quantity")]
    QuantityOverflow { batch: String, added: i64 },

    /// Failed to read the inventory file.
    #[error("Failed to read inventory {path}: {source}")]
    ReadInventory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the inventory file.
    #[error("Failed to write inventory {path}: {source}")]
    WriteInventory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create a data directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read or copy the history file.
    #[error("History file {path}: {source}")]
    History {
        path: PathBuf,
        source: std::io::Error,
    },

    /// There is no history to read or copy.
    #[error("No history found at {0}")]
    NoHistory(PathBuf),

    /// CSV encoding or decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The import file does not start with the expected header.
    #[error("Invalid CSV header; expected: {expected}")]
    InvalidHeader { expected: String },

    /// A data row of the import file failed validation.
    #[error("Invalid data at row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    /// The import file has a header but no rows.
    #[error("CSV file contains no medicines")]
    EmptyImport,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error only signals a missing batch.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::BatchNotFound(_))
    }
}
