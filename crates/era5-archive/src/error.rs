//! Error types for archive access.

use thiserror::Error;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors that can occur while reading a reanalysis archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to open the archive file
    #[error("failed to open archive {path}: {reason}")]
    OpenFailed { path: String, reason: String },

    /// The named variable is absent from the archive
    #[error("variable {0} does not exist in the archive")]
    VariableNotFound(String),

    /// The variable exists but has no data at the requested time index
    #[error("variable {variable} has no data at time index {index} ({available} steps available)")]
    TimeIndexUnavailable {
        variable: String,
        index: usize,
        available: usize,
    },

    /// Missing required coordinate variable or attribute
    #[error("missing required data: {0}")]
    MissingData(String),

    /// A layer read failed at the storage level
    #[error("failed to read {variable}: {reason}")]
    ReadFailed { variable: String, reason: String },

    /// Malformed metadata (time units, calendar, coordinate axes)
    #[error("invalid archive format: {0}")]
    InvalidFormat(String),
}
