use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for parsing, ingestion and consolidation.
///
/// Only conditions that make an operation impossible are errors. Malformed
/// rows, unknown columns and unmapped fields are reported as
/// [`Warning`](crate::Warning)s instead.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid JSON options.
    #[error("Invalid options: {0}")]
    Json(#[from] serde_json::Error),

    /// The file has no non-blank lines.
    #[error("File '{name}' is empty")]
    EmptyInput { name: String },

    /// Consolidation was called without any file.
    #[error("No files to consolidate")]
    NoFiles,

    /// The file does not look like CSV text.
    #[error("File '{name}' is not a CSV file")]
    NotCsv { name: String },

    /// The file exceeds the configured size limit.
    #[error("File '{name}' is too large ({size} bytes, limit {limit} bytes)")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    /// More files were supplied than the configured limit allows.
    #[error("Too many files: {count} supplied, at most {limit} allowed")]
    TooManyFiles { count: usize, limit: usize },

    /// Every supplied file failed to load.
    #[error("None of the supplied files could be loaded")]
    NoUsableFiles,

    /// An export target could not be prepared.
    #[error("Invalid export target: {0}")]
    InvalidExport(PathBuf),
}

/// Result type alias for consolidation operations.
pub type Result<T> = std::result::Result<T, Error>;
