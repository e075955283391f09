//! Error types for supplier ingestion.

use std::path::PathBuf;
use thiserror::Error;

use prodtrace_model::ModelError;

/// Errors that can occur while reading supplier exports.
///
/// The public loaders degrade these to an empty load plus a warning; the
/// variants surface through [`crate::read_supplier_csv`] and file discovery.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Content Errors ===
    /// File name does not yield a department code.
    #[error("cannot derive a department from {path}: {source}")]
    Department {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
