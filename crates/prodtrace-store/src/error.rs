//! Record store error types.
//!
//! Every variant names the file involved so the CLI can print a message the
//! operator can act on.

use std::path::PathBuf;

use thiserror::Error;

/// Record store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O error.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file is not valid JSON of the expected shape.
    #[error("invalid record store {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Temp file written but could not replace the store.
    #[error("failed to replace {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another writer holds the store lock.
    #[error("record store is locked: {path}")]
    Locked { path: PathBuf },

    #[error("audit record {uid} already exists")]
    DuplicateAudit { uid: String },

    #[error("audit record {uid} not found")]
    UnknownAudit { uid: String },

    /// Refused to store a record whose positional arrays disagree.
    #[error("audit record {uid}: `{field}` has {actual} entries, expected {expected}")]
    Misaligned {
        uid: String,
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl StoreError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::Json { path, source } => format!(
                "The record store at {} could not be read ({}). The file may be corrupted.",
                path.display(),
                source
            ),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the record store to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::Locked { path } => format!(
                "Another process is writing the record store (lock file {}). \
                 Wait for it to finish and try again.",
                path.display()
            ),
            Self::DuplicateAudit { uid } => format!(
                "An audit record with id {uid} already exists; the run was already confirmed on that date."
            ),
            Self::UnknownAudit { uid } => format!("No audit record with id {uid} exists."),
            Self::Misaligned {
                uid,
                field,
                expected,
                actual,
            } => format!(
                "Audit record {uid} was not saved: `{field}` has {actual} entries but the record lists {expected} ingredients."
            ),
        }
    }
}

/// Result type alias for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_names_the_lock_file() {
        let err = StoreError::Locked {
            path: PathBuf::from("/data/db.json.lock"),
        };
        assert!(err.user_message().contains("/data/db.json.lock"));
    }
}
