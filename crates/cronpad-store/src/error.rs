//! Error types for the cronpad-store crate.

use cronpad_core::CronpadError;
use thiserror::Error;

/// All errors that can originate from backing-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Listing the table failed for a reason other than "no table yet".
    #[error("Failed to list table ({status}): {output}")]
    ListFailed { status: String, output: String },

    /// The replace operation was rejected. The table is unchanged.
    #[error("Failed to install table ({status}): {output}")]
    InstallFailed { status: String, output: String },

    /// The transient replacement file could not be created or written.
    #[error("Transient file error: {0}")]
    TempFile(#[source] std::io::Error),

    /// The store program could not be started at all.
    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The store program exceeded its time budget and was killed.
    #[error("Store command timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The listed table is not valid UTF-8. Nothing is saved over it.
    #[error("Table is not valid UTF-8 (first bad byte at offset {offset})")]
    Encoding { offset: usize },

    /// Underlying I/O failure while talking to the child process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for CronpadError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout { ms } => CronpadError::Timeout { ms },
            other => CronpadError::Store(other.to_string()),
        }
    }
}
