//! Error types for lsipclib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an IPC report.
///
/// Per-object lookups that find nothing are not errors; they surface as
/// warnings on the [`Report`](crate::Report) instead.
#[derive(Error, Debug)]
pub enum IpcError {
    /// Column name not present in the catalog
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Resource-specific column requested for another resource
    #[error("column {0} does not apply to the specified IPC")]
    ColumnNotApplicable(String),

    /// More columns requested than the selection can hold
    #[error("too many columns specified, the limit is {limit} columns")]
    TooManyColumns { limit: usize },

    /// `--output` given an empty list
    #[error("no columns specified")]
    EmptyColumnList,

    /// Unknown `--time-format` value
    #[error("unknown time format: {0}")]
    UnknownTimeFormat(String),

    /// None of shm/msg/sem selected outside of global mode
    #[error("One of --shmems, --queues or --semaphores must be specified")]
    NoResourceSelected,

    /// Failed to read a procfs file
    #[error("failed to read '{path}': {source}")]
    ProcRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A procfs file did not have the expected shape
    #[error("cannot parse '{path}' line {line}: {message}")]
    ProcParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
