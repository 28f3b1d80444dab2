// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while collecting or exporting file history.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("invalid commit timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("git output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type HistoryResult<T> = Result<T, HistoryError>;
