//! Error type for task-list operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    /// A task name was empty after trimming.
    #[error("task name must not be empty")]
    EmptyName,

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid time '{0}': expected HH:MM")]
    InvalidTime(String),

    #[error("unknown filter '{0}': expected all, active, completed or important")]
    UnknownFilter(String),

    #[error("unknown section '{0}'")]
    UnknownSection(String),

    /// The persistence store could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Only raised while encoding; decoding failures fall back to empty state.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TaskError>;
