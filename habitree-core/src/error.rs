//! Error types for habitree-core

use thiserror::Error;

/// Main error type for the habitree-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A string that is not a `YYYY-MM-DD` calendar date
    #[error("invalid day key: {0:?}")]
    InvalidDayKey(String),

    /// Habit not found
    #[error("habit not found: {0}")]
    HabitNotFound(u64),

    /// Task not found
    #[error("task not found: {0}")]
    TaskNotFound(u64),

    /// Journal entry not found
    #[error("journal entry not found: {0}")]
    EntryNotFound(u64),
}

/// Result type alias for habitree-core
pub type Result<T> = std::result::Result<T, Error>;
