use thiserror::Error;

/// Errors from the runner itself, as opposed to case failures.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("invalid case filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("no cases match filter {0:?}")]
    NoCasesMatched(String),

    #[error("jobs must be at least 1")]
    InvalidJobs,

    #[error("platform already fixed to {fixed:?}, cannot switch to {requested:?}")]
    PlatformConflict { fixed: String, requested: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
