//! Error type for simulation runs.

use respool_core::PoolError;

/// Error type for simulation runs.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A pool operation failed.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Scenario parameters are unusable.
    #[error("scenario error: {0}")]
    Config(String),

    /// Pool accounting went wrong during the run.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Reading or writing a scenario file failed.
    #[error("scenario file error: {0}")]
    Io(#[from] std::io::Error),

    /// A scenario file is not valid JSON for the expected shape.
    #[error("scenario format error: {0}")]
    Json(#[from] serde_json::Error),
}
