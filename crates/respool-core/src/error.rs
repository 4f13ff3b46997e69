//! Error types for pool operations.

use std::fmt;
use std::time::Duration;

use crate::handle::Pooled;

/// Failure reported by a lifecycle hook.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    /// Create a hook error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message the hook reported.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Error type for pool operations.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Construction parameters violate the pool invariants.
    #[error("invalid pool configuration: {0}")]
    InvalidConfiguration(String),

    /// Every resource the pool may hold is currently active.
    #[error("pool exhausted: all {capacity} resources are active")]
    PoolExhausted {
        /// Capacity of the exhausted pool.
        capacity: usize,
    },

    /// The released resource was not handed out by this pool.
    #[error("resource does not belong to this pool")]
    InvalidResource,

    /// A lifecycle hook failed and the operation was rolled back.
    #[error("lifecycle hook failed: {0}")]
    Hook(#[from] HookError),

    /// A blocking acquire gave up waiting.
    #[error("timed out after {0:?} waiting for a resource")]
    Timeout(Duration),

    /// A blocking acquire was cancelled.
    #[error("acquire cancelled")]
    Cancelled,
}

impl PoolError {
    /// Whether this error is pool backpressure rather than a fault.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::PoolExhausted { .. })
    }
}

/// A refused release. The handle is given back so the caller still owns it.
pub struct Rejected<T> {
    resource: Pooled<T>,
    error: PoolError,
}

impl<T> Rejected<T> {
    pub(crate) fn new(resource: Pooled<T>, error: PoolError) -> Self {
        Self { resource, error }
    }

    /// Why the release was refused.
    #[must_use]
    pub fn error(&self) -> &PoolError {
        &self.error
    }

    /// Take back the still-active resource.
    pub fn into_resource(self) -> Pooled<T> {
        self.resource
    }

    /// Split into the resource and the cause.
    pub fn into_parts(self) -> (Pooled<T>, PoolError) {
        (self.resource, self.error)
    }
}

impl<T> fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("pool_id", &self.resource.pool_id())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "release rejected: {}", self.error)
    }
}

impl<T> std::error::Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
