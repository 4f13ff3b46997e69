//! Pool sizing configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_INITIAL, DEFAULT_MAX_CAPACITY};
use crate::error::PoolError;

/// Sizing parameters for a [`ResourcePool`](crate::pool::ResourcePool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Resources created up front.
    pub initial: usize,
    /// Hard ceiling on resident resources.
    pub max_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial: DEFAULT_INITIAL,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl PoolConfig {
    /// Create a configuration.
    #[must_use]
    pub fn new(initial: usize, max_capacity: usize) -> Self {
        Self {
            initial,
            max_capacity,
        }
    }

    /// Check the construction invariants.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.max_capacity == 0 {
            return Err(PoolError::InvalidConfiguration(
                "max_capacity must be greater than zero".into(),
            ));
        }
        if self.initial > self.max_capacity {
            return Err(PoolError::InvalidConfiguration(format!(
                "initial count {} exceeds max_capacity {}",
                self.initial, self.max_capacity
            )));
        }
        Ok(())
    }
}
