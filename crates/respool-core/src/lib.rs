//! # respool-core
//!
//! Bounded pools of expensive-to-create resources.
//!
//! A [`ResourcePool`] hands out pre-constructed objects, reclaims them on
//! release, and destroys them once the idle set is full. Consumers supply
//! four lifecycle callbacks (create, acquire, release, destroy) and two
//! sizes (initial count and maximum capacity). [`SharedPool`] wraps a pool in
//! a lock and adds blocking acquire with timeout and cancellation.
#![warn(missing_docs)]

pub mod cancel;
pub mod config;
pub mod constants;
pub mod error;
pub mod handle;
pub mod lifecycle;
pub mod pool;
pub mod shared;
pub mod stats;

pub use cancel::CancellationToken;
pub use config::PoolConfig;
pub use error::{HookError, PoolError, Rejected};
pub use handle::Pooled;
pub use lifecycle::{Hooks, Lifecycle};
pub use pool::{PoolSnapshot, ReleaseOutcome, ResourcePool};
pub use shared::SharedPool;
pub use stats::{AtomicPoolStats, PoolStats};
