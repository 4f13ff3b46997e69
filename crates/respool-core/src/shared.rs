//! Internally synchronized pool with blocking acquire.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::constants::WAIT_SLICE;
use crate::error::{PoolError, Rejected};
use crate::handle::Pooled;
use crate::lifecycle::Lifecycle;
use crate::pool::{PoolSnapshot, ReleaseOutcome, ResourcePool};
use crate::stats::PoolStats;

/// A [`ResourcePool`] guarded by a single lock, shareable across threads.
///
/// Every operation locks the pool for its full duration, so lifecycle
/// callbacks run while the lock is held. Exhausted acquires can block until
/// a release or clear frees capacity.
///
/// `SharedPool` is `Send + Sync` when the resource and lifecycle are `Send`.
pub struct SharedPool<T, L: Lifecycle<T>> {
    pool: Mutex<ResourcePool<T, L>>,
    available: Condvar,
    max_capacity: usize,
}

impl<T, L: Lifecycle<T>> SharedPool<T, L> {
    /// Wrap an existing pool.
    #[must_use]
    pub fn new(pool: ResourcePool<T, L>) -> Self {
        let max_capacity = pool.max_capacity();
        Self {
            pool: Mutex::new(pool),
            available: Condvar::new(),
            max_capacity,
        }
    }

    /// Non-blocking acquire with the same semantics as [`ResourcePool::acquire`].
    pub fn acquire(&self) -> Result<Pooled<T>, PoolError> {
        self.pool.lock().acquire()
    }

    /// Acquire, waiting while the pool is exhausted.
    ///
    /// Gives up with `Timeout` once `timeout` has elapsed (`None` waits
    /// indefinitely) and with `Cancelled` once `cancel` is triggered. The
    /// token is re-checked at least every [`WAIT_SLICE`]. A timeout too large
    /// to form a deadline waits like `None`.
    pub fn acquire_timeout(
        &self,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Result<Pooled<T>, PoolError> {
        let deadline = timeout.and_then(|limit| Instant::now().checked_add(limit));
        let mut pool = self.pool.lock();
        let mut waited = false;

        loop {
            cancel.check_cancelled()?;
            if !pool.is_exhausted() {
                return pool.acquire();
            }

            if !waited {
                pool.stats_recorder().record_waited();
                waited = true;
            }

            let slice = match (deadline, timeout) {
                (Some(deadline), Some(limit)) => {
                    let now = Instant::now();
                    if now >= deadline {
                        pool.stats_recorder().record_timed_out();
                        debug!(pool = pool.id(), ?limit, "Acquire timed out");
                        return Err(PoolError::Timeout(limit));
                    }
                    (deadline - now).min(WAIT_SLICE)
                }
                _ => WAIT_SLICE,
            };
            self.available.wait_for(&mut pool, slice);
        }
    }

    /// Return a resource and wake one waiter.
    pub fn release(&self, pooled: Pooled<T>) -> Result<ReleaseOutcome, Rejected<T>> {
        let outcome = self.pool.lock().release(pooled)?;
        self.available.notify_one();
        Ok(outcome)
    }

    /// Destroy every idle resource and wake all waiters.
    pub fn clear(&self) -> usize {
        let destroyed = self.pool.lock().clear();
        self.available.notify_all();
        destroyed
    }

    /// Pre-create idle resources, see [`ResourcePool::warm`].
    pub fn warm(&self, target: usize) -> Result<usize, PoolError> {
        let created = self.pool.lock().warm(target)?;
        if created > 0 {
            self.available.notify_all();
        }
        Ok(created)
    }

    /// Resident resources, idle and active.
    #[must_use]
    pub fn count_all(&self) -> usize {
        self.pool.lock().count_all()
    }

    /// Resources currently held by callers.
    #[must_use]
    pub fn count_active(&self) -> usize {
        self.pool.lock().count_active()
    }

    /// Resources waiting in the idle set.
    #[must_use]
    pub fn count_inactive(&self) -> usize {
        self.pool.lock().count_inactive()
    }

    /// All counters read under one lock.
    #[must_use]
    pub fn snapshot(&self) -> PoolSnapshot {
        self.pool.lock().snapshot()
    }

    /// Hard ceiling on resident resources.
    #[must_use]
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Get a snapshot of pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.pool.lock().stats()
    }

    /// Reset pool statistics counters.
    pub fn reset_stats(&self) {
        self.pool.lock().reset_stats();
    }

    /// Unwrap the inner pool.
    pub fn into_inner(self) -> ResourcePool<T, L> {
        self.pool.into_inner()
    }
}

impl<T, L: Lifecycle<T>> From<ResourcePool<T, L>> for SharedPool<T, L> {
    fn from(pool: ResourcePool<T, L>) -> Self {
        Self::new(pool)
    }
}

impl<T, L: Lifecycle<T>> fmt::Debug for SharedPool<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedPool")
            .field("pool", &*self.pool.lock())
            .finish()
    }
}
