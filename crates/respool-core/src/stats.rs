//! Atomic pool statistics for lock-free usage tracking.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Statistics for pool usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Resources produced by `create` (warm-up and growth).
    pub created: u64,
    /// Acquires served from the idle set.
    pub reused: u64,
    /// Releases that returned the resource to the idle set.
    pub kept: u64,
    /// Releases that destroyed the resource because the pool was full.
    pub evicted: u64,
    /// Resources passed to `on_destroy` for any reason.
    pub destroyed: u64,
    /// Acquires refused with `PoolExhausted`.
    pub exhausted: u64,
    /// Blocking acquires that had to wait at least once.
    pub waited: u64,
    /// Blocking acquires that gave up on timeout.
    pub timed_out: u64,
}

impl PoolStats {
    /// Fraction of acquires served without calling `create`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn reuse_ratio(&self) -> f64 {
        let served = self.reused + self.created;
        if served == 0 {
            0.0
        } else {
            self.reused as f64 / served as f64
        }
    }
}

/// Atomic pool statistics for lock-free updates.
#[derive(Debug, Default)]
pub struct AtomicPoolStats {
    created: AtomicU64,
    reused: AtomicU64,
    kept: AtomicU64,
    evicted: AtomicU64,
    destroyed: AtomicU64,
    exhausted: AtomicU64,
    waited: AtomicU64,
    timed_out: AtomicU64,
}

impl AtomicPoolStats {
    /// Create new zeroed stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a snapshot of current stats.
    pub fn snapshot(&self) -> PoolStats {
        PoolStats {
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            kept: self.kept.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            destroyed: self.destroyed.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            waited: self.waited.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        for counter in [
            &self.created,
            &self.reused,
            &self.kept,
            &self.evicted,
            &self.destroyed,
            &self.exhausted,
            &self.waited,
            &self.timed_out,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Increment created counter.
    pub fn record_created(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment reused counter.
    pub fn record_reused(&self) {
        self.reused.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment kept counter.
    pub fn record_kept(&self) {
        self.kept.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment evicted and destroyed counters.
    pub fn record_eviction(&self) {
        self.evicted.fetch_add(1, Ordering::Relaxed);
        self.destroyed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment destroyed counter.
    pub fn record_destroyed(&self) {
        self.destroyed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment exhausted counter.
    pub fn record_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment waited counter.
    pub fn record_waited(&self) {
        self.waited.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment timed-out counter.
    pub fn record_timed_out(&self) {
        self.timed_out.fetch_add(1, Ordering::Relaxed);
    }
}
