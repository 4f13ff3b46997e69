//! Bounded resource pool driven by lifecycle callbacks.
//!
//! `ResourcePool` follows the external-synchronization model: every mutating
//! operation takes `&mut self`. Wrap it in [`SharedPool`](crate::shared::SharedPool)
//! to share it between threads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::PoolConfig;
use crate::error::{PoolError, Rejected};
use crate::handle::{Orphans, Pooled};
use crate::lifecycle::{Hooks, Lifecycle};
use crate::stats::{AtomicPoolStats, PoolStats};

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// What happened to a released resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReleaseOutcome {
    /// Returned to the idle set after `on_release`.
    Kept,
    /// Passed to `on_destroy` because the idle set was full.
    Destroyed,
}

/// Consistent view of the pool counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolSnapshot {
    /// Resident resources, idle and active.
    pub all: usize,
    /// Resources currently held by callers.
    pub active: usize,
    /// Resources waiting in the idle set.
    pub inactive: usize,
    /// Hard ceiling on resident resources.
    pub max_capacity: usize,
}

impl PoolSnapshot {
    /// Whether `inactive <= all <= max_capacity` and `active + inactive == all`.
    #[must_use]
    pub fn holds_invariants(&self) -> bool {
        self.inactive <= self.all
            && self.all <= self.max_capacity
            && self.active + self.inactive == self.all
    }
}

/// A bounded pool of reusable resources.
///
/// Resources are created up front and on demand while fewer than
/// `max_capacity` are resident. Acquire pops the most recently released
/// resource first. Release keeps the resource unless the idle set already
/// holds `max_capacity` resources, in which case it is destroyed.
///
/// ```
/// use respool_core::pool::{ReleaseOutcome, ResourcePool};
///
/// let mut pool = ResourcePool::new(
///     || vec![0u8; 1024],
///     |buf: &mut Vec<u8>| buf.fill(0),
///     |_: &mut Vec<u8>| {},
///     drop,
///     2,
///     3,
/// )?;
///
/// let buf = pool.acquire()?;
/// assert_eq!(pool.count_active(), 1);
/// assert_eq!(pool.release(buf)?, ReleaseOutcome::Kept);
/// assert_eq!(pool.count_inactive(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ResourcePool<T, L: Lifecycle<T>> {
    lifecycle: L,
    idle: Vec<T>,
    total_count: usize,
    max_capacity: usize,
    id: u64,
    epoch: u64,
    orphans: Orphans<T>,
    stats: AtomicPoolStats,
}

impl<T, C, A, R, D> ResourcePool<T, Hooks<C, A, R, D>>
where
    C: FnMut() -> T,
    A: FnMut(&mut T),
    R: FnMut(&mut T),
    D: FnMut(T),
{
    /// Build a pool from four callbacks, creating `initial` resources now.
    pub fn new(
        on_create: C,
        on_acquire: A,
        on_release: R,
        on_destroy: D,
        initial: usize,
        max_capacity: usize,
    ) -> Result<Self, PoolError> {
        Self::with_lifecycle(
            Hooks::new(on_create, on_acquire, on_release, on_destroy),
            PoolConfig::new(initial, max_capacity),
        )
    }
}

impl<T, L: Lifecycle<T>> ResourcePool<T, L> {
    /// Build a pool from any lifecycle, creating `config.initial` resources now.
    ///
    /// If `create` fails during warm-up, the resources created so far are
    /// destroyed and the hook error is returned.
    pub fn with_lifecycle(mut lifecycle: L, config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;

        let stats = AtomicPoolStats::new();
        let mut idle = Vec::with_capacity(config.initial);
        for _ in 0..config.initial {
            match lifecycle.create() {
                Ok(resource) => {
                    stats.record_created();
                    idle.push(resource);
                }
                Err(e) => {
                    warn!(error = %e, created = idle.len(), "create hook failed during warm-up");
                    while let Some(resource) = idle.pop() {
                        lifecycle.on_destroy(resource);
                    }
                    return Err(e.into());
                }
            }
        }

        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        debug!(
            pool = id,
            initial = config.initial,
            max_capacity = config.max_capacity,
            "Pool created"
        );

        Ok(Self {
            lifecycle,
            total_count: idle.len(),
            idle,
            max_capacity: config.max_capacity,
            id,
            epoch: 0,
            orphans: Orphans::default(),
            stats,
        })
    }

    /// Hand out a resource, growing the pool if it is below capacity.
    ///
    /// Fails with `PoolExhausted` when the idle set is empty and
    /// `count_all() == max_capacity()`. A failing `create` or `on_acquire`
    /// leaves the counters as they were.
    pub fn acquire(&mut self) -> Result<Pooled<T>, PoolError> {
        self.reclaim_orphans();
        let (mut resource, fresh) = if let Some(resource) = self.idle.pop() {
            (resource, false)
        } else if self.total_count < self.max_capacity {
            let resource = self.lifecycle.create().map_err(|e| {
                warn!(pool = self.id, error = %e, "create hook failed");
                e
            })?;
            self.stats.record_created();
            (resource, true)
        } else {
            self.stats.record_exhausted();
            debug!(pool = self.id, capacity = self.max_capacity, "Pool exhausted");
            return Err(PoolError::PoolExhausted {
                capacity: self.max_capacity,
            });
        };

        if let Err(e) = self.lifecycle.on_acquire(&mut resource) {
            warn!(pool = self.id, error = %e, fresh, "on_acquire hook failed");
            if fresh {
                self.lifecycle.on_destroy(resource);
                self.stats.record_destroyed();
            } else {
                self.idle.push(resource);
            }
            return Err(e.into());
        }

        if fresh {
            self.total_count += 1;
            debug!(pool = self.id, total = self.total_count, "Pool grew");
        } else {
            self.stats.record_reused();
        }
        trace!(pool = self.id, active = self.count_active(), "Resource acquired");

        Ok(Pooled::new(
            resource,
            self.id,
            self.epoch,
            Arc::clone(&self.orphans),
        ))
    }

    /// Like [`acquire`](Self::acquire), but exhaustion yields `Ok(None)`.
    pub fn try_acquire(&mut self) -> Result<Option<Pooled<T>>, PoolError> {
        match self.acquire() {
            Ok(pooled) => Ok(Some(pooled)),
            Err(PoolError::PoolExhausted { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Return a resource to the pool.
    ///
    /// The resource is destroyed when the idle set already holds
    /// `max_capacity` resources; otherwise `on_release` runs and it becomes
    /// idle again. The overflow check compares the idle set size, not the
    /// resident count.
    ///
    /// A handle from an earlier epoch (active when `clear()` ran) is no
    /// longer counted, so it is adopted back into the count when kept and
    /// destroyed when adopting it would exceed `max_capacity`.
    pub fn release(&mut self, mut pooled: Pooled<T>) -> Result<ReleaseOutcome, Rejected<T>> {
        if pooled.pool_id() != self.id {
            warn!(
                pool = self.id,
                owner = pooled.pool_id(),
                "Rejected release of a foreign resource"
            );
            return Err(Rejected::new(pooled, PoolError::InvalidResource));
        }
        self.reclaim_orphans();

        let counted = pooled.epoch() == self.epoch;
        let full = self.idle.len() >= self.max_capacity
            || (!counted && self.total_count >= self.max_capacity);

        if full {
            self.lifecycle.on_destroy(pooled.into_inner());
            if counted {
                self.total_count -= 1;
            }
            self.stats.record_eviction();
            debug!(
                pool = self.id,
                idle = self.idle.len(),
                total = self.total_count,
                "Released resource destroyed, pool full"
            );
            return Ok(ReleaseOutcome::Destroyed);
        }

        if let Err(e) = self.lifecycle.on_release(&mut pooled) {
            warn!(pool = self.id, error = %e, "on_release hook failed");
            return Err(Rejected::new(pooled, e.into()));
        }

        self.idle.push(pooled.into_inner());
        if !counted {
            self.total_count += 1;
            debug!(pool = self.id, total = self.total_count, "Adopted resource from before clear");
        }
        self.stats.record_kept();
        trace!(pool = self.id, idle = self.idle.len(), "Resource released");

        Ok(ReleaseOutcome::Kept)
    }

    /// Destroy every idle resource and reset the resident count to zero.
    ///
    /// Active resources stay valid with their holders. Returns the number of
    /// resources destroyed.
    pub fn clear(&mut self) -> usize {
        self.reclaim_orphans();
        let destroyed = self.idle.len();
        while let Some(resource) = self.idle.pop() {
            self.lifecycle.on_destroy(resource);
            self.stats.record_destroyed();
        }
        let outstanding = self.total_count - destroyed;
        self.total_count = 0;
        self.epoch += 1;
        debug!(pool = self.id, destroyed, outstanding, epoch = self.epoch, "Pool cleared");
        destroyed
    }

    /// Create idle resources until `count_inactive() >= target` or the pool
    /// reaches capacity. Returns how many were created.
    pub fn warm(&mut self, target: usize) -> Result<usize, PoolError> {
        self.reclaim_orphans();
        let mut created = 0;
        while self.idle.len() < target && self.total_count < self.max_capacity {
            let resource = self.lifecycle.create().map_err(|e| {
                warn!(pool = self.id, error = %e, created, "create hook failed while warming");
                e
            })?;
            self.stats.record_created();
            self.idle.push(resource);
            self.total_count += 1;
            created += 1;
        }
        if created > 0 {
            debug!(pool = self.id, created, total = self.total_count, "Pool warmed");
        }
        Ok(created)
    }

    /// Resident resources, idle and active.
    #[must_use]
    pub fn count_all(&self) -> usize {
        self.total_count - self.pending_orphans()
    }

    /// Resources currently held by callers.
    #[must_use]
    pub fn count_active(&self) -> usize {
        self.count_all() - self.idle.len()
    }

    /// Resources waiting in the idle set.
    #[must_use]
    pub fn count_inactive(&self) -> usize {
        self.idle.len()
    }

    /// Hard ceiling on resident resources.
    #[must_use]
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Process-unique id carried by every handle from this pool.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether an acquire would fail with `PoolExhausted`.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.idle.is_empty() && self.count_all() >= self.max_capacity
    }

    /// All counters read together.
    #[must_use]
    pub fn snapshot(&self) -> PoolSnapshot {
        let all = self.count_all();
        PoolSnapshot {
            all,
            active: all - self.idle.len(),
            inactive: self.idle.len(),
            max_capacity: self.max_capacity,
        }
    }

    /// Get a snapshot of pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    /// Reset pool statistics counters.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    pub(crate) fn stats_recorder(&self) -> &AtomicPoolStats {
        &self.stats
    }

    /// Dropped handles from the current epoch still holding a counted slot.
    fn pending_orphans(&self) -> usize {
        let epoch = self.epoch;
        self.orphans.lock().iter().filter(|(e, _)| *e == epoch).count()
    }

    /// Destroy resources whose handles were dropped without a release and
    /// free the slots they held. Orphans from an earlier epoch were no longer
    /// counted, so they are destroyed without touching the count.
    fn reclaim_orphans(&mut self) {
        let orphans = std::mem::take(&mut *self.orphans.lock());
        if orphans.is_empty() {
            return;
        }
        let mut freed = 0;
        let reclaimed = orphans.len();
        for (epoch, resource) in orphans {
            self.lifecycle.on_destroy(resource);
            self.stats.record_destroyed();
            if epoch == self.epoch {
                self.total_count -= 1;
                freed += 1;
            }
        }
        warn!(
            pool = self.id,
            reclaimed,
            freed,
            total = self.total_count,
            "Destroyed resources whose handles were dropped without release"
        );
    }
}

impl<T, L: Lifecycle<T>> Drop for ResourcePool<T, L> {
    fn drop(&mut self) {
        self.reclaim_orphans();
        while let Some(resource) = self.idle.pop() {
            self.lifecycle.on_destroy(resource);
        }
    }
}

impl<T, L: Lifecycle<T>> fmt::Debug for ResourcePool<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("id", &self.id)
            .field("epoch", &self.epoch)
            .field("all", &self.count_all())
            .field("inactive", &self.idle.len())
            .field("max_capacity", &self.max_capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::HookError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Create(u32),
        Acquire(u32),
        Release(u32),
        Destroy(u32),
    }

    #[derive(Default)]
    struct Script {
        next: u32,
        events: Vec<Event>,
        fail_create: bool,
        fail_acquire: bool,
        fail_release: bool,
    }

    #[derive(Clone, Default)]
    struct Scripted(Rc<RefCell<Script>>);

    impl Scripted {
        fn events(&self) -> Vec<Event> {
            self.0.borrow().events.clone()
        }

        fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
            self.0.borrow().events.iter().filter(|e| pred(e)).count()
        }

        fn creates(&self) -> usize {
            self.count(|e| matches!(e, Event::Create(_)))
        }

        fn destroys(&self) -> usize {
            self.count(|e| matches!(e, Event::Destroy(_)))
        }

        fn releases(&self) -> usize {
            self.count(|e| matches!(e, Event::Release(_)))
        }

        fn set(&self, f: impl FnOnce(&mut Script)) {
            f(&mut self.0.borrow_mut());
        }
    }

    impl Lifecycle<u32> for Scripted {
        fn create(&mut self) -> Result<u32, HookError> {
            let mut s = self.0.borrow_mut();
            if s.fail_create {
                return Err("create failed".into());
            }
            s.next += 1;
            let id = s.next;
            s.events.push(Event::Create(id));
            Ok(id)
        }

        fn on_acquire(&mut self, resource: &mut u32) -> Result<(), HookError> {
            let mut s = self.0.borrow_mut();
            if s.fail_acquire {
                return Err("acquire failed".into());
            }
            s.events.push(Event::Acquire(*resource));
            Ok(())
        }

        fn on_release(&mut self, resource: &mut u32) -> Result<(), HookError> {
            let mut s = self.0.borrow_mut();
            if s.fail_release {
                return Err("release failed".into());
            }
            s.events.push(Event::Release(*resource));
            Ok(())
        }

        fn on_destroy(&mut self, resource: u32) {
            self.0.borrow_mut().events.push(Event::Destroy(resource));
        }
    }

    fn scripted_pool(initial: usize, max: usize) -> (ResourcePool<u32, Scripted>, Scripted) {
        let script = Scripted::default();
        let pool = ResourcePool::with_lifecycle(script.clone(), PoolConfig::new(initial, max))
            .expect("valid config");
        (pool, script)
    }

    fn assert_invariants(pool: &ResourcePool<u32, Scripted>) {
        let snap = pool.snapshot();
        assert!(snap.holds_invariants(), "invariants broken: {snap:?}");
    }

    // -- construction --

    #[test]
    fn new_creates_initial_batch() {
        let (pool, script) = scripted_pool(3, 5);
        assert_eq!(script.creates(), 3);
        assert_eq!(pool.count_all(), 3);
        assert_eq!(pool.count_inactive(), 3);
        assert_eq!(pool.count_active(), 0);
        assert_eq!(pool.max_capacity(), 5);
        assert_eq!(pool.stats().created, 3);
    }

    #[test]
    fn new_from_closures() {
        let mut pool = ResourcePool::new(|| 0u64, |_: &mut u64| {}, |v: &mut u64| *v = 0, drop, 1, 2)
            .unwrap();
        let mut v = pool.acquire().unwrap();
        *v = 42;
        pool.release(v).unwrap();
        assert_eq!(*pool.acquire().unwrap(), 0);
    }

    #[test]
    fn new_rejects_invalid_configuration() {
        let script = Scripted::default();
        let err = ResourcePool::with_lifecycle(script.clone(), PoolConfig::new(4, 3)).unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfiguration(_)));
        let err = ResourcePool::with_lifecycle(script.clone(), PoolConfig::new(0, 0)).unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfiguration(_)));
        assert_eq!(script.creates(), 0);
    }

    #[test]
    fn failed_warm_up_destroys_created_resources() {
        struct FailThird {
            made: u32,
            destroyed: Rc<RefCell<Vec<u32>>>,
        }
        impl Lifecycle<u32> for FailThird {
            fn create(&mut self) -> Result<u32, HookError> {
                if self.made == 2 {
                    return Err("out of handles".into());
                }
                self.made += 1;
                Ok(self.made)
            }
            fn on_destroy(&mut self, resource: u32) {
                self.destroyed.borrow_mut().push(resource);
            }
        }

        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let lifecycle = FailThird {
            made: 0,
            destroyed: Rc::clone(&destroyed),
        };
        let err = ResourcePool::with_lifecycle(lifecycle, PoolConfig::new(4, 4)).unwrap_err();
        assert!(matches!(err, PoolError::Hook(_)));
        assert_eq!(*destroyed.borrow(), vec![2, 1]);
    }

    // -- acquire --

    #[test]
    fn acquire_pops_most_recent_first() {
        let (mut pool, script) = scripted_pool(2, 4);
        let a = pool.acquire().unwrap();
        assert_eq!(*a, 2);
        let b = pool.acquire().unwrap();
        assert_eq!(*b, 1);
        pool.release(b).unwrap();
        pool.release(a).unwrap();
        assert_eq!(*pool.acquire().unwrap(), 2);
        assert_eq!(script.creates(), 2);
    }

    #[test]
    fn acquire_runs_hook_after_leaving_idle() {
        let (mut pool, script) = scripted_pool(1, 1);
        let r = pool.acquire().unwrap();
        assert_eq!(script.events(), vec![Event::Create(1), Event::Acquire(1)]);
        assert_eq!(pool.count_inactive(), 0);
        assert_eq!(pool.stats().reused, 1);
        pool.release(r).unwrap();
    }

    #[test]
    fn growth_boundary() {
        let (mut pool, script) = scripted_pool(2, 3);
        let held: Vec<_> = (0..3).map(|_| pool.acquire().unwrap()).collect();
        assert_eq!(script.creates(), 3);
        assert_eq!(pool.count_all(), 3);
        assert_eq!(pool.count_active(), 3);

        let err = pool.acquire().unwrap_err();
        assert!(matches!(err, PoolError::PoolExhausted { capacity: 3 }));
        assert_eq!(script.creates(), 3);
        assert_eq!(pool.count_all(), 3);
        assert_eq!(pool.stats().exhausted, 1);

        let mut ids: Vec<u32> = held.iter().map(|p| **p).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn try_acquire_reports_exhaustion_as_none() {
        let (mut pool, _) = scripted_pool(1, 1);
        let held = pool.try_acquire().unwrap();
        assert!(held.is_some());
        assert!(pool.is_exhausted());
        assert!(pool.try_acquire().unwrap().is_none());
    }

    #[test]
    fn failed_acquire_hook_returns_idle_resource() {
        let (mut pool, script) = scripted_pool(2, 2);
        script.set(|s| s.fail_acquire = true);
        let err = pool.acquire().unwrap_err();
        assert!(matches!(err, PoolError::Hook(_)));
        assert_eq!(pool.count_inactive(), 2);
        assert_eq!(pool.count_all(), 2);

        script.set(|s| s.fail_acquire = false);
        assert_eq!(*pool.acquire().unwrap(), 2);
    }

    #[test]
    fn failed_acquire_hook_destroys_fresh_resource() {
        let (mut pool, script) = scripted_pool(0, 2);
        script.set(|s| s.fail_acquire = true);
        assert!(pool.acquire().is_err());
        assert_eq!(pool.count_all(), 0);
        assert_eq!(script.events(), vec![Event::Create(1), Event::Destroy(1)]);
    }

    #[test]
    fn failed_create_leaves_counts() {
        let (mut pool, script) = scripted_pool(0, 2);
        script.set(|s| s.fail_create = true);
        assert!(matches!(pool.acquire(), Err(PoolError::Hook(_))));
        assert_eq!(pool.count_all(), 0);
        assert_invariants(&pool);
    }

    // -- release --

    #[test]
    fn release_keeps_under_capacity() {
        let (mut pool, script) = scripted_pool(1, 2);
        let r = pool.acquire().unwrap();
        assert_eq!(pool.release(r).unwrap(), ReleaseOutcome::Kept);
        assert_eq!(script.releases(), 1);
        assert_eq!(script.destroys(), 0);
        assert_eq!(pool.count_inactive(), 1);
        assert_eq!(pool.count_all(), 1);
    }

    #[test]
    fn release_rejects_foreign_handle() {
        let (mut a, _) = scripted_pool(1, 1);
        let (mut b, script_b) = scripted_pool(1, 1);
        let from_a = a.acquire().unwrap();

        let rejected = b.release(from_a).unwrap_err();
        assert!(matches!(rejected.error(), PoolError::InvalidResource));
        assert_eq!(script_b.releases(), 0);
        assert_eq!(b.count_inactive(), 1);

        a.release(rejected.into_resource()).unwrap();
        assert_eq!(a.count_inactive(), 1);
    }

    #[test]
    fn failed_release_hook_hands_resource_back() {
        let (mut pool, script) = scripted_pool(1, 1);
        let r = pool.acquire().unwrap();
        script.set(|s| s.fail_release = true);

        let rejected = pool.release(r).unwrap_err();
        assert!(matches!(rejected.error(), PoolError::Hook(_)));
        assert_eq!(pool.count_active(), 1);
        assert_eq!(pool.count_inactive(), 0);

        script.set(|s| s.fail_release = false);
        assert_eq!(
            pool.release(rejected.into_resource()).unwrap(),
            ReleaseOutcome::Kept
        );
        assert_invariants(&pool);
    }

    #[test]
    fn overflow_destroy_when_idle_is_full() {
        let (mut pool, script) = scripted_pool(0, 2);
        let stale = pool.acquire().unwrap();
        pool.clear();

        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        pool.release(a).unwrap();
        pool.release(b).unwrap();
        assert_eq!(pool.count_inactive(), 2);
        let releases_before = script.releases();

        assert_eq!(pool.release(stale).unwrap(), ReleaseOutcome::Destroyed);
        assert_eq!(script.releases(), releases_before);
        assert_eq!(script.events().last(), Some(&Event::Destroy(1)));
        assert_eq!(pool.count_inactive(), 2);
        assert_eq!(pool.count_all(), 2);
        assert_eq!(pool.stats().evicted, 1);
        assert_invariants(&pool);
    }

    #[test]
    fn release_after_clear_is_adopted() {
        let (mut pool, script) = scripted_pool(2, 3);
        let held = pool.acquire().unwrap();
        assert_eq!(pool.clear(), 1);
        assert_eq!(pool.count_all(), 0);

        assert_eq!(pool.release(held).unwrap(), ReleaseOutcome::Kept);
        assert_eq!(pool.count_all(), 1);
        assert_eq!(pool.count_inactive(), 1);
        assert_eq!(script.releases(), 1);
        assert_invariants(&pool);
    }

    #[test]
    fn release_after_clear_destroyed_when_pool_refilled() {
        let (mut pool, _) = scripted_pool(0, 2);
        let stale = pool.acquire().unwrap();
        pool.clear();
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();

        assert_eq!(pool.release(stale).unwrap(), ReleaseOutcome::Destroyed);
        assert_eq!(pool.count_all(), 2);
        assert_invariants(&pool);

        pool.release(a).unwrap();
        pool.release(b).unwrap();
        assert_invariants(&pool);
    }

    // -- clear --

    #[test]
    fn clear_destroys_idle_only() {
        let (mut pool, script) = scripted_pool(3, 4);
        let active = pool.acquire().unwrap();
        assert_eq!(pool.clear(), 2);
        assert_eq!(pool.count_all(), 0);
        assert_eq!(pool.count_inactive(), 0);
        assert_eq!(script.destroys(), 2);
        assert_eq!(*active, 3);
        assert_eq!(script.count(|e| *e == Event::Destroy(3)), 0);

        drop(pool);
        assert_eq!(script.destroys(), 2);
    }

    #[test]
    fn clear_on_empty_pool() {
        let (mut pool, script) = scripted_pool(0, 1);
        assert_eq!(pool.clear(), 0);
        assert_eq!(pool.clear(), 0);
        assert_eq!(script.destroys(), 0);
    }

    // -- warm / drop / accessors --

    #[test]
    fn warm_stops_at_capacity() {
        let (mut pool, script) = scripted_pool(0, 3);
        let held = pool.acquire().unwrap();
        assert_eq!(pool.warm(5).unwrap(), 2);
        assert_eq!(pool.count_inactive(), 2);
        assert_eq!(pool.count_all(), 3);
        assert_eq!(pool.warm(1).unwrap(), 0);
        assert_eq!(script.creates(), 3);
        pool.release(held).unwrap();
    }

    #[test]
    fn drop_destroys_idle_resources() {
        let (pool, script) = scripted_pool(3, 3);
        drop(pool);
        assert_eq!(script.destroys(), 3);
    }

    #[test]
    fn dropped_handle_frees_its_slot() {
        let (mut pool, script) = scripted_pool(0, 1);
        let first = pool.acquire().unwrap();
        let id = *first;
        drop(first);

        assert_eq!(pool.count_all(), 0);
        assert_eq!(pool.count_active(), 0);
        assert!(!pool.is_exhausted());

        let second = pool.acquire().unwrap();
        assert_eq!(script.count(|e| *e == Event::Destroy(id)), 1);
        assert_eq!(script.releases(), 0);
        assert_eq!(pool.count_all(), 1);
        assert_ne!(*second, id);
        pool.release(second).unwrap();
        assert_invariants(&pool);
    }

    #[test]
    fn dropped_stale_handle_destroyed_without_uncounting() {
        let (mut pool, script) = scripted_pool(0, 2);
        let stale = pool.acquire().unwrap();
        pool.clear();
        let fresh = pool.acquire().unwrap();
        drop(stale);

        assert_eq!(pool.count_all(), 1);
        pool.warm(0).unwrap();
        assert_eq!(script.destroys(), 1);
        assert_eq!(pool.count_all(), 1);
        assert_eq!(pool.count_active(), 1);
        pool.release(fresh).unwrap();
        assert_invariants(&pool);
    }

    #[test]
    fn pool_drop_destroys_orphans() {
        let (mut pool, script) = scripted_pool(1, 2);
        drop(pool.acquire().unwrap());
        drop(pool);
        assert_eq!(script.destroys(), 1);
    }

    #[test]
    fn accessors_do_not_mutate() {
        let (mut pool, script) = scripted_pool(2, 4);
        let _held = pool.acquire().unwrap();
        let events = script.events().len();
        let first = pool.snapshot();
        for _ in 0..3 {
            assert_eq!(pool.snapshot(), first);
            assert_eq!(pool.count_all(), 2);
            assert_eq!(pool.count_active(), 1);
            assert_eq!(pool.count_inactive(), 1);
        }
        assert_eq!(script.events().len(), events);
    }

    #[test]
    fn pool_ids_are_unique() {
        let (a, _) = scripted_pool(0, 1);
        let (b, _) = scripted_pool(0, 1);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn debug_shows_counters() {
        let (pool, _) = scripted_pool(1, 2);
        let out = format!("{pool:?}");
        assert!(out.contains("max_capacity: 2"));
        assert!(out.contains("inactive: 1"));
    }
}
