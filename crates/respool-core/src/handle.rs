//! Owning handle for an active resource.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::Mutex;

/// Resources whose handles were dropped without a release, tagged with the
/// epoch they were acquired in. Drained by the owning pool.
pub(crate) type Orphans<T> = Arc<Mutex<Vec<(u64, T)>>>;

/// An active resource on loan from a pool.
///
/// The handle owns the resource until it is passed back to
/// [`ResourcePool::release`](crate::pool::ResourcePool::release). It is not
/// `Clone`, so a resource cannot be released twice or used after release.
/// The `(pool_id, epoch)` tag lets the pool reject foreign handles and
/// re-adopt handles that were active across a `clear()`.
///
/// Dropping a handle instead of releasing it hands the resource back to the
/// pool as an orphan: the next pool operation passes it to `on_destroy` and
/// frees its slot. If the pool is already gone the resource is simply dropped.
#[must_use = "an acquired resource is destroyed, not reused, unless it is released"]
pub struct Pooled<T> {
    resource: Option<T>,
    pool_id: u64,
    epoch: u64,
    orphans: Orphans<T>,
}

impl<T> Pooled<T> {
    pub(crate) fn new(resource: T, pool_id: u64, epoch: u64, orphans: Orphans<T>) -> Self {
        Self {
            resource: Some(resource),
            pool_id,
            epoch,
            orphans,
        }
    }

    /// Id of the pool that handed out this resource.
    #[must_use]
    pub fn pool_id(&self) -> u64 {
        self.pool_id
    }

    /// Clear generation of the pool at acquire time.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn into_inner(mut self) -> T {
        self.resource.take().expect("pooled resource already taken")
    }
}

impl<T> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.resource.as_ref().expect("pooled resource already taken")
    }
}

impl<T> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.resource.as_mut().expect("pooled resource already taken")
    }
}

impl<T> Drop for Pooled<T> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.orphans.lock().push((self.epoch, resource));
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("resource", &self.resource)
            .field("pool_id", &self.pool_id)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}
