//! Lifecycle callbacks invoked at each pool transition.
//!
//! `Lifecycle` is the contract the pool drives; `Hooks` adapts four plain
//! closures to it. Dispatch is static: the pool is generic over its
//! lifecycle type.

use std::fmt;

use crate::error::HookError;

/// Callbacks run by the pool on create, acquire, release, and destroy.
///
/// `create`, `on_acquire`, and `on_release` may fail; the pool then aborts
/// that one operation and leaves its counters untouched. `on_destroy`
/// consumes the resource and cannot fail.
pub trait Lifecycle<T> {
    /// Produce one new, fully usable resource.
    fn create(&mut self) -> Result<T, HookError>;

    /// Prepare a resource that is about to be handed out.
    fn on_acquire(&mut self, resource: &mut T) -> Result<(), HookError> {
        let _ = resource;
        Ok(())
    }

    /// Prepare a returned resource for dormancy.
    fn on_release(&mut self, resource: &mut T) -> Result<(), HookError> {
        let _ = resource;
        Ok(())
    }

    /// Permanently dispose of a resource.
    fn on_destroy(&mut self, resource: T) {
        drop(resource);
    }
}

/// Closure-backed [`Lifecycle`].
///
/// ```
/// use respool_core::lifecycle::{Hooks, Lifecycle};
///
/// let mut hooks = Hooks::new(|| Vec::<u8>::with_capacity(64), Vec::clear, |_| {}, drop);
/// let mut buf = hooks.create().unwrap();
/// buf.push(1);
/// hooks.on_acquire(&mut buf).unwrap();
/// assert!(buf.is_empty());
/// ```
pub struct Hooks<C, A, R, D> {
    create: C,
    acquire: A,
    release: R,
    destroy: D,
}

impl<C, A, R, D> Hooks<C, A, R, D> {
    /// Bundle the four callbacks.
    pub fn new<T>(create: C, acquire: A, release: R, destroy: D) -> Self
    where
        C: FnMut() -> T,
        A: FnMut(&mut T),
        R: FnMut(&mut T),
        D: FnMut(T),
    {
        Self {
            create,
            acquire,
            release,
            destroy,
        }
    }
}

impl<T, C, A, R, D> Lifecycle<T> for Hooks<C, A, R, D>
where
    C: FnMut() -> T,
    A: FnMut(&mut T),
    R: FnMut(&mut T),
    D: FnMut(T),
{
    fn create(&mut self) -> Result<T, HookError> {
        Ok((self.create)())
    }

    fn on_acquire(&mut self, resource: &mut T) -> Result<(), HookError> {
        (self.acquire)(resource);
        Ok(())
    }

    fn on_release(&mut self, resource: &mut T) -> Result<(), HookError> {
        (self.release)(resource);
        Ok(())
    }

    fn on_destroy(&mut self, resource: T) {
        (self.destroy)(resource);
    }
}

impl<C, A, R, D> fmt::Debug for Hooks<C, A, R, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}
