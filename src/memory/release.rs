//! Release resources exactly once.
//!
//! A resource that must be released explicitly, like a reference to an array owned by a host,
//! implements [`Release`]. Wrapping it in an [`Owned`] guarantees `release` is called exactly once
//! when the `Owned` is dropped, unless ownership is handed back with [`Owned::into_inner`].

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
};

use log::debug;

/// A resource that has to be released when it's no longer used.
pub trait Release {
    /// Release the resource.
    ///
    /// Safety: this method must be called at most once, the resource must not be used after it
    /// has been released.
    unsafe fn release(&mut self);
}

/// Owns a resource and releases it when dropped.
pub struct Owned<R: Release> {
    resource: ManuallyDrop<R>,
}

impl<R: Release> Owned<R> {
    /// Take ownership of `resource`.
    #[inline]
    pub fn new(resource: R) -> Self {
        Owned {
            resource: ManuallyDrop::new(resource),
        }
    }

    /// Return the resource without releasing it.
    pub fn into_inner(self) -> R {
        let mut this = ManuallyDrop::new(self);
        // Safety: `this` is never used or dropped again.
        unsafe { ManuallyDrop::take(&mut this.resource) }
    }
}

impl<R: Release> Deref for Owned<R> {
    type Target = R;

    #[inline]
    fn deref(&self) -> &R {
        &self.resource
    }
}

impl<R: Release> DerefMut for Owned<R> {
    #[inline]
    fn deref_mut(&mut self) -> &mut R {
        &mut self.resource
    }
}

impl<R: Release> Drop for Owned<R> {
    fn drop(&mut self) {
        debug!("releasing {}", std::any::type_name::<R>());
        // Safety: drop is called once, the resource is dropped right after it has been released.
        unsafe {
            self.resource.release();
            ManuallyDrop::drop(&mut self.resource);
        }
    }
}

impl<R: Release + Debug> Debug for Owned<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("Owned").field(&*self.resource).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::{Owned, Release};

    struct Counted(Rc<Cell<usize>>);

    impl Release for Counted {
        unsafe fn release(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn released_once_on_drop() {
        let count = Rc::new(Cell::new(0));
        {
            let owned = Owned::new(Counted(count.clone()));
            let moved = owned;
            assert_eq!(moved.0.get(), 0);
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn into_inner_is_not_released() {
        let count = Rc::new(Cell::new(0));
        let owned = Owned::new(Counted(count.clone()));
        let inner = owned.into_inner();
        drop(inner);
        assert_eq!(count.get(), 0);
    }
}
