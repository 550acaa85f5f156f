//! A single-owner heap allocation of elements.

use std::{
    alloc::Layout,
    fmt::{Debug, Formatter, Result as FmtResult},
    mem,
    ptr::NonNull,
};

use log::debug;

use crate::{
    data::types::element::Element,
    error::{AllocationError, ArrayResult},
};

/// A contiguous heap allocation of `size` elements of type `T`.
///
/// A buffer is either empty, in which case it owns no allocation at all, or it owns exactly one
/// allocation which is freed when the buffer is dropped. Buffers can't be cloned: code that needs
/// to access the same data from multiple places should share a view of it instead.
///
/// Moving a buffer transfers its allocation. [`OwnedBuffer::take`] can be used to move the
/// allocation out of a buffer that's only mutably borrowed, the source is left empty.
pub struct OwnedBuffer<T> {
    data: Box<[T]>,
}

impl<T: Element> OwnedBuffer<T> {
    /// Allocate a buffer for `count` elements.
    ///
    /// If `count` is 0 no memory is allocated. The elements are initialized to their default
    /// value, i.e. zero. Fails with an [`AllocationError`] if the allocation is too large or
    /// can't be satisfied.
    pub fn allocate(count: usize) -> ArrayResult<Self> {
        if count == 0 {
            return Ok(Self::empty());
        }

        let element_size = mem::size_of::<T>();
        let bytes = Layout::array::<T>(count)
            .map_err(|_| AllocationError::CapacityOverflow {
                count,
                element_size,
            })?
            .size();

        let mut data = Vec::new();
        data.try_reserve_exact(count)
            .map_err(|_| AllocationError::OutOfMemory { bytes })?;
        data.resize(count, T::default());

        debug!(
            "allocated buffer for {} elements of {} ({} bytes)",
            count,
            T::type_name(),
            bytes
        );

        Ok(OwnedBuffer {
            data: data.into_boxed_slice(),
        })
    }

    /// Replace the allocation of this buffer with a new one for `count` elements.
    ///
    /// The current allocation is freed after the new one has succeeded. If allocating fails the
    /// buffer is left unchanged.
    pub fn reallocate(&mut self, count: usize) -> ArrayResult<()> {
        *self = Self::allocate(count)?;
        Ok(())
    }
}

impl<T> OwnedBuffer<T> {
    /// Returns a buffer that owns no allocation.
    #[inline]
    pub fn empty() -> Self {
        OwnedBuffer {
            data: Box::default(),
        }
    }

    /// Take ownership of the data in `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        OwnedBuffer {
            data: data.into_boxed_slice(),
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if this buffer owns no allocation.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a pointer to the first element, or `None` if the buffer is empty.
    #[inline]
    pub fn data(&self) -> Option<NonNull<T>> {
        if self.data.is_empty() {
            None
        } else {
            NonNull::new(self.data.as_ptr() as *mut T)
        }
    }

    /// Returns the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Move the allocation out of this buffer, leaving it empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Convert the buffer to a `Vec` without copying.
    pub fn into_vec(self) -> Vec<T> {
        self.data.into_vec()
    }
}

impl<T> Default for OwnedBuffer<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<T>> for OwnedBuffer<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T> Debug for OwnedBuffer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OwnedBuffer")
            .field("size", &self.size())
            .field("data", &self.data())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::OwnedBuffer;
    use crate::error::{AllocationError, ArrayError};

    #[test]
    fn allocate_zeroed() {
        let buffer = OwnedBuffer::<f64>::allocate(5).unwrap();
        assert_eq!(buffer.size(), 5);
        assert!(buffer.data().is_some());
        assert!(buffer.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn allocate_nothing() {
        let buffer = OwnedBuffer::<i32>::allocate(0).unwrap();
        assert_eq!(buffer.size(), 0);
        assert!(buffer.is_empty());
        assert!(buffer.data().is_none());
    }

    #[test]
    fn allocate_too_much() {
        let err = OwnedBuffer::<u64>::allocate(usize::MAX / 2).unwrap_err();
        assert!(matches!(
            *err,
            ArrayError::AllocationError(AllocationError::CapacityOverflow {
                element_size: 8,
                ..
            })
        ));
    }

    #[test]
    fn reallocate_replaces_data() {
        let mut buffer = OwnedBuffer::<u8>::allocate(2).unwrap();
        buffer.as_mut_slice()[0] = 3;
        buffer.reallocate(4).unwrap();
        assert_eq!(buffer.as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn failed_reallocate_keeps_data() {
        let mut buffer = OwnedBuffer::<u16>::from_vec(vec![1, 2]);
        assert!(buffer.reallocate(usize::MAX).is_err());
        assert_eq!(buffer.as_slice(), &[1, 2]);
    }
}
