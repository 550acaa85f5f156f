//! An in-process host allocator.
//!
//! [`HeapAllocator`] implements [`HostAllocator`] with the global allocator. The element type is
//! only known at runtime, so the size and alignment of the elements are looked up in the type
//! registry. It's useful when no host is available, for example in tests and benchmarks, and
//! serves as a reference for host bindings.

use std::{
    alloc::{self, Layout},
    fmt::{Debug, Formatter, Result as FmtResult},
    ptr::NonNull,
};

use log::debug;
use smallvec::{smallvec, SmallVec};

use super::{
    descriptor::ArrayDescriptor,
    host::{HostAllocator, HostArray},
};
use crate::{
    data::{
        array::dimensions::{
            byte_strides_for, strides_for, DimBuf, Dimensions, DimsExt, Order, INLINE_RANK,
        },
        types::type_tag::{lookup, TypeTag},
    },
    error::{AllocationError, ArrayResult, TypeError},
    memory::release::Release,
};

/// Allocates zero-initialized arrays on the heap.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HeapAllocator {
    order: Order,
}

impl HeapAllocator {
    /// An allocator for row-major arrays.
    #[inline]
    pub const fn new() -> Self {
        HeapAllocator {
            order: Order::RowMajor,
        }
    }

    /// An allocator for arrays with the given memory order.
    #[inline]
    pub const fn with_order(order: Order) -> Self {
        HeapAllocator { order }
    }

    /// Returns the memory order of the arrays allocated by this allocator.
    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }
}

impl HostAllocator for HeapAllocator {
    type Array = RawArray;

    fn allocate(&self, shape: &[usize], tag: TypeTag) -> ArrayResult<RawArray> {
        let info = lookup(tag);
        if info.is_invalid() {
            Err(TypeError::InvalidTag)?;
        }

        let count = shape.checked_size()?;
        let layout = count
            .checked_mul(info.size)
            .and_then(|bytes| Layout::from_size_align(bytes, info.align).ok())
            .ok_or(AllocationError::CapacityOverflow {
                count,
                element_size: info.size,
            })?;

        let mut strides: DimBuf = smallvec![0; shape.len()];
        strides_for(shape, self.order, &mut strides)?;
        let byte_strides = byte_strides_for(shape, &strides, info.size)?;

        let data = if layout.size() == 0 {
            // Safety: the alignment is never zero.
            unsafe { NonNull::new_unchecked(info.align as *mut u8) }
        } else {
            // Safety: the size of the layout is not zero.
            let ptr = unsafe { alloc::alloc_zeroed(layout) };
            NonNull::new(ptr).ok_or(AllocationError::OutOfMemory {
                bytes: layout.size(),
            })?
        };

        debug!(
            "allocated {} array with shape {:?} ({} bytes)",
            info.name,
            shape,
            layout.size()
        );

        Ok(RawArray {
            data,
            layout,
            shape: Dimensions::from(shape),
            byte_strides,
            tag,
            released: false,
        })
    }
}

/// A type-erased array allocated by a [`HeapAllocator`].
///
/// The memory is freed when the array is released or dropped, whichever happens first.
pub struct RawArray {
    data: NonNull<u8>,
    layout: Layout,
    shape: Dimensions,
    byte_strides: SmallVec<[isize; INLINE_RANK]>,
    tag: TypeTag,
    released: bool,
}

impl RawArray {
    /// Returns the shape of the array.
    #[inline]
    pub fn dimensions(&self) -> &Dimensions {
        &self.shape
    }

    /// Returns the type tag of the elements.
    #[inline]
    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    /// Returns the size of the data in bytes.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.layout.size()
    }

    /// Returns `true` if the array has been released.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    fn free(&mut self) {
        if !self.released {
            self.released = true;
            if self.layout.size() != 0 {
                debug!("freeing {} bytes", self.layout.size());
                // Safety: data has been allocated with this layout and hasn't been freed.
                unsafe { alloc::dealloc(self.data.as_ptr(), self.layout) }
            }
        }
    }
}

unsafe impl HostArray for RawArray {
    fn descriptor(&mut self) -> ArrayDescriptor<'_> {
        debug_assert!(!self.released);
        // Safety: the data is zero-initialized, which is a valid value for every element type,
        // and is mutably borrowed by the descriptor.
        unsafe {
            ArrayDescriptor::new(
                self.shape.as_slice(),
                &self.byte_strides,
                lookup(self.tag).size,
                self.data.as_ptr(),
                self.tag,
            )
        }
    }
}

impl Release for RawArray {
    unsafe fn release(&mut self) {
        self.free()
    }
}

impl Drop for RawArray {
    fn drop(&mut self) {
        self.free()
    }
}

impl Debug for RawArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RawArray")
            .field("shape", &self.shape)
            .field("tag", &self.tag)
            .field("bytes", &self.layout.size())
            .field("released", &self.released)
            .finish()
    }
}
