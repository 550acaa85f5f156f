//! Arrays allocated by a host and the export path.
//!
//! When a routine needs to return a new array to its host, the host has to allocate it: the
//! array must be owned by the host's memory manager. A host exposes its allocator by implementing
//! [`HostAllocator`]. [`export`] asks the allocator for a new array and wraps it in an
//! [`Exported`], which releases the array when it's dropped unless it's handed back to the host
//! with [`Exported::into_inner`].

use log::debug;

use super::descriptor::ArrayDescriptor;
use crate::{
    data::{
        array::{
            dimensions::{Dims, DimsExt},
            dyn_view::ArrayViewDyn,
            view::ArrayView,
        },
        types::{element::Element, type_tag::TypeTag},
    },
    error::{AllocationError, ArrayResult, ShapeError, TypeError},
    memory::release::{Owned, Release},
};

/// An array that can describe itself with an [`ArrayDescriptor`].
///
/// Safety: the descriptor returned by [`HostArray::descriptor`] must satisfy the requirements of
/// [`ArrayDescriptor::new`] for the duration of the mutable borrow of `self`.
pub unsafe trait HostArray {
    /// Describe the layout and data of this array.
    fn descriptor(&mut self) -> ArrayDescriptor<'_>;
}

/// A host that can allocate new arrays.
pub trait HostAllocator {
    /// The host's handle to an allocated array.
    type Array: HostArray + Release;

    /// Allocate a new array with the given shape and element type.
    ///
    /// The array must have exactly the requested shape and element type. A host that fails to
    /// allocate should return an [`AllocationError::Host`].
    fn allocate(&self, shape: &[usize], tag: TypeTag) -> ArrayResult<Self::Array>;
}

impl<A: HostAllocator + ?Sized> HostAllocator for &A {
    type Array = A::Array;

    #[inline]
    fn allocate(&self, shape: &[usize], tag: TypeTag) -> ArrayResult<Self::Array> {
        (**self).allocate(shape, tag)
    }
}

/// A new array allocated by a host.
///
/// The array is released when this struct is dropped.
#[derive(Debug)]
pub struct Exported<A: HostArray + Release> {
    array: Owned<A>,
}

impl<A: HostArray + Release> Exported<A> {
    /// Create a view of the array with rank `N`.
    pub fn view_mut<T: Element, const N: usize>(&mut self) -> ArrayResult<ArrayView<'_, T, N>> {
        ArrayView::from_descriptor(self.array.descriptor())
    }

    /// Create a view of the array whose rank is only known at runtime.
    pub fn view_dyn_mut<T: Element>(&mut self) -> ArrayResult<ArrayViewDyn<'_, T>> {
        ArrayViewDyn::from_descriptor(self.array.descriptor())
    }

    /// Returns a reference to the host's handle.
    #[inline]
    pub fn array(&self) -> &A {
        &self.array
    }

    /// Hand the array back to the host without releasing it.
    #[inline]
    pub fn into_inner(self) -> A {
        self.array.into_inner()
    }
}

/// Ask `allocator` to allocate a new array of `T` with the given shape.
///
/// The shape must have at least one axis. The array returned by the host is checked: if its shape
/// or element type differs from what was requested it's released and an error is returned.
pub fn export<T, A, D>(allocator: &A, shape: D) -> ArrayResult<Exported<A::Array>>
where
    T: Element,
    A: HostAllocator + ?Sized,
    D: DimsExt,
{
    let rank = shape.rank();
    if rank == 0 {
        Err(ShapeError::ZeroRank)?;
    }

    shape.checked_size()?;
    let dims = shape.into_dimensions();

    let mut array = Owned::new(allocator.allocate(dims.as_slice(), T::TAG)?);
    {
        let desc = array.descriptor();
        if desc.shape() != dims.as_slice() {
            Err(AllocationError::Host {
                element_type: T::type_name(),
                shape: dims.clone(),
                reason: format!("the host returned an array with shape {:?}", desc.shape()),
            })?;
        }

        if !T::accepts(desc.type_tag()) {
            Err(TypeError::IncompatibleElement {
                element_type: T::type_name(),
                found: desc.type_tag(),
            })?;
        }
    }

    debug!("exported array of {} with shape {}", T::type_name(), dims);
    Ok(Exported { array })
}
