//! Borrow views and owned arrays as `ndarray`'s `ArrayView` and `ArrayViewMut`.
//!
//! The strides of a view are used as they are, no data is copied. Views imported from a host can
//! have strides that make several indices address the same element, for example a stride of 0.
//! Such views can be borrowed immutably, but mutably borrowing them fails.

use ndarray::{ArrayView as NdView, ArrayViewMut as NdViewMut, ErrorKind, IxDyn, ShapeBuilder};

use super::{dyn_view::ArrayViewDyn, owned::OwnedArray, view::ArrayView};
use crate::error::{ArrayError, ArrayResult};

/// Trait to borrow arrays as `ndarray`'s `ArrayView`.
pub trait NdArrayView<T>: private::NdArrayPriv {
    /// Borrow the data in the array as an `ArrayView`.
    fn array_view(&self) -> NdView<'_, T, IxDyn>;
}

/// Trait to borrow arrays as `ndarray`'s `ArrayView` and `ArrayViewMut`.
pub trait NdArrayViewMut<T>: NdArrayView<T> {
    /// Mutably borrow the data in the array as an `ArrayViewMut`.
    ///
    /// Fails if two different indices address the same element.
    fn array_view_mut(&mut self) -> ArrayResult<NdViewMut<'_, T, IxDyn>>;
}

// Returns true if two different in-bounds indices have the same offset.
fn has_overlap(shape: &[usize], strides: &[usize]) -> bool {
    if shape.iter().any(|&n| n == 0) {
        return false;
    }

    let mut axes: Vec<(usize, usize)> = shape
        .iter()
        .zip(strides)
        .filter(|&(&n, _)| n > 1)
        .map(|(&n, &s)| (s, n))
        .collect();
    axes.sort_unstable();

    let mut extent = 0usize;
    for (stride, n) in axes {
        if stride <= extent {
            return true;
        }

        extent += stride * (n - 1);
    }

    false
}

fn overlap_error() -> Box<ArrayError> {
    Box::new(ArrayError::other(ndarray::ShapeError::from_kind(
        ErrorKind::Unsupported,
    )))
}

// Safety: the layout must be valid for reads of data for the lifetime 'a.
unsafe fn nd_view<'a, T>(
    data: *const T,
    shape: &[usize],
    strides: &[usize],
) -> NdView<'a, T, IxDyn> {
    NdView::from_shape_ptr(IxDyn(shape).strides(IxDyn(strides)), data)
}

// Safety: the layout must be valid for reads and writes of data for the lifetime 'a, and
// must not overlap.
unsafe fn nd_view_mut<'a, T>(
    data: *mut T,
    shape: &[usize],
    strides: &[usize],
) -> NdViewMut<'a, T, IxDyn> {
    NdViewMut::from_shape_ptr(IxDyn(shape).strides(IxDyn(strides)), data)
}

impl<T, const N: usize> NdArrayView<T> for ArrayView<'_, T, N> {
    fn array_view(&self) -> NdView<'_, T, IxDyn> {
        // Safety: the view is borrowed for the lifetime of the result.
        unsafe { nd_view(self.as_ptr(), self.shape(), self.strides()) }
    }
}

impl<T, const N: usize> NdArrayViewMut<T> for ArrayView<'_, T, N> {
    fn array_view_mut(&mut self) -> ArrayResult<NdViewMut<'_, T, IxDyn>> {
        let (shape, strides) = (*self.shape(), *self.strides());
        if has_overlap(&shape, &strides) {
            return Err(overlap_error());
        }

        // Safety: the view is mutably borrowed for the lifetime of the result.
        unsafe { Ok(nd_view_mut(self.as_mut_ptr(), &shape, &strides)) }
    }
}

impl<T> NdArrayView<T> for ArrayViewDyn<'_, T> {
    fn array_view(&self) -> NdView<'_, T, IxDyn> {
        // Safety: the view is borrowed for the lifetime of the result.
        unsafe { nd_view(self.as_ptr(), self.shape(), self.strides()) }
    }
}

impl<T> NdArrayViewMut<T> for ArrayViewDyn<'_, T> {
    fn array_view_mut(&mut self) -> ArrayResult<NdViewMut<'_, T, IxDyn>> {
        if has_overlap(self.shape(), self.strides()) {
            return Err(overlap_error());
        }

        let data = self.as_mut_ptr();
        // Safety: the view is mutably borrowed for the lifetime of the result.
        unsafe { Ok(nd_view_mut(data, self.shape(), self.strides())) }
    }
}

impl<T> NdArrayView<T> for OwnedArray<T> {
    fn array_view(&self) -> NdView<'_, T, IxDyn> {
        // Safety: the array is borrowed for the lifetime of the result.
        unsafe { nd_view(self.as_slice().as_ptr(), self.shape(), self.strides()) }
    }
}

impl<T> NdArrayViewMut<T> for OwnedArray<T> {
    fn array_view_mut(&mut self) -> ArrayResult<NdViewMut<'_, T, IxDyn>> {
        let data = self.as_mut_slice().as_mut_ptr();
        // Safety: the array is mutably borrowed for the lifetime of the result, contiguous data
        // never overlaps.
        unsafe { Ok(nd_view_mut(data, self.shape(), self.strides())) }
    }
}

mod private {
    use crate::data::array::{dyn_view::ArrayViewDyn, owned::OwnedArray, view::ArrayView};

    pub trait NdArrayPriv {}

    impl<T, const N: usize> NdArrayPriv for ArrayView<'_, T, N> {}

    impl<T> NdArrayPriv for ArrayViewDyn<'_, T> {}

    impl<T> NdArrayPriv for OwnedArray<T> {}
}
