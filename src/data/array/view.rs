//! Strided views with a rank that is known at compile time.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    marker::PhantomData,
    ops::{Index, IndexMut},
    ptr::NonNull,
};

use super::{
    checked_offset,
    dimensions::{
        is_contiguous, strides_for, Dimensions, Dims, DimsExt, DimsRankAssert, Order, RankAssert,
    },
    dyn_view::ArrayViewDyn,
    for_each_offset, unchecked_offset,
};
use crate::{
    data::types::element::Element,
    error::{ArrayResult, ShapeError},
    foreign::descriptor::ArrayDescriptor,
    memory::buffer::OwnedBuffer,
    private::Private,
};

/// A mutable strided view of an `N`-dimensional array.
///
/// The view doesn't own its data, it's valid for the lifetime `'data` of the borrow it was
/// created from. Strides are expressed in elements. A view can't be shared with or sent to
/// another thread.
///
/// ```
/// use inmet_array::prelude::*;
///
/// # fn main() -> ArrayResult<()> {
/// let mut data = vec![0u32; 6];
/// let mut view = ArrayView::<u32, 2>::from_slice(&mut data, [2, 3])?;
/// view[(1, 0)] = 4;
///
/// let transposed = view.transpose();
/// assert_eq!(transposed.shape(), &[3, 2]);
/// assert_eq!(transposed[[0, 1]], 4);
/// assert_eq!(data[3], 4);
/// # Ok(())
/// # }
/// ```
pub struct ArrayView<'data, T, const N: usize> {
    data: NonNull<T>,
    shape: [usize; N],
    strides: [usize; N],
    _marker: PhantomData<&'data mut [T]>,
}

impl<'data, T, const N: usize> ArrayView<'data, T, N> {
    /// Create a row-major view of `data` with the given shape.
    ///
    /// Returns an error if the rank of `shape` isn't `N` or if the number of elements of `shape`
    /// differs from the length of `data`.
    #[inline]
    pub fn from_slice<D: DimsExt>(data: &'data mut [T], shape: D) -> ArrayResult<Self> {
        Self::from_slice_with_order(data, shape, Order::RowMajor)
    }

    /// Create a view of `data` with the given shape and memory order.
    pub fn from_slice_with_order<D: DimsExt>(
        data: &'data mut [T],
        shape: D,
        order: Order,
    ) -> ArrayResult<Self> {
        let _ = DimsRankAssert::<D, N>::ASSERT_VALID_RANK;
        let _ = RankAssert::<N>::ASSERT_NON_ZERO;

        if shape.rank() != N {
            Err(ShapeError::RankMismatch {
                expected: N,
                found: shape.rank(),
            })?;
        }

        let size = shape.checked_size()?;
        if size != data.len() {
            Err(ShapeError::SizeMismatch {
                shape: shape.into_dimensions(),
                expected: size,
                found: data.len(),
            })?;
        }

        let mut dims = [0; N];
        shape.fill_shape(&mut dims, Private);
        let mut strides = [0; N];
        strides_for(&dims, order, &mut strides)?;

        // Safety: every index that is in bounds for dims addresses an element of data.
        unsafe { Ok(Self::from_raw_parts(NonNull::from(data).cast(), dims, strides)) }
    }

    /// Create a row-major view of the elements of `buffer` with the given shape.
    #[inline]
    pub fn from_buffer<D: DimsExt>(
        buffer: &'data mut OwnedBuffer<T>,
        shape: D,
    ) -> ArrayResult<Self> {
        Self::from_slice(buffer.as_mut_slice(), shape)
    }

    /// Create a view of the elements of `buffer` with the given shape and memory order.
    #[inline]
    pub fn from_buffer_with_order<D: DimsExt>(
        buffer: &'data mut OwnedBuffer<T>,
        shape: D,
        order: Order,
    ) -> ArrayResult<Self> {
        Self::from_slice_with_order(buffer.as_mut_slice(), shape, order)
    }

    /// Create a view from its raw parts.
    ///
    /// Safety: for every index that is in bounds for `shape`, `data` offset by the dot product of
    /// that index and `strides` must point to an initialized `T` that is valid for reads and
    /// writes, and isn't accessed through anything else, for the lifetime `'data`.
    #[inline]
    pub unsafe fn from_raw_parts(data: NonNull<T>, shape: [usize; N], strides: [usize; N]) -> Self {
        ArrayView {
            data,
            shape,
            strides,
            _marker: PhantomData,
        }
    }

    /// Returns the rank of this view.
    #[inline]
    pub const fn rank(&self) -> usize {
        N
    }

    /// Returns the shape of this view.
    #[inline]
    pub fn shape(&self) -> &[usize; N] {
        &self.shape
    }

    /// Returns the strides of this view in elements.
    #[inline]
    pub fn strides(&self) -> &[usize; N] {
        &self.strides
    }

    /// Returns the number of elements along `axis`, or 0 if the axis doesn't exist.
    #[inline]
    pub fn n_elements(&self, axis: usize) -> usize {
        self.shape.n_elements(axis)
    }

    /// Returns the total number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Returns `true` if the view has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the shape of this view as `Dimensions`.
    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.shape.into_dimensions()
    }

    /// Returns `true` if the elements are contiguous in row-major order.
    #[inline]
    pub fn is_row_major(&self) -> bool {
        is_contiguous(&self.shape, &self.strides, Order::RowMajor)
    }

    /// Returns `true` if the elements are contiguous in column-major order.
    #[inline]
    pub fn is_column_major(&self) -> bool {
        is_contiguous(&self.shape, &self.strides, Order::ColumnMajor)
    }

    /// Returns a pointer to the first element.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// Returns a mutable pointer to the first element.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_ptr()
    }

    /// Returns a reference to the element at `index`.
    ///
    /// Returns an `IndexError` if the rank of `index` isn't `N` or if it's out of bounds.
    pub fn get<D: Dims>(&self, index: D) -> ArrayResult<&T> {
        let offset = checked_offset(&self.shape, &self.strides, &index)?;
        // Safety: the index has been checked.
        unsafe { Ok(&*self.data.as_ptr().add(offset)) }
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// Returns an `IndexError` if the rank of `index` isn't `N` or if it's out of bounds.
    pub fn get_mut<D: Dims>(&mut self, index: D) -> ArrayResult<&mut T> {
        let offset = checked_offset(&self.shape, &self.strides, &index)?;
        // Safety: the index has been checked.
        unsafe { Ok(&mut *self.data.as_ptr().add(offset)) }
    }

    /// Returns a reference to the element at `index` without checking it.
    ///
    /// The index is checked if debug assertions or the `bounds-check` feature are enabled, an
    /// invalid index causes a panic in that case.
    ///
    /// Safety: the rank of `index` must be `N` and it must be in bounds.
    #[inline]
    pub unsafe fn get_unchecked<D: Dims>(&self, index: D) -> &T {
        let offset = unchecked_offset(&self.shape, &self.strides, &index);
        &*self.data.as_ptr().add(offset)
    }

    /// Returns a mutable reference to the element at `index` without checking it.
    ///
    /// Safety: the rank of `index` must be `N` and it must be in bounds.
    #[inline]
    pub unsafe fn get_unchecked_mut<D: Dims>(&mut self, index: D) -> &mut T {
        let offset = unchecked_offset(&self.shape, &self.strides, &index);
        &mut *self.data.as_ptr().add(offset)
    }

    /// Borrow this view as a new view with a shorter lifetime.
    #[inline]
    pub fn reborrow(&mut self) -> ArrayView<'_, T, N> {
        ArrayView {
            data: self.data,
            shape: self.shape,
            strides: self.strides,
            _marker: PhantomData,
        }
    }

    /// Reverse the order of the axes. No data is moved.
    pub fn transpose(mut self) -> Self {
        self.shape.reverse();
        self.strides.reverse();
        self
    }

    /// Convert this view to a view whose rank is only known at runtime.
    #[inline]
    pub fn into_dyn(self) -> ArrayViewDyn<'data, T> {
        // Safety: the layout is unchanged.
        unsafe { ArrayViewDyn::from_raw_parts(self.data, &self.shape, &self.strides) }
    }

    /// Copy the elements to a `Vec` in row-major order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.size());
        let data = self.data.as_ptr();
        // Safety: all visited offsets are in bounds.
        for_each_offset(&self.shape, &self.strides, |offset| unsafe {
            out.push((*data.add(offset)).clone())
        });
        out
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        let data = self.data.as_ptr();
        // Safety: all visited offsets are in bounds.
        for_each_offset(&self.shape, &self.strides, |offset| unsafe {
            *data.add(offset) = value.clone()
        });
    }
}

impl<'data, T: Element, const N: usize> ArrayView<'data, T, N> {
    /// Import an array described by a host.
    ///
    /// The rank of the descriptor must be `N`, its element type must be compatible with `T`, and
    /// its byte strides must be non-negative multiples of the size of `T`. The descriptor is
    /// consumed, so it can be imported only once.
    pub fn from_descriptor(desc: ArrayDescriptor<'data>) -> ArrayResult<Self> {
        let _ = RankAssert::<N>::ASSERT_NON_ZERO;

        if desc.rank() != N {
            Err(ShapeError::RankMismatch {
                expected: N,
                found: desc.rank(),
            })?;
        }

        let mut strides = [0; N];
        let data = desc.import_parts::<T>(&mut strides)?;
        let mut shape = [0; N];
        shape.copy_from_slice(desc.shape());

        // Safety: the descriptor guarantees the data is valid for this layout.
        unsafe { Ok(Self::from_raw_parts(data, shape, strides)) }
    }
}

impl<T> ArrayView<'_, T, 2> {
    /// Returns the number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.shape[0]
    }

    /// Returns the number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.shape[1]
    }
}

impl<T, D: Dims, const N: usize> Index<D> for ArrayView<'_, T, N> {
    type Output = T;

    fn index(&self, index: D) -> &T {
        match self.get(index) {
            Ok(elem) => elem,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T, D: Dims, const N: usize> IndexMut<D> for ArrayView<'_, T, N> {
    fn index_mut(&mut self, index: D) -> &mut T {
        match self.get_mut(index) {
            Ok(elem) => elem,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T, const N: usize> Debug for ArrayView<'_, T, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ArrayView")
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .finish()
    }
}
