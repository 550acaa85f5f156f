//! Strided views with a rank that is only known at runtime.
//!
//! An [`ArrayViewDyn`] stores its shape and strides in small buffers that live inline for ranks
//! up to [`INLINE_RANK`] and spill to the heap for larger ranks. It can be converted to a view
//! with a fixed rank with [`ArrayViewDyn::into_fixed`] once the rank is known.
//!
//! [`INLINE_RANK`]: super::dimensions::INLINE_RANK

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    marker::PhantomData,
    ops::{Index, IndexMut},
    ptr::NonNull,
};

use smallvec::smallvec;

use super::{
    checked_offset,
    dimensions::{is_contiguous, strides_for, DimBuf, Dimensions, Dims, DimsExt, Order},
    for_each_offset, unchecked_offset,
    view::ArrayView,
};
use crate::{
    data::types::element::Element,
    error::{ArrayResult, ShapeError},
    foreign::descriptor::ArrayDescriptor,
    memory::buffer::OwnedBuffer,
    private::Private,
};

/// A mutable strided view of an n-dimensional array whose rank is only known at runtime.
///
/// Views must have at least one axis. Like [`ArrayView`] it doesn't own its data and can't be
/// shared with or sent to another thread.
pub struct ArrayViewDyn<'data, T> {
    data: NonNull<T>,
    shape: Dimensions,
    strides: DimBuf,
    _marker: PhantomData<&'data mut [T]>,
}

impl<'data, T> ArrayViewDyn<'data, T> {
    /// Create a row-major view of `data` with the given shape.
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
        let rank = shape.rank();
        if rank == 0 {
            Err(ShapeError::ZeroRank)?;
        }

        let size = shape.checked_size()?;
        if size != data.len() {
            Err(ShapeError::SizeMismatch {
                shape: shape.into_dimensions(),
                expected: size,
                found: data.len(),
            })?;
        }

        let mut dims: DimBuf = smallvec![0; rank];
        shape.fill_shape(&mut dims, Private);
        let mut strides: DimBuf = smallvec![0; rank];
        strides_for(&dims, order, &mut strides)?;

        Ok(ArrayViewDyn {
            data: NonNull::from(data).cast(),
            shape: Dimensions::from_buf(dims),
            strides,
            _marker: PhantomData,
        })
    }

    /// Create a row-major view of the elements of `buffer` with the given shape.
    #[inline]
    pub fn from_buffer<D: DimsExt>(
        buffer: &'data mut OwnedBuffer<T>,
        shape: D,
    ) -> ArrayResult<Self> {
        Self::from_slice(buffer.as_mut_slice(), shape)
    }

    /// Create a view from its raw parts.
    ///
    /// Safety: `shape` and `strides` must have the same non-zero length. For every index that is
    /// in bounds for `shape`, `data` offset by the dot product of that index and `strides` must
    /// point to an initialized `T` that is valid for reads and writes, and isn't accessed through
    /// anything else, for the lifetime `'data`.
    pub unsafe fn from_raw_parts(data: NonNull<T>, shape: &[usize], strides: &[usize]) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        ArrayViewDyn {
            data,
            shape: Dimensions::from(shape),
            strides: DimBuf::from_slice(strides),
            _marker: PhantomData,
        }
    }

    /// Returns the rank of this view.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Returns the shape of this view.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.shape.as_slice()
    }

    /// Returns the strides of this view in elements.
    #[inline]
    pub fn strides(&self) -> &[usize] {
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
        self.shape.size()
    }

    /// Returns `true` if the view has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the shape of this view.
    #[inline]
    pub fn dimensions(&self) -> &Dimensions {
        &self.shape
    }

    /// Returns `true` if the shape and strides are stored on the heap, which happens when the
    /// rank is larger than [`INLINE_RANK`](super::dimensions::INLINE_RANK).
    #[inline]
    pub fn spilled(&self) -> bool {
        self.shape.spilled() || self.strides.spilled()
    }

    /// Returns `true` if the elements are contiguous in row-major order.
    #[inline]
    pub fn is_row_major(&self) -> bool {
        is_contiguous(self.shape(), &self.strides, Order::RowMajor)
    }

    /// Returns `true` if the elements are contiguous in column-major order.
    #[inline]
    pub fn is_column_major(&self) -> bool {
        is_contiguous(self.shape(), &self.strides, Order::ColumnMajor)
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
    /// Returns an `IndexError` if the rank of `index` differs from the rank of this view or if
    /// it's out of bounds.
    pub fn get<D: Dims>(&self, index: D) -> ArrayResult<&T> {
        let offset = checked_offset(self.shape(), &self.strides, &index)?;
        // Safety: the index has been checked.
        unsafe { Ok(&*self.data.as_ptr().add(offset)) }
    }

    /// Returns a mutable reference to the element at `index`.
    pub fn get_mut<D: Dims>(&mut self, index: D) -> ArrayResult<&mut T> {
        let offset = checked_offset(self.shape.as_slice(), &self.strides, &index)?;
        // Safety: the index has been checked.
        unsafe { Ok(&mut *self.data.as_ptr().add(offset)) }
    }

    /// Returns a reference to the element at `index` without checking it.
    ///
    /// Safety: the rank of `index` must match the rank of this view and it must be in bounds.
    #[inline]
    pub unsafe fn get_unchecked<D: Dims>(&self, index: D) -> &T {
        let offset = unchecked_offset(self.shape(), &self.strides, &index);
        &*self.data.as_ptr().add(offset)
    }

    /// Returns a mutable reference to the element at `index` without checking it.
    ///
    /// Safety: the rank of `index` must match the rank of this view and it must be in bounds.
    #[inline]
    pub unsafe fn get_unchecked_mut<D: Dims>(&mut self, index: D) -> &mut T {
        let offset = unchecked_offset(self.shape.as_slice(), &self.strides, &index);
        &mut *self.data.as_ptr().add(offset)
    }

    /// Borrow this view as a new view with a shorter lifetime.
    pub fn reborrow(&mut self) -> ArrayViewDyn<'_, T> {
        ArrayViewDyn {
            data: self.data,
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            _marker: PhantomData,
        }
    }

    /// Reverse the order of the axes. No data is moved.
    pub fn transpose(mut self) -> Self {
        self.shape.as_mut_slice().reverse();
        self.strides.reverse();
        self
    }

    /// Convert this view to a view with rank `N`.
    ///
    /// Returns an error if the rank of this view isn't `N`.
    pub fn into_fixed<const N: usize>(self) -> ArrayResult<ArrayView<'data, T, N>> {
        if self.rank() != N {
            Err(ShapeError::RankMismatch {
                expected: N,
                found: self.rank(),
            })?;
        }

        let mut shape = [0; N];
        shape.copy_from_slice(self.shape());
        let mut strides = [0; N];
        strides.copy_from_slice(&self.strides);

        // Safety: the layout is unchanged.
        unsafe { Ok(ArrayView::from_raw_parts(self.data, shape, strides)) }
    }

    /// Copy the elements to a `Vec` in row-major order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.size());
        let data = self.data.as_ptr();
        // Safety: all visited offsets are in bounds.
        for_each_offset(self.shape(), &self.strides, |offset| unsafe {
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
        for_each_offset(self.shape.as_slice(), &self.strides, |offset| unsafe {
            *data.add(offset) = value.clone()
        });
    }
}

impl<'data, T: Element> ArrayViewDyn<'data, T> {
    /// Import an array described by a host.
    ///
    /// The rank of the descriptor must not be zero, its element type must be compatible with `T`,
    /// and its byte strides must be non-negative multiples of the size of `T`.
    pub fn from_descriptor(desc: ArrayDescriptor<'data>) -> ArrayResult<Self> {
        let rank = desc.rank();
        if rank == 0 {
            Err(ShapeError::ZeroRank)?;
        }

        let mut strides: DimBuf = smallvec![0; rank];
        let data = desc.import_parts::<T>(&mut strides)?;

        Ok(ArrayViewDyn {
            data,
            shape: Dimensions::from(desc.shape()),
            strides,
            _marker: PhantomData,
        })
    }

    /// Replace this view with a view of another array described by a host.
    ///
    /// If the import fails, the error is returned and this view is left unchanged.
    pub fn reimport(&mut self, desc: ArrayDescriptor<'data>) -> ArrayResult<()> {
        *self = Self::from_descriptor(desc)?;
        Ok(())
    }
}

impl<T, D: Dims> Index<D> for ArrayViewDyn<'_, T> {
    type Output = T;

    fn index(&self, index: D) -> &T {
        match self.get(index) {
            Ok(elem) => elem,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T, D: Dims> IndexMut<D> for ArrayViewDyn<'_, T> {
    fn index_mut(&mut self, index: D) -> &mut T {
        match self.get_mut(index) {
            Ok(elem) => elem,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T> Debug for ArrayViewDyn<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ArrayViewDyn")
            .field("shape", &self.shape.as_slice())
            .field("strides", &self.strides.as_slice())
            .finish()
    }
}
