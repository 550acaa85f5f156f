//! Arrays that own their data.

use std::{
    mem::size_of,
    ops::{Index, IndexMut},
    ptr::NonNull,
};

use smallvec::{smallvec, SmallVec};

use super::{
    checked_offset,
    dimensions::{
        byte_strides_for, strides_for, DimBuf, Dimensions, Dims, DimsExt, Order, INLINE_RANK,
    },
    dyn_view::ArrayViewDyn,
    view::ArrayView,
};
use crate::{
    data::types::element::Element,
    error::{ArrayResult, ShapeError},
    foreign::{descriptor::ArrayDescriptor, host::HostArray},
    memory::buffer::OwnedBuffer,
    private::Private,
};

/// An n-dimensional array that owns its data.
///
/// The data is stored in an [`OwnedBuffer`] in row-major or column-major order, the array keeps
/// the buffer together with its shape. It can be indexed with anything that implements [`Dims`],
/// and hands out views of its data.
#[derive(Debug)]
pub struct OwnedArray<T> {
    buffer: OwnedBuffer<T>,
    dimensions: Dimensions,
    strides: DimBuf,
    byte_strides: SmallVec<[isize; INLINE_RANK]>,
    order: Order,
}

impl<T: Element> OwnedArray<T> {
    /// Allocate a new row-major array with the given shape. All elements are zero.
    #[inline]
    pub fn new<D: DimsExt>(shape: D) -> ArrayResult<Self> {
        Self::new_with_order(shape, Order::RowMajor)
    }

    /// Allocate a new array with the given shape and memory order. All elements are zero.
    pub fn new_with_order<D: DimsExt>(shape: D, order: Order) -> ArrayResult<Self> {
        if shape.rank() == 0 {
            Err(ShapeError::ZeroRank)?;
        }

        let size = shape.checked_size()?;
        let buffer = OwnedBuffer::allocate(size)?;
        Self::from_parts(buffer, &shape, order)
    }
}

impl<T> OwnedArray<T> {
    /// Create an array from existing data in the given memory order.
    ///
    /// Returns an error if the number of elements of `shape` differs from the length of `data`.
    pub fn from_vec<D: DimsExt>(data: Vec<T>, shape: D, order: Order) -> ArrayResult<Self> {
        if shape.rank() == 0 {
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

        Self::from_parts(OwnedBuffer::from_vec(data), &shape, order)
    }

    // The size of buffer must be the number of elements of shape, which has rank > 0.
    fn from_parts<D: DimsExt>(
        buffer: OwnedBuffer<T>,
        shape: &D,
        order: Order,
    ) -> ArrayResult<Self> {
        let rank = shape.rank();
        let mut dims: DimBuf = smallvec![0; rank];
        shape.fill_shape(&mut dims, Private);
        let mut strides: DimBuf = smallvec![0; rank];
        strides_for(&dims, order, &mut strides)?;
        let byte_strides = byte_strides_for(&dims, &strides, size_of::<T>())?;

        Ok(OwnedArray {
            buffer,
            dimensions: Dimensions::from_buf(dims),
            strides,
            byte_strides,
            order,
        })
    }

    /// Returns the shape of the array.
    #[inline]
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Returns the shape of the array as a slice.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.dimensions.as_slice()
    }

    /// Returns the strides of the array in elements.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns the memory order of the data.
    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Returns the total number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.buffer.size()
    }

    /// Returns a reference to the element at the given n-dimensional index.
    pub fn get<D: Dims>(&self, idx: D) -> ArrayResult<&T> {
        let offset = checked_offset(self.shape(), &self.strides, &idx)?;
        Ok(&self.buffer.as_slice()[offset])
    }

    /// Returns a mutable reference to the element at the given n-dimensional index.
    pub fn get_mut<D: Dims>(&mut self, idx: D) -> ArrayResult<&mut T> {
        let offset = checked_offset(self.dimensions.as_slice(), &self.strides, &idx)?;
        Ok(&mut self.buffer.as_mut_slice()[offset])
    }

    /// Returns the array's data as a slice, in the array's memory order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.buffer.as_slice()
    }

    /// Returns the array's data as a mutable slice, in the array's memory order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buffer.as_mut_slice()
    }

    /// Create a view of the data with rank `N`.
    ///
    /// Returns an error if the rank of this array isn't `N`.
    pub fn view_mut<const N: usize>(&mut self) -> ArrayResult<ArrayView<'_, T, N>> {
        ArrayView::from_slice_with_order(self.buffer.as_mut_slice(), &self.dimensions, self.order)
    }

    /// Create a view of the data whose rank is only known at runtime.
    pub fn view_dyn_mut(&mut self) -> ArrayViewDyn<'_, T> {
        let data = self.buffer.as_mut_slice();
        // Safety: the layout describes the buffer, which is mutably borrowed.
        unsafe {
            ArrayViewDyn::from_raw_parts(
                NonNull::from(data).cast(),
                self.dimensions.as_slice(),
                &self.strides,
            )
        }
    }

    /// Turn the array into its buffer and shape.
    pub fn into_parts(self) -> (OwnedBuffer<T>, Dimensions) {
        (self.buffer, self.dimensions)
    }
}

impl<T, D: Dims> Index<D> for OwnedArray<T> {
    type Output = T;

    fn index(&self, idx: D) -> &T {
        match self.get(idx) {
            Ok(elem) => elem,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T, D: Dims> IndexMut<D> for OwnedArray<T> {
    fn index_mut(&mut self, idx: D) -> &mut T {
        match self.get_mut(idx) {
            Ok(elem) => elem,
            Err(e) => panic!("{}", e),
        }
    }
}

unsafe impl<T: Element> HostArray for OwnedArray<T> {
    fn descriptor(&mut self) -> ArrayDescriptor<'_> {
        let data = self.buffer.as_mut_slice().as_mut_ptr().cast();
        // Safety: the descriptor mutably borrows the array, the layout describes the buffer.
        unsafe {
            ArrayDescriptor::new(
                self.dimensions.as_slice(),
                &self.byte_strides,
                size_of::<T>(),
                data,
                T::TAG,
            )
        }
    }
}
