//! N-dimensional shapes, indices and strides.
//!
//! In order to access the data of an n-dimensional view, you'll need to use an n-dimensional
//! index. This functionality is provided by the [`Dims`] trait, any implementor of this trait
//! can be used as an n-dimensional index. The most important implementations are tuples (up to
//! and including four dimensions), and arrays and array slices of any number of dimensions. So,
//! if you want to access the third column of the second row of a view, you can use both `[1, 2]`
//! or `(1, 2)`.
//!
//! The same types are used to describe the shape of a new array. Shapes that are passed to
//! constructors must implement [`DimsExt`], which additionally exposes the rank at compile time
//! when it's known.
//!
//! Strides are always expressed in elements. Freshly allocated arrays are row-major by default,
//! the last axis varies fastest:
//!
//! ```
//! use inmet_array::data::array::dimensions::{strides_for, Order};
//!
//! let mut strides = [0; 3];
//! strides_for(&[2, 3, 4], Order::RowMajor, &mut strides).unwrap();
//! assert_eq!(strides, [12, 4, 1]);
//!
//! strides_for(&[2, 3, 4], Order::ColumnMajor, &mut strides).unwrap();
//! assert_eq!(strides, [1, 2, 6]);
//! ```

use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    marker::PhantomData,
};

use log::trace;
use smallvec::SmallVec;

use crate::{error::ShapeError, private::Private};

/// The number of dimensions that are stored inline before shape and stride metadata spills to the
/// heap.
pub const INLINE_RANK: usize = 4;

pub(crate) type DimBuf = SmallVec<[usize; INLINE_RANK]>;

/// The memory order of a freshly allocated array.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// The last axis varies fastest (C order).
    #[default]
    RowMajor,
    /// The first axis varies fastest (Fortran order).
    ColumnMajor,
}

pub trait Dims: Sized + Debug {
    /// Returns the rank of this index.
    fn rank(&self) -> usize;

    /// Returns the number of elements of the nth dimension. Indexing starts at 0.
    fn n_elements(&self, dimension: usize) -> usize;

    /// The total number of elements in the array, i.e. the product of the number of elements of
    /// each dimension.
    #[inline]
    fn size(&self) -> usize {
        (0..self.rank()).map(|i| self.n_elements(i)).product()
    }

    /// Convert `Self` to `Dimensions`.
    ///
    /// The default implementation must not be overridden.
    fn into_dimensions(&self) -> Dimensions {
        Dimensions::from_dims(self)
    }
}

/// Trait implemented by types that can be used as the shape of a new array.
pub trait DimsExt: private::DimsPriv + Dims {
    /// The rank of an array with this shape.
    ///
    /// This constant is -1 if the rank is not known at compile-time.
    const RANK: isize;

    #[doc(hidden)]
    fn fill_shape(&self, shape: &mut [usize], _: Private) {
        for (i, n) in shape.iter_mut().enumerate() {
            *n = self.n_elements(i);
        }
    }

    /// The total number of elements, or an error if it doesn't fit in a `usize`.
    fn checked_size(&self) -> Result<usize, ShapeError> {
        (0..self.rank()).try_fold(1usize, |acc, i| {
            acc.checked_mul(self.n_elements(i))
                .ok_or_else(|| ShapeError::SizeOverflow {
                    shape: self.into_dimensions(),
                })
        })
    }
}

// Used to reject shapes and indices whose rank is known to be wrong at compile time.
pub(crate) struct DimsRankAssert<D: Dims, const N: usize>(PhantomData<D>);

impl<D: DimsExt, const N: usize> DimsRankAssert<D, N> {
    pub(crate) const ASSERT_VALID_RANK: () =
        assert!(D::RANK == -1 || D::RANK == N as isize, "shape has the wrong rank");
}

pub(crate) struct RankAssert<const N: usize>;

impl<const N: usize> RankAssert<N> {
    pub(crate) const ASSERT_NON_ZERO: () = assert!(N >= 1, "views must have at least one axis");
}

/// Write the strides of a contiguous array with the given shape and order to `strides`.
///
/// `strides` must have the same length as `shape`. Fails if a stride doesn't fit in a `usize`,
/// which can happen for shapes without elements like `[0, usize::MAX, 2]`.
pub fn strides_for(
    shape: &[usize],
    order: Order,
    strides: &mut [usize],
) -> Result<(), ShapeError> {
    debug_assert_eq!(shape.len(), strides.len());
    let rank = shape.len();
    if rank == 0 {
        return Ok(());
    }

    let overflow = || ShapeError::SizeOverflow {
        shape: Dimensions::from(shape),
    };

    match order {
        Order::RowMajor => {
            strides[rank - 1] = 1;
            for i in (0..rank - 1).rev() {
                strides[i] = strides[i + 1]
                    .checked_mul(shape[i + 1])
                    .ok_or_else(overflow)?;
            }
        }
        Order::ColumnMajor => {
            strides[0] = 1;
            for i in 1..rank {
                strides[i] = strides[i - 1]
                    .checked_mul(shape[i - 1])
                    .ok_or_else(overflow)?;
            }
        }
    }

    Ok(())
}

// Converts element strides to byte strides, failing if a byte stride doesn't fit in an `isize`.
pub(crate) fn byte_strides_for(
    shape: &[usize],
    strides: &[usize],
    element_size: usize,
) -> Result<SmallVec<[isize; INLINE_RANK]>, ShapeError> {
    strides
        .iter()
        .map(|&s| {
            s.checked_mul(element_size)
                .and_then(|bytes| isize::try_from(bytes).ok())
                .ok_or_else(|| ShapeError::SizeOverflow {
                    shape: Dimensions::from(shape),
                })
        })
        .collect()
}

/// Convert strides in bytes to strides in elements of `element_size` bytes.
///
/// Only exact conversions are accepted: a negative stride or a stride that is not a multiple of
/// the element size is an error. `strides` may have been partially written when an error is
/// returned.
pub fn strides_from_bytes(
    byte_strides: &[isize],
    element_size: usize,
    strides: &mut [usize],
) -> Result<(), ShapeError> {
    if byte_strides.len() != strides.len() {
        return Err(ShapeError::StrideCountMismatch {
            rank: strides.len(),
            found: byte_strides.len(),
        });
    }

    for (axis, (&byte_stride, stride)) in byte_strides.iter().zip(strides.iter_mut()).enumerate() {
        if byte_stride < 0 {
            return Err(ShapeError::NegativeStride { axis, byte_stride });
        }

        let bytes = byte_stride as usize;
        if element_size == 0 || bytes % element_size != 0 {
            return Err(ShapeError::NonIntegralStride {
                axis,
                byte_stride,
                element_size,
            });
        }

        *stride = bytes / element_size;
        trace!("axis {}: {} bytes -> {} elements", axis, byte_stride, *stride);
    }

    Ok(())
}

/// Returns `true` if `strides` are the contiguous strides of `shape` in the given order.
///
/// Axes of length 1 can have any stride, arrays without elements are always contiguous.
pub fn is_contiguous(shape: &[usize], strides: &[usize], order: Order) -> bool {
    if shape.len() != strides.len() {
        return false;
    }

    if shape.iter().any(|&n| n == 0) {
        return true;
    }

    let mut expected = 1;
    let mut check = |i: usize| {
        let ok = shape[i] == 1 || strides[i] == expected;
        expected *= shape[i];
        ok
    };

    match order {
        Order::RowMajor => (0..shape.len()).rev().all(&mut check),
        Order::ColumnMajor => (0..shape.len()).all(&mut check),
    }
}

impl Dims for usize {
    #[inline]
    fn rank(&self) -> usize {
        1
    }

    #[inline]
    fn n_elements(&self, dimension: usize) -> usize {
        if dimension == 0 {
            *self
        } else {
            0
        }
    }
}

impl DimsExt for usize {
    const RANK: isize = 1;
}

impl Dims for (usize,) {
    #[inline]
    fn rank(&self) -> usize {
        1
    }

    #[inline]
    fn n_elements(&self, dimension: usize) -> usize {
        if dimension == 0 {
            self.0
        } else {
            0
        }
    }
}

impl DimsExt for (usize,) {
    const RANK: isize = 1;
}

impl Dims for (usize, usize) {
    #[inline]
    fn rank(&self) -> usize {
        2
    }

    #[inline]
    fn n_elements(&self, dimension: usize) -> usize {
        match dimension {
            0 => self.0,
            1 => self.1,
            _ => 0,
        }
    }
}

impl DimsExt for (usize, usize) {
    const RANK: isize = 2;
}

impl Dims for (usize, usize, usize) {
    #[inline]
    fn rank(&self) -> usize {
        3
    }

    #[inline]
    fn n_elements(&self, dimension: usize) -> usize {
        match dimension {
            0 => self.0,
            1 => self.1,
            2 => self.2,
            _ => 0,
        }
    }
}

impl DimsExt for (usize, usize, usize) {
    const RANK: isize = 3;
}

impl Dims for (usize, usize, usize, usize) {
    #[inline]
    fn rank(&self) -> usize {
        4
    }

    #[inline]
    fn n_elements(&self, dimension: usize) -> usize {
        match dimension {
            0 => self.0,
            1 => self.1,
            2 => self.2,
            3 => self.3,
            _ => 0,
        }
    }
}

impl DimsExt for (usize, usize, usize, usize) {
    const RANK: isize = 4;
}

impl<const N: usize> Dims for [usize; N] {
    #[inline]
    fn rank(&self) -> usize {
        N
    }

    #[inline]
    fn n_elements(&self, dim: usize) -> usize {
        if dim < N {
            self[dim]
        } else {
            0
        }
    }
}

impl<const N: usize> DimsExt for [usize; N] {
    const RANK: isize = N as isize;

    #[inline]
    fn fill_shape(&self, shape: &mut [usize], _: Private) {
        shape.copy_from_slice(self);
    }
}

impl<const N: usize> Dims for &[usize; N] {
    #[inline]
    fn rank(&self) -> usize {
        N
    }

    #[inline]
    fn n_elements(&self, dim: usize) -> usize {
        if dim < N {
            self[dim]
        } else {
            0
        }
    }
}

impl<const N: usize> DimsExt for &[usize; N] {
    const RANK: isize = N as isize;

    #[inline]
    fn fill_shape(&self, shape: &mut [usize], _: Private) {
        shape.copy_from_slice(*self);
    }
}

impl Dims for &[usize] {
    #[inline]
    fn rank(&self) -> usize {
        self.len()
    }

    #[inline]
    fn n_elements(&self, dim: usize) -> usize {
        if dim < self.len() {
            self[dim]
        } else {
            0
        }
    }
}

impl DimsExt for &[usize] {
    const RANK: isize = -1;

    #[inline]
    fn fill_shape(&self, shape: &mut [usize], _: Private) {
        shape.copy_from_slice(self);
    }
}

/// An owned n-dimensional shape or index.
///
/// Up to [`INLINE_RANK`] dimensions are stored inline, larger ranks are stored on the heap.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Dimensions(DimBuf);

impl Dimensions {
    /// Convert an implementation of `Dims` to `Dimensions`.
    pub fn from_dims<D: Dims>(dims: &D) -> Self {
        Dimensions((0..dims.rank()).map(|i| dims.n_elements(i)).collect())
    }

    /// Returns the dimensions as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Returns `true` if the dimensions are stored on the heap.
    #[inline]
    pub fn spilled(&self) -> bool {
        self.0.spilled()
    }

    #[inline]
    pub(crate) fn from_buf(buf: DimBuf) -> Self {
        Dimensions(buf)
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [usize] {
        &mut self.0
    }
}

impl Dims for Dimensions {
    #[inline]
    fn rank(&self) -> usize {
        self.0.len()
    }

    #[inline]
    fn n_elements(&self, dim: usize) -> usize {
        self.0.get(dim).copied().unwrap_or(0)
    }
}

impl Dims for &Dimensions {
    #[inline]
    fn rank(&self) -> usize {
        self.0.len()
    }

    #[inline]
    fn n_elements(&self, dim: usize) -> usize {
        self.0.get(dim).copied().unwrap_or(0)
    }
}

impl DimsExt for &Dimensions {
    const RANK: isize = -1;

    #[inline]
    fn fill_shape(&self, shape: &mut [usize], _: Private) {
        shape.copy_from_slice(self.as_slice());
    }
}

impl From<&[usize]> for Dimensions {
    fn from(dims: &[usize]) -> Self {
        Dimensions(DimBuf::from_slice(dims))
    }
}

impl Debug for Dimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut f = f.debug_tuple("Dimensions");

        for d in self.as_slice() {
            f.field(&d);
        }

        f.finish()
    }
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut f = f.debug_tuple("");

        for d in self.as_slice() {
            f.field(&d);
        }

        f.finish()
    }
}

pub(crate) mod private {
    use super::Dimensions;

    pub trait DimsPriv {}

    impl DimsPriv for usize {}

    impl DimsPriv for (usize,) {}

    impl DimsPriv for (usize, usize) {}

    impl DimsPriv for (usize, usize, usize) {}

    impl DimsPriv for (usize, usize, usize, usize) {}

    impl<const N: usize> DimsPriv for [usize; N] {}

    impl<const N: usize> DimsPriv for &[usize; N] {}

    impl DimsPriv for &[usize] {}

    impl DimsPriv for &Dimensions {}
}

#[cfg(test)]
mod tests {
    use super::{
        byte_strides_for, is_contiguous, strides_for, strides_from_bytes, Dimensions, Dims, DimsExt,
        Order,
    };
    use crate::error::ShapeError;

    #[test]
    fn convert_usize() {
        let d: Dimensions = 4.into_dimensions();
        assert_eq!(d.rank(), 1);
        assert_eq!(d.n_elements(0), 4);
        assert_eq!(d.size(), 4);
    }

    #[test]
    fn convert_tuple_2d() {
        let d: Dimensions = (4, 3).into_dimensions();
        assert_eq!(d.rank(), 2);
        assert_eq!(d.n_elements(0), 4);
        assert_eq!(d.n_elements(1), 3);
        assert_eq!(d.n_elements(2), 0);
        assert_eq!(d.size(), 12);
    }

    #[test]
    fn convert_tuple_4d() {
        let d: Dimensions = (4, 3, 2, 1).into_dimensions();
        assert_eq!(d.rank(), 4);
        assert_eq!(d.size(), 24);
        assert!(!d.spilled());
    }

    #[test]
    fn convert_slice_5d_spills() {
        let d: Dimensions = (&[4, 3, 2, 1, 2][..]).into_dimensions();
        assert_eq!(d.rank(), 5);
        assert_eq!(d.n_elements(4), 2);
        assert_eq!(d.size(), 48);
        assert!(d.spilled());
    }

    #[test]
    fn display_dimensions() {
        let d: Dimensions = [3, 4].into_dimensions();
        assert_eq!(format!("{}", d), "(3, 4)");
        assert_eq!(format!("{:?}", d), "Dimensions(3, 4)");
    }

    #[test]
    fn zero_dimension_has_no_elements() {
        let d: Dimensions = [0, 5].into_dimensions();
        assert_eq!(d.size(), 0);
    }

    #[test]
    fn checked_size_overflows() {
        assert!([usize::MAX, 2].checked_size().is_err());
        assert_eq!([3, 4].checked_size().unwrap(), 12);
    }

    #[test]
    fn row_major_strides() {
        for shape in [&[7][..], &[3, 4], &[2, 3, 4], &[5, 1, 2, 3, 2]] {
            let mut strides = vec![0; shape.len()];
            strides_for(shape, Order::RowMajor, &mut strides).unwrap();

            let r = shape.len();
            assert_eq!(strides[r - 1], 1);
            for i in 0..r - 1 {
                assert_eq!(strides[i], strides[i + 1] * shape[i + 1]);
            }
            assert!(is_contiguous(shape, &strides, Order::RowMajor));
        }
    }

    #[test]
    fn column_major_strides() {
        for shape in [&[7][..], &[3, 4], &[2, 3, 4], &[5, 1, 2, 3, 2]] {
            let mut strides = vec![0; shape.len()];
            strides_for(shape, Order::ColumnMajor, &mut strides).unwrap();

            assert_eq!(strides[0], 1);
            for i in 1..shape.len() {
                assert_eq!(strides[i], strides[i - 1] * shape[i - 1]);
            }
            assert!(is_contiguous(shape, &strides, Order::ColumnMajor));
        }
    }

    #[test]
    fn strides_of_empty_shape_overflow() {
        let shape = [0, usize::MAX, 2];
        let mut strides = [0; 3];
        let err = strides_for(&shape, Order::RowMajor, &mut strides).unwrap_err();
        assert!(matches!(err, ShapeError::SizeOverflow { .. }));

        let shape = [2, usize::MAX, 0];
        let err = strides_for(&shape, Order::ColumnMajor, &mut strides).unwrap_err();
        assert!(matches!(err, ShapeError::SizeOverflow { .. }));

        strides_for(&[0, 5, 2], Order::RowMajor, &mut strides).unwrap();
        assert_eq!(strides, [10, 2, 1]);
    }

    #[test]
    fn byte_strides_overflow() {
        let shape = [2, 2];
        assert_eq!(byte_strides_for(&shape, &[2, 1], 8).unwrap().as_slice(), &[16, 8]);
        assert!(byte_strides_for(&shape, &[usize::MAX / 4, 1], 8).is_err());
        assert!(byte_strides_for(&shape, &[isize::MAX as usize, 1], 2).is_err());
    }

    #[test]
    fn exact_byte_stride_conversion() {
        let mut strides = [0; 3];
        strides_from_bytes(&[96, 32, 8], 8, &mut strides).unwrap();
        assert_eq!(strides, [12, 4, 1]);

        strides_from_bytes(&[0, 4, 4], 4, &mut strides).unwrap();
        assert_eq!(strides, [0, 1, 1]);
    }

    #[test]
    fn inexact_byte_stride_is_rejected() {
        let mut strides = [0; 2];
        let err = strides_from_bytes(&[12, 6], 4, &mut strides).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::NonIntegralStride {
                axis: 1,
                byte_stride: 6,
                element_size: 4
            }
        ));
    }

    #[test]
    fn negative_byte_stride_is_rejected() {
        let mut strides = [0; 2];
        let err = strides_from_bytes(&[-8, 4], 4, &mut strides).unwrap_err();
        assert!(matches!(err, ShapeError::NegativeStride { axis: 0, .. }));
    }

    #[test]
    fn stride_count_must_match() {
        let mut strides = [0; 2];
        let err = strides_from_bytes(&[8, 4, 4], 4, &mut strides).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::StrideCountMismatch { rank: 2, found: 3 }
        ));
    }

    #[test]
    fn transposed_is_not_row_major() {
        assert!(!is_contiguous(&[3, 2], &[1, 3], Order::RowMajor));
        assert!(is_contiguous(&[3, 2], &[1, 3], Order::ColumnMajor));
    }
}
