//! N-dimensional strided views and owned arrays.
//!
//! The central type of this module is the view. A view borrows a block of memory and interprets
//! it as an n-dimensional array with a shape and strides, it never owns or copies the data. Two
//! kinds of views exist: [`ArrayView`] has a rank that is known at compile time and stores its
//! shape and strides in fixed-size arrays, [`ArrayViewDyn`] has a rank that is only known at
//! runtime and stores its metadata inline for ranks up to
//! [`INLINE_RANK`](dimensions::INLINE_RANK).
//!
//! Views can be created from three sources: a buffer or slice owned by Rust, an
//! [`ArrayDescriptor`] that describes an array owned by a host, or an [`OwnedArray`]. Elements can
//! be accessed with anything that implements [`Dims`], for example a tuple `(row, col)` or an
//! array `[row, col]`:
//!
//! - `get` and `get_mut` check the index and return an [`IndexError`] if it's invalid.
//! - Indexing with `view[idx]` checks the index and panics if it's invalid.
//! - `get_unchecked` and `get_unchecked_mut` only check the index when debug assertions or the
//!   `bounds-check` feature are enabled.
//!
//! [`ArrayDescriptor`]: crate::foreign::descriptor::ArrayDescriptor
//! [`IndexError`]: crate::error::IndexError

pub mod dimensions;
pub mod dyn_view;
#[cfg(feature = "ndarray")]
pub mod ndarray;
pub mod owned;
pub mod view;

use cfg_if::cfg_if;

use self::dimensions::{Dimensions, Dims};
use crate::error::IndexError;
pub use self::{dyn_view::ArrayViewDyn, owned::OwnedArray, view::ArrayView};

// Computes the offset of `index` in elements after checking its rank and bounds.
pub(crate) fn checked_offset<D: Dims>(
    shape: &[usize],
    strides: &[usize],
    index: &D,
) -> Result<usize, IndexError> {
    let rank = shape.len();
    if index.rank() != rank {
        return Err(IndexError::RankMismatch {
            idx: index.into_dimensions(),
            expected: rank,
            found: index.rank(),
        });
    }

    let mut offset = 0;
    for (axis, (&n, &stride)) in shape.iter().zip(strides).enumerate() {
        let i = index.n_elements(axis);
        if i >= n {
            return Err(IndexError::OutOfBounds {
                idx: index.into_dimensions(),
                shape: Dimensions::from(shape),
            });
        }

        offset += i * stride;
    }

    Ok(offset)
}

#[inline]
pub(crate) fn unchecked_offset<D: Dims>(shape: &[usize], strides: &[usize], index: &D) -> usize {
    cfg_if! {
        if #[cfg(any(debug_assertions, feature = "bounds-check"))] {
            match checked_offset(shape, strides, index) {
                Ok(offset) => offset,
                Err(e) => panic!("{}", e),
            }
        } else {
            let _ = shape;
            strides
                .iter()
                .enumerate()
                .map(|(axis, stride)| index.n_elements(axis) * stride)
                .sum()
        }
    }
}

// Calls `f` with the offset of every element in row-major index order.
pub(crate) fn for_each_offset(shape: &[usize], strides: &[usize], mut f: impl FnMut(usize)) {
    if shape.iter().any(|&n| n == 0) {
        return;
    }

    let rank = shape.len();
    let mut index: dimensions::DimBuf = smallvec::smallvec![0; rank];
    let mut offset = 0;

    loop {
        f(offset);

        let mut axis = rank;
        loop {
            if axis == 0 {
                return;
            }

            axis -= 1;
            index[axis] += 1;
            offset += strides[axis];
            if index[axis] < shape[axis] {
                break;
            }

            offset -= strides[axis] * shape[axis];
            index[axis] = 0;
        }
    }
}
