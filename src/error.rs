//! Everything related to errors.
//!
//! Every failure is terminal for the operation that caused it, nothing in this crate is retried.
//! The caller is expected to translate an [`ArrayError`] into the error reporting convention of
//! its host.

use std::{error::Error as StdErr, sync::Arc};

use thiserror::Error;

use crate::data::{array::dimensions::Dimensions, types::type_tag::TypeTag};

/// Alias that is used for most `Result`s in this crate.
pub type ArrayResult<T> = Result<T, Box<ArrayError>>;

/// Allocation errors.
#[derive(Debug, Error, Clone)]
pub enum AllocationError {
    #[error("cannot allocate {count} elements of {element_size} bytes: size exceeds isize::MAX")]
    CapacityOverflow { count: usize, element_size: usize },
    #[error("failed to allocate {bytes} bytes")]
    OutOfMemory { bytes: usize },
    #[error("the host failed to allocate an array of {element_type} with shape {shape}: {reason}")]
    Host {
        element_type: &'static str,
        shape: Dimensions,
        reason: String,
    },
}

/// Shape and stride errors.
#[derive(Debug, Error, Clone)]
pub enum ShapeError {
    #[error("rank must be {expected}, got {found}")]
    RankMismatch { expected: usize, found: usize },
    #[error("views must have at least one axis")]
    ZeroRank,
    #[error("expected {rank} strides, got {found}")]
    StrideCountMismatch { rank: usize, found: usize },
    #[error("byte stride {byte_stride} of axis {axis} is negative")]
    NegativeStride { axis: usize, byte_stride: isize },
    #[error("byte stride {byte_stride} of axis {axis} is not a multiple of the element size {element_size}")]
    NonIntegralStride {
        axis: usize,
        byte_stride: isize,
        element_size: usize,
    },
    #[error("shape {shape} needs {expected} elements, buffer has {found}")]
    SizeMismatch {
        shape: Dimensions,
        expected: usize,
        found: usize,
    },
    #[error("the number of elements of shape {shape} overflows usize")]
    SizeOverflow { shape: Dimensions },
    #[error("the data pointer of a non-empty array is null")]
    NullData,
}

/// Index errors.
#[derive(Debug, Error, Clone)]
pub enum IndexError {
    #[error("index {idx} is out-of-bounds for array with shape {shape}")]
    OutOfBounds { idx: Dimensions, shape: Dimensions },
    #[error("index {idx} has rank {found}, array has rank {expected}")]
    RankMismatch {
        idx: Dimensions,
        expected: usize,
        found: usize,
    },
}

/// Element type errors.
#[derive(Debug, Error, Clone)]
pub enum TypeError {
    #[error("the type tag is invalid")]
    InvalidTag,
    #[error("array contains elements of type {found}, which is incompatible with {element_type}")]
    IncompatibleElement {
        element_type: &'static str,
        found: TypeTag,
    },
    #[error("array elements are {found} bytes wide, {element_type} is {expected} bytes wide")]
    ElementSizeMismatch {
        element_type: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("the array data is not aligned to {align} bytes as required by {element_type}")]
    Misaligned {
        element_type: &'static str,
        align: usize,
    },
}

/// All different errors.
#[derive(Debug, Error, Clone)]
pub enum ArrayError {
    #[error("Other: {0}")]
    Other(Arc<dyn StdErr + 'static + Send + Sync>),
    #[error("Allocation error: {0}")]
    AllocationError(AllocationError),
    #[error("Shape error: {0}")]
    ShapeError(ShapeError),
    #[error("Index error: {0}")]
    IndexError(IndexError),
    #[error("Type error: {0}")]
    TypeError(TypeError),
}

impl ArrayError {
    /// Convert an arbitrary error to `ArrayError::Other`.
    #[inline]
    pub fn other<E: StdErr + 'static + Send + Sync>(reason: E) -> Self {
        ArrayError::Other(Arc::new(reason))
    }

    /// Convert an arbitrary error to `Err(ArrayError::Other)`.
    #[inline]
    pub fn other_error<T, E: StdErr + 'static + Send + Sync>(reason: E) -> Result<T, Self> {
        Err(Self::other(reason))
    }
}

macro_rules! impl_from {
    ($type:ident) => {
        impl From<$type> for ArrayError {
            #[inline]
            fn from(e: $type) -> Self {
                ArrayError::$type(e)
            }
        }

        impl From<$type> for Box<ArrayError> {
            #[inline]
            fn from(e: $type) -> Self {
                Box::new(ArrayError::from(e))
            }
        }
    };
}

impl_from!(AllocationError);
impl_from!(ShapeError);
impl_from!(IndexError);
impl_from!(TypeError);
