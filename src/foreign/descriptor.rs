//! Descriptions of arrays owned by a host.
//!
//! An [`ArrayDescriptor`] is the in-process contract between a host and this crate. It describes
//! the rank, shape, byte strides, element size and element type of a foreign array, and points to
//! its data. Views are created by importing a descriptor, which converts the byte strides to
//! element strides and checks the element type, but never copies the data.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    marker::PhantomData,
    mem::{align_of, size_of},
    ptr::NonNull,
};

use log::debug;

use crate::{
    data::{
        array::dimensions::{strides_from_bytes, Dims, DimsExt},
        types::{element::Element, type_tag::TypeTag},
    },
    error::{ArrayResult, ShapeError, TypeError},
};

/// Describes an n-dimensional array owned by a host.
///
/// The rank of the array is the length of its shape. Strides are expressed in bytes and must be
/// non-negative to be imported. A descriptor can be imported once: importing consumes it, so two
/// views can never be created from the same descriptor.
pub struct ArrayDescriptor<'data> {
    shape: &'data [usize],
    byte_strides: &'data [isize],
    element_size: usize,
    data: *mut u8,
    type_tag: TypeTag,
    _marker: PhantomData<&'data mut [u8]>,
}

impl<'data> ArrayDescriptor<'data> {
    /// Describe an array with the given layout.
    ///
    /// Safety: for every index that is in bounds for `shape`, `data` plus the dot product of that
    /// index and `byte_strides` must point to an initialized element of type `type_tag` and size
    /// `element_size`, which must remain valid for reads and writes, and must not be accessed
    /// through anything but the view created from this descriptor, for the lifetime `'data`.
    #[inline]
    pub unsafe fn new(
        shape: &'data [usize],
        byte_strides: &'data [isize],
        element_size: usize,
        data: *mut u8,
        type_tag: TypeTag,
    ) -> Self {
        ArrayDescriptor {
            shape,
            byte_strides,
            element_size,
            data,
            type_tag,
            _marker: PhantomData,
        }
    }

    /// Describe a mutably borrowed slice as an array with the given shape and byte strides.
    ///
    /// Fails if a stride is negative or if an element addressed by the shape and strides lies
    /// outside of `data`.
    pub fn from_slice<T: Element>(
        data: &'data mut [T],
        shape: &'data [usize],
        byte_strides: &'data [isize],
    ) -> ArrayResult<Self> {
        if shape.len() != byte_strides.len() {
            Err(ShapeError::StrideCountMismatch {
                rank: shape.len(),
                found: byte_strides.len(),
            })?;
        }

        let size = shape.checked_size()?;
        if size != 0 {
            let mut last = 0usize;
            for (axis, (&n, &byte_stride)) in shape.iter().zip(byte_strides).enumerate() {
                if byte_stride < 0 {
                    Err(ShapeError::NegativeStride { axis, byte_stride })?;
                }

                last = (n - 1)
                    .checked_mul(byte_stride as usize)
                    .and_then(|offset| last.checked_add(offset))
                    .ok_or_else(|| ShapeError::SizeOverflow {
                        shape: shape.into_dimensions(),
                    })?;
            }

            let end = last
                .checked_add(size_of::<T>())
                .ok_or_else(|| ShapeError::SizeOverflow {
                    shape: shape.into_dimensions(),
                })?;

            // A slice never holds more than isize::MAX bytes.
            let available = data.len() * size_of::<T>();
            if end > available {
                Err(ShapeError::SizeMismatch {
                    shape: shape.into_dimensions(),
                    expected: last / size_of::<T>() + 1,
                    found: data.len(),
                })?;
            }
        }

        // Safety: every addressed element lies in `data`, which is mutably borrowed for 'data.
        unsafe {
            Ok(ArrayDescriptor::new(
                shape,
                byte_strides,
                size_of::<T>(),
                data.as_mut_ptr().cast(),
                T::TAG,
            ))
        }
    }

    /// Returns the rank of the array.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the shape of the array.
    #[inline]
    pub fn shape(&self) -> &'data [usize] {
        self.shape
    }

    /// Returns the strides of the array in bytes.
    #[inline]
    pub fn byte_strides(&self) -> &'data [isize] {
        self.byte_strides
    }

    /// Returns the size of an element in bytes.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Returns the tag of the element type.
    #[inline]
    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// Returns a pointer to the first element.
    #[inline]
    pub fn data(&self) -> *mut u8 {
        self.data
    }

    /// Check that the elements can be accessed as `T`, convert the byte strides to element
    /// strides, and return the data pointer.
    ///
    /// `strides` must have the same length as the shape of this descriptor.
    pub(crate) fn import_parts<T: Element>(
        &self,
        strides: &mut [usize],
    ) -> ArrayResult<NonNull<T>> {
        if self.byte_strides.len() != self.rank() {
            Err(ShapeError::StrideCountMismatch {
                rank: self.rank(),
                found: self.byte_strides.len(),
            })?;
        }

        if !T::accepts(self.type_tag) {
            Err(TypeError::IncompatibleElement {
                element_type: T::type_name(),
                found: self.type_tag,
            })?;
        }

        if self.element_size != size_of::<T>() {
            Err(TypeError::ElementSizeMismatch {
                element_type: T::type_name(),
                expected: size_of::<T>(),
                found: self.element_size,
            })?;
        }

        strides_from_bytes(self.byte_strides, self.element_size, strides)?;

        let data = if self.shape.size() == 0 {
            NonNull::new(self.data.cast::<T>()).unwrap_or(NonNull::dangling())
        } else {
            NonNull::new(self.data.cast::<T>()).ok_or(ShapeError::NullData)?
        };

        if data.as_ptr() as usize % align_of::<T>() != 0 {
            Err(TypeError::Misaligned {
                element_type: T::type_name(),
                align: align_of::<T>(),
            })?;
        }

        debug!(
            "importing array of {} with shape {:?} and strides {:?}",
            T::type_name(),
            self.shape,
            strides
        );

        Ok(data)
    }
}

impl Debug for ArrayDescriptor<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ArrayDescriptor")
            .field("shape", &self.shape)
            .field("byte_strides", &self.byte_strides)
            .field("element_size", &self.element_size)
            .field("type_tag", &self.type_tag)
            .finish()
    }
}
