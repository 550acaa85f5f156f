//! inmet-array is the array layer used by the native routines of the INMET InSAR toolbox. It lets
//! numerical code address n-dimensional, strided buffers that are owned by a host environment
//! through a uniform, type-safe view, and maps between compile-time element types and the runtime
//! type tags a host uses to describe its arrays.
//!
//! # Overview
//!
//! The crate is made up of a few small parts:
//!
//!  - A closed registry of element types. Every supported primitive type has a [`TypeTag`] and an
//!    immutable [`TypeInfo`] record with its size, alignment and value range. Looking up a tag
//!    never fails, unknown tags resolve to a sentinel record.
//!  - [`OwnedBuffer`], a single-owner heap allocation of elements that is used when a view must
//!    be backed by newly allocated memory.
//!  - Two kinds of strided views: [`ArrayView`], whose rank is known at compile time, and
//!    [`ArrayViewDyn`], whose rank is determined when it's created. Both address memory they
//!    don't own with strides expressed in elements, and never copy.
//!  - The host interface in [`foreign`]: an [`ArrayDescriptor`] describes a foreign array, the
//!    [`HostAllocator`] trait lets a host allocate new arrays, and [`Release`] is the capability
//!    through which foreign resources are released exactly once.
//!
//! # Creating views
//!
//! A view can be created in three ways. The first is to allocate new data, in which case the
//! strides are derived from the shape:
//!
//! ```
//! use inmet_array::prelude::*;
//!
//! # fn main() -> ArrayResult<()> {
//! let mut array = OwnedArray::<f64>::new([3, 4])?;
//! let mut view = array.view_mut::<2>()?;
//! view[(1, 2)] = 3.0;
//! assert_eq!(view.strides(), &[4, 1]);
//! assert_eq!(view[[1, 2]], 3.0);
//! # Ok(())
//! # }
//! ```
//!
//! The second is importing an array described by the host with an [`ArrayDescriptor`]. The byte
//! strides of the descriptor are converted to element strides, the data itself is used directly.
//! The third is exporting a new array: a [`HostAllocator`] allocates a new foreign array which is
//! then imported.
//!
//! # Features
//!
//!  - `f16`: use `half::f16` as an element type.
//!  - `complex`: use `num_complex::Complex<f32>` and `Complex<f64>` as element types.
//!  - `ndarray`: borrow views as `ndarray::ArrayView` and `ArrayViewMut`.
//!  - `bounds-check`: check indices in `get_unchecked` and `get_unchecked_mut` even in release
//!    builds.
//!
//! [`TypeTag`]: crate::data::types::type_tag::TypeTag
//! [`TypeInfo`]: crate::data::types::type_tag::TypeInfo
//! [`OwnedBuffer`]: crate::memory::buffer::OwnedBuffer
//! [`ArrayView`]: crate::data::array::view::ArrayView
//! [`ArrayViewDyn`]: crate::data::array::dyn_view::ArrayViewDyn
//! [`ArrayDescriptor`]: crate::foreign::descriptor::ArrayDescriptor
//! [`HostAllocator`]: crate::foreign::host::HostAllocator
//! [`Release`]: crate::memory::release::Release

pub mod data;
pub mod error;
pub mod foreign;
pub mod memory;
pub mod prelude;
pub(crate) mod private;
