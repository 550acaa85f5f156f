//! Map Rust element types to runtime type tags.
//!
//! The registry maps a [`TypeTag`] to the metadata of a type, [`Element`] maps a Rust type to its
//! tag. Numerical routines are written for concrete element types, the import path uses this
//! trait to check that an array described by a host contains elements of the expected type.

use crate::data::types::type_tag::{lookup, TypeInfo, TypeTag};

/// A type that can be the element type of an array.
///
/// Safety: `TAG` must describe a type with the same size, alignment and bit validity as `Self`.
pub unsafe trait Element: Copy + Default + 'static {
    /// The tag of this type.
    const TAG: TypeTag;

    /// Returns the registry record of this type.
    #[inline]
    fn info() -> &'static TypeInfo {
        lookup(Self::TAG)
    }

    /// Returns `true` if data described by `tag` can be accessed as `Self`.
    ///
    /// This is the case if `tag` is `Self::TAG`, or if the layout of `tag` is identical to that
    /// of `Self::TAG`.
    #[inline]
    fn accepts(tag: TypeTag) -> bool {
        tag == Self::TAG || lookup(tag).is_layout_compatible(Self::info())
    }

    /// Returns the name of this type.
    #[inline]
    fn type_name() -> &'static str {
        Self::info().name
    }
}

macro_rules! impl_element {
    ($type:ty, $tag:expr) => {
        unsafe impl $crate::data::types::element::Element for $type {
            const TAG: $crate::data::types::type_tag::TypeTag = $tag;
        }
    };
}

pub(crate) use impl_element;

impl_element!(i8, TypeTag::I8);
impl_element!(i16, TypeTag::I16);
impl_element!(i32, TypeTag::I32);
impl_element!(i64, TypeTag::I64);
impl_element!(u8, TypeTag::U8);
impl_element!(u16, TypeTag::U16);
impl_element!(u32, TypeTag::U32);
impl_element!(u64, TypeTag::U64);
impl_element!(usize, TypeTag::USize);
impl_element!(f32, TypeTag::F32);
impl_element!(f64, TypeTag::F64);
impl_element!(bool, TypeTag::Bool);

#[cfg(target_pointer_width = "64")]
impl_element!(isize, TypeTag::I64);
#[cfg(target_pointer_width = "32")]
impl_element!(isize, TypeTag::I32);

#[cfg(test)]
mod tests {
    use std::{
        mem::{align_of, size_of},
        os::raw::c_int,
    };

    use super::Element;
    use crate::data::types::type_tag::TypeTag;

    fn check_layout<T: Element>() {
        assert_eq!(T::info().size, size_of::<T>(), "{}", T::type_name());
        assert_eq!(T::info().align, align_of::<T>(), "{}", T::type_name());
    }

    #[test]
    fn layouts_match() {
        check_layout::<i8>();
        check_layout::<i16>();
        check_layout::<i32>();
        check_layout::<i64>();
        check_layout::<isize>();
        check_layout::<u8>();
        check_layout::<u16>();
        check_layout::<u32>();
        check_layout::<u64>();
        check_layout::<usize>();
        check_layout::<f32>();
        check_layout::<f64>();
        check_layout::<bool>();
    }

    #[test]
    fn accepts_own_tag() {
        assert!(f64::accepts(TypeTag::F64));
        assert!(!f64::accepts(TypeTag::F32));
        assert!(!f64::accepts(TypeTag::I64));
        assert!(!f64::accepts(TypeTag::Invalid));
        assert!(!bool::accepts(TypeTag::U8));
    }

    #[test]
    fn accepts_c_types() {
        if size_of::<c_int>() == 4 {
            assert!(i32::accepts(TypeTag::Int));
        }
        assert!(usize::accepts(TypeTag::USize));
        if size_of::<usize>() == 8 {
            assert!(u64::accepts(TypeTag::USize));
        }
    }
}
