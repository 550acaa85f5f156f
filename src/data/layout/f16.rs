//! Layout type for `f16`.
//!
//! This module is only available if the `f16` feature has been enabled.

pub use half::f16;

use crate::data::types::{element::impl_element, type_tag::TypeTag};

impl_element!(f16, TypeTag::F16);

#[cfg(test)]
mod tests {
    use super::f16;
    use crate::data::types::{element::Element, type_tag::TypeTag};

    #[test]
    fn f16_layout() {
        assert_eq!(f16::TAG, TypeTag::F16);
        assert_eq!(f16::info().size, std::mem::size_of::<f16>());
        assert_eq!(f16::info().align, std::mem::align_of::<f16>());
        assert!(!f16::accepts(TypeTag::U16));
    }
}
