mod util;

mod tests {
    use std::mem::{align_of, size_of};

    use inmet_array::{
        data::types::type_tag::{lookup, lookup_raw, Limit, TypeTag},
        prelude::*,
    };

    fn check_element<T: Element>() {
        let info = T::info();
        assert_eq!(info.size, size_of::<T>(), "{}", T::type_name());
        assert_eq!(info.align, align_of::<T>(), "{}", T::type_name());
        assert!(T::accepts(T::TAG));
    }

    #[test]
    fn valid_tags_have_elements() {
        for tag in TypeTag::ALL {
            assert!(lookup(tag).size > 0, "{}", tag);
            assert!(lookup(tag).align > 0, "{}", tag);
            assert_eq!(TypeTag::from_raw(tag.as_raw()), tag);
        }
    }

    #[test]
    fn invalid_tags_share_sentinel() {
        let sentinel = lookup(TypeTag::Invalid);
        assert_eq!(sentinel.size, 0);
        assert_eq!(sentinel.name, "invalid");
        assert!(std::ptr::eq(lookup_raw(0), sentinel));
        assert!(std::ptr::eq(lookup_raw(-1), sentinel));
        assert!(std::ptr::eq(lookup_raw(TypeTag::COUNT as i32), sentinel));
        assert!(std::ptr::eq(lookup_raw(1000), sentinel));
    }

    #[test]
    fn primitive_layouts() {
        check_element::<i8>();
        check_element::<i16>();
        check_element::<i32>();
        check_element::<i64>();
        check_element::<isize>();
        check_element::<u8>();
        check_element::<u16>();
        check_element::<u32>();
        check_element::<u64>();
        check_element::<usize>();
        check_element::<f32>();
        check_element::<f64>();
        check_element::<bool>();
    }

    #[test]
    #[cfg(feature = "f16")]
    fn f16_layout() {
        check_element::<half::f16>();
        assert_eq!(<half::f16 as Element>::TAG, TypeTag::F16);
    }

    #[test]
    #[cfg(feature = "complex")]
    fn complex_layouts() {
        use num_complex::Complex;

        check_element::<Complex<f32>>();
        check_element::<Complex<f64>>();
        assert!(!<Complex<f32> as Element>::accepts(TypeTag::F64));
    }

    #[test]
    fn c_int_is_i32() {
        assert!(i32::accepts(TypeTag::Int));
        assert!(!i32::accepts(TypeTag::U32));
        assert!(!f32::accepts(TypeTag::I32));
        assert!(usize::accepts(TypeTag::USize));
    }

    #[test]
    fn bool_is_not_an_integer() {
        assert!(!u8::accepts(TypeTag::Bool));
        assert!(!bool::accepts(TypeTag::U8));
    }

    #[test]
    fn integer_limits() {
        assert_eq!(TypeTag::I8.info().min, Some(Limit::Int(-128)));
        assert_eq!(TypeTag::U16.info().max, Some(Limit::Int(65535)));
        assert_eq!(TypeTag::F64.info().max, Some(Limit::Float(f64::MAX)));
    }

    #[test]
    fn element_strides_use_registry() {
        let mut strides = [0; 2];
        inmet_array::data::types::type_tag::element_strides(&[24, 8], TypeTag::F64, &mut strides)
            .unwrap();
        assert_eq!(strides, [3, 1]);

        let err = inmet_array::data::types::type_tag::element_strides(
            &[24, 8],
            TypeTag::Invalid,
            &mut strides,
        )
        .unwrap_err();
        assert!(matches!(
            *err,
            ArrayError::TypeError(inmet_array::error::TypeError::InvalidTag)
        ));
    }
}
