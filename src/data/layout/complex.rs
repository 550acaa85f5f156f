//! Use `num_complex::Complex` as layout for complex elements.
//!
//! This module is only available if the `complex` feature has been enabled.

pub use num_complex::Complex;

use crate::data::types::{element::impl_element, type_tag::TypeTag};

impl_element!(Complex<f32>, TypeTag::Complex64);
impl_element!(Complex<f64>, TypeTag::Complex128);
