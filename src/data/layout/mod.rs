//! Element layouts provided by other crates.

#[cfg(feature = "complex")]
pub mod complex;
#[cfg(feature = "f16")]
pub mod f16;
