//! Element types, their layouts, and n-dimensional views of their data.

pub mod array;
pub mod layout;
pub mod types;
