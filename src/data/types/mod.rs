//! Element types and the runtime type registry.

pub mod element;
pub mod type_tag;
