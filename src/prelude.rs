//! Reexports structs and traits you're likely to need.

pub use crate::data::array::{
    dimensions::{Dimensions, Dims, DimsExt, Order},
    dyn_view::ArrayViewDyn,
    owned::OwnedArray,
    view::ArrayView,
};
pub use crate::data::types::{
    element::Element,
    type_tag::{TypeInfo, TypeTag},
};
pub use crate::error::{ArrayError, ArrayResult};
pub use crate::foreign::{
    descriptor::ArrayDescriptor,
    heap::HeapAllocator,
    host::{export, Exported, HostAllocator, HostArray},
};
pub use crate::memory::{
    buffer::OwnedBuffer,
    release::{Owned, Release},
};
