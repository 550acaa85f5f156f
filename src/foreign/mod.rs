//! The interface between this crate and a host.
//!
//! A host is the environment that owns the arrays a routine works with, for example the runtime
//! of a scripting language. Arrays owned by a host are described with an [`ArrayDescriptor`] and
//! imported as views without copying their data. New arrays that have to be returned to the host
//! are allocated by the host through the [`HostAllocator`] trait and exported with [`export`].
//!
//! [`ArrayDescriptor`]: descriptor::ArrayDescriptor
//! [`HostAllocator`]: host::HostAllocator
//! [`export`]: host::export

pub mod descriptor;
pub mod heap;
pub mod host;
