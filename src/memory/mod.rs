//! Memory owned by this crate or handed to it.
//!
//! Element data is either owned by an [`OwnedBuffer`], or by a host. Views never own the data
//! they address. Resources that belong to a host, like a reference to a foreign array, implement
//! [`Release`] and are wrapped in [`Owned`], which releases them exactly once.
//!
//! [`OwnedBuffer`]: crate::memory::buffer::OwnedBuffer
//! [`Release`]: crate::memory::release::Release
//! [`Owned`]: crate::memory::release::Owned

pub mod buffer;
pub mod release;
