//! Built-in codecs.
//!
//! These are ordinary implementations of [`crate::Codec`]; nothing in the [`crate::Registry`]
//! treats them specially. Bind them explicitly, or all at once with
//! [`crate::RegistryBuilder::with_builtins`].

pub mod bytes;
pub mod collections;
pub mod primitives;
pub mod string;
pub mod tuple;
