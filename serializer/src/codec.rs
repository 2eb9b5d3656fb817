//! The per-type codec contract.

use crate::{Error, Registry};
use bytes::{Buf, BufMut};
use core::marker::PhantomData;

/// Writes and reads the body of one value of type `T`.
///
/// A codec never writes the type identifier of the value it encodes: the [`Registry`]
/// emits that before calling [`Codec::write`] and consumes it before calling
/// [`Codec::read`]. Everything after the identifier is owned by the codec, including
/// any framing (lengths, counts, presence flags) needed to read the body back without
/// knowing its size in advance.
///
/// Codecs are shared by every caller of a [`Registry`], possibly from many threads at
/// once, and therefore must not keep per-call state. Configuration fixed at construction
/// (such as a [`crate::RangeCfg`] bounding lengths) is fine.
///
/// Composite codecs encode their components by calling back into the registry with
/// [`Registry::write`] and [`Registry::read_as`]. Each component is then prefixed with its
/// own identifier, so a field may hold any registered type at runtime.
pub trait Codec<T>: Send + Sync + 'static {
    /// Writes the body of `value`, leaving the cursor right after the last byte written.
    fn write(&self, value: &T, buf: &mut dyn BufMut, registry: &Registry) -> Result<(), Error>;

    /// Reads a body previously written by [`Codec::write`], consuming exactly those bytes.
    ///
    /// Returns [`Error::MalformedData`] if the framing is inconsistent rather than a
    /// partially constructed value.
    fn read(&self, buf: &mut dyn Buf, registry: &Registry) -> Result<T, Error>;
}

/// A type that knows how to write and read its own body.
///
/// Bind such a type with [`crate::RegistryBuilder::register_serializable`].
pub trait Serializable: Sized {
    /// Writes the body of `self`.
    fn write_to(&self, buf: &mut dyn BufMut, registry: &Registry) -> Result<(), Error>;

    /// Reads a body written by [`Serializable::write_to`].
    fn read_from(buf: &mut dyn Buf, registry: &Registry) -> Result<Self, Error>;
}

/// Adapts a [`Serializable`] type to the [`Codec`] contract.
pub struct Native<T>(PhantomData<fn() -> T>);

impl<T> Native<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Native<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serializable + 'static> Codec<T> for Native<T> {
    #[inline]
    fn write(&self, value: &T, buf: &mut dyn BufMut, registry: &Registry) -> Result<(), Error> {
        value.write_to(buf, registry)
    }

    #[inline]
    fn read(&self, buf: &mut dyn Buf, registry: &Registry) -> Result<T, Error> {
        T::read_from(buf, registry)
    }
}
