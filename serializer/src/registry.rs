//! Bindings between types, identifiers and codecs.
//!
//! # Phases
//!
//! Bindings are collected by a [`RegistryBuilder`] and sealed into a [`Registry`] with
//! [`RegistryBuilder::build`]. A sealed registry is never mutated again, so it can be shared
//! (e.g. behind an `Arc`) and used from any number of threads without synchronization.
//!
//! # Wire Format
//!
//! Every value is written as its 4-byte big-endian [`TypeIdentifier`] followed by the body
//! produced by the bound [`Codec`]. There is no length prefix at this layer; a codec frames
//! its own body.

use crate::{buffer, codec::Native, Codec, Declaration, Error, Serializable};
use bytes::{Buf, BufMut, BytesMut};
use core::{
    any::{type_name, Any, TypeId},
    fmt,
    marker::PhantomData,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace, warn};

/// Compact identifier written before every value.
pub type TypeIdentifier = u32;

/// A value whose concrete type is only known at runtime.
pub type Object = Box<dyn Any + Send + Sync>;

/// Name reported for values dispatched through [`Registry::write_object`].
const DYN_NAME: &str = "dyn Any";

/// Type-erased view of a [`Codec`].
trait Dispatch: Send + Sync {
    fn write(
        &self,
        value: &(dyn Any + Send + Sync),
        buf: &mut dyn BufMut,
        registry: &Registry,
    ) -> Result<(), Error>;

    fn read(&self, buf: &mut dyn Buf, registry: &Registry) -> Result<Object, Error>;
}

struct Typed<T, C> {
    codec: C,
    _type: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync, C: Codec<T>> Dispatch for Typed<T, C> {
    fn write(
        &self,
        value: &(dyn Any + Send + Sync),
        buf: &mut dyn BufMut,
        registry: &Registry,
    ) -> Result<(), Error> {
        let value = value.downcast_ref::<T>().ok_or(Error::TypeMismatch {
            expected: type_name::<T>(),
            found: DYN_NAME,
        })?;
        self.codec.write(value, buf, registry)
    }

    fn read(&self, buf: &mut dyn Buf, registry: &Registry) -> Result<Object, Error> {
        Ok(Box::new(self.codec.read(buf, registry)?))
    }
}

/// A type bound to an identifier and a codec.
pub struct Binding {
    id: TypeIdentifier,
    type_id: TypeId,
    type_name: &'static str,
    codec_id: TypeId,
    codec_name: &'static str,
    stateless: bool,
    dispatch: Box<dyn Dispatch>,
}

impl Binding {
    fn new<T, C>(id: TypeIdentifier, codec: C) -> Self
    where
        T: Any + Send + Sync,
        C: Codec<T>,
    {
        Self {
            id,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            codec_id: TypeId::of::<C>(),
            codec_name: type_name::<C>(),
            stateless: core::mem::size_of::<C>() == 0,
            dispatch: Box::new(Typed {
                codec,
                _type: PhantomData,
            }),
        }
    }

    /// The identifier written before values of this type.
    pub fn id(&self) -> TypeIdentifier {
        self.id
    }

    /// The name of the bound type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The name of the bound codec.
    pub fn codec_name(&self) -> &'static str {
        self.codec_name
    }

    /// Returns true if this binding is for type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Returns true if `other` is indistinguishable from this binding.
    ///
    /// Codecs carrying configuration cannot be compared, so only zero-sized codecs of the
    /// same type are considered identical.
    fn same_as(&self, other: &Binding) -> bool {
        self.id == other.id
            && self.type_id == other.type_id
            && self.codec_id == other.codec_id
            && self.stateless
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .field("codec_name", &self.codec_name)
            .finish()
    }
}

/// Collects bindings before they are sealed into a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    by_type: HashMap<TypeId, TypeIdentifier>,
    by_id: BTreeMap<TypeIdentifier, Binding>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds type `T` to `id`, encoded and decoded by `codec`.
    ///
    /// Registering the same type under the same identifier with the same zero-sized codec
    /// again is a no-op. A codec that carries configuration (such as a length limit) can not
    /// be shown to match an earlier one, so registering it twice is a conflict.
    ///
    /// # Errors
    ///
    /// * [`Error::DuplicateIdentifier`] if `id` is bound to another type.
    /// * [`Error::DuplicateType`] if `T` is bound to another identifier or another codec.
    /// * [`Error::UnbindableType`] if `T` is [`Object`], which is always dispatched on its
    ///   contents.
    pub fn register<T, C>(&mut self, id: TypeIdentifier, codec: C) -> Result<&mut Self, Error>
    where
        T: Any + Send + Sync,
        C: Codec<T>,
    {
        let binding = Binding::new::<T, C>(id, codec);
        if !self.admit(&binding)? {
            self.insert(binding);
        }
        Ok(self)
    }

    /// Checks `binding` against the existing bindings.
    ///
    /// Returns true if an identical binding is already present.
    fn admit(&self, binding: &Binding) -> Result<bool, Error> {
        let id = binding.id;
        if binding.type_id == TypeId::of::<Object>() {
            warn!(id, "rejected binding for erased object type");
            return Err(Error::UnbindableType(binding.type_name));
        }

        // Check the identifier
        if let Some(existing) = self.by_id.get(&id) {
            if existing.type_id != binding.type_id {
                warn!(
                    id,
                    existing = existing.type_name,
                    rejected = binding.type_name,
                    "identifier already bound"
                );
                return Err(Error::DuplicateIdentifier {
                    id,
                    existing: existing.type_name,
                });
            }
            if !existing.same_as(binding) {
                warn!(
                    id,
                    type_name = existing.type_name,
                    existing = existing.codec_name,
                    rejected = binding.codec_name,
                    "type already bound to another codec"
                );
                return Err(Error::DuplicateType {
                    type_name: existing.type_name,
                    id,
                });
            }
            trace!(id, type_name = existing.type_name, "ignoring identical registration");
            return Ok(true);
        }

        // Check the type
        if let Some(&bound) = self.by_type.get(&binding.type_id) {
            warn!(
                id,
                bound,
                type_name = binding.type_name,
                "type already bound to another identifier"
            );
            return Err(Error::DuplicateType {
                type_name: binding.type_name,
                id: bound,
            });
        }
        Ok(false)
    }

    fn insert(&mut self, binding: Binding) {
        debug!(
            id = binding.id,
            type_name = binding.type_name,
            codec = binding.codec_name,
            "registered codec"
        );
        self.by_type.insert(binding.type_id, binding.id);
        self.by_id.insert(binding.id, binding);
    }

    /// Moves every binding of `other` into this builder.
    ///
    /// All bindings are checked before any is inserted, so on error this builder is left
    /// unchanged.
    pub fn merge(&mut self, other: RegistryBuilder) -> Result<&mut Self, Error> {
        let mut fresh = Vec::with_capacity(other.by_id.len());
        for binding in other.by_id.into_values() {
            if !self.admit(&binding)? {
                fresh.push(binding);
            }
        }
        for binding in fresh {
            self.insert(binding);
        }
        Ok(self)
    }

    /// Binds a type that writes and reads its own body.
    pub fn register_serializable<T>(&mut self, id: TypeIdentifier) -> Result<&mut Self, Error>
    where
        T: Serializable + Any + Send + Sync,
    {
        self.register::<T, Native<T>>(id, Native::new())
    }

    /// Binds the built-in codecs at their reserved identifiers (see [`crate::builtin`]).
    ///
    /// Either every built-in is bound or, on conflict, none is. Because [`crate::Utf8`],
    /// [`crate::Blob`] and [`crate::Sequence`] carry length limits, calling this twice on the
    /// same builder is a conflict.
    pub fn with_builtins(&mut self) -> Result<&mut Self, Error> {
        let mut builtins = RegistryBuilder::new();
        crate::builtin::install(&mut builtins)?;
        self.merge(builtins)
    }

    /// Applies registrations produced outside of this crate, in order.
    ///
    /// Stops at the first conflicting declaration.
    pub fn declare(
        &mut self,
        declarations: impl IntoIterator<Item = Declaration>,
    ) -> Result<&mut Self, Error> {
        for declaration in declarations {
            declaration.apply(self)?;
        }
        Ok(self)
    }

    /// Returns the number of bindings collected so far.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Seals the collected bindings.
    pub fn build(self) -> Registry {
        debug!(bindings = self.by_id.len(), "sealed registry");
        Registry {
            by_type: self.by_type,
            by_id: self.by_id,
        }
    }
}

/// Encodes values as `[identifier][body]` and decodes them back.
pub struct Registry {
    by_type: HashMap<TypeId, TypeIdentifier>,
    by_id: BTreeMap<TypeIdentifier, Binding>,
}

impl Registry {
    /// Returns a builder for a new registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Writes `value` (identifier, then body) using the codec bound to `T`.
    ///
    /// If `T` is [`Object`], the value is dispatched on the type it contains.
    ///
    /// Returns [`Error::UnregisteredType`] without touching `buf` if no codec is bound.
    pub fn write<T: Any + Send + Sync>(&self, value: &T, buf: &mut dyn BufMut) -> Result<(), Error> {
        self.dispatch(value, type_name::<T>(), buf)
    }

    /// Writes a value whose concrete type is only known at runtime.
    pub fn write_object(
        &self,
        value: &(dyn Any + Send + Sync),
        buf: &mut dyn BufMut,
    ) -> Result<(), Error> {
        self.dispatch(value, DYN_NAME, buf)
    }

    fn dispatch(
        &self,
        value: &(dyn Any + Send + Sync),
        name: &'static str,
        buf: &mut dyn BufMut,
    ) -> Result<(), Error> {
        if let Some(inner) = value.downcast_ref::<Object>() {
            return self.dispatch(inner.as_ref(), DYN_NAME, buf);
        }
        let binding = self
            .by_type
            .get(&value.type_id())
            .and_then(|id| self.by_id.get(id))
            .ok_or(Error::UnregisteredType(name))?;
        buffer::put_id(buf, binding.id)?;
        binding.dispatch.write(value, buf, self)
    }

    /// Reads one value of whatever type its identifier resolves to.
    ///
    /// Returns [`Error::UnknownIdentifier`] (after consuming only the identifier) if the
    /// identifier is not bound.
    pub fn read(&self, buf: &mut dyn Buf) -> Result<Object, Error> {
        let binding = self.resolve(buf)?;
        binding.dispatch.read(buf, self)
    }

    /// Reads one value that must be of type `T`.
    ///
    /// The identifier is checked against `T` before the body is read, so a mismatch returns
    /// [`Error::TypeMismatch`] having consumed only the identifier. Reading as [`Object`]
    /// accepts any bound identifier.
    pub fn read_as<T: Any + Send + Sync>(&self, buf: &mut dyn Buf) -> Result<T, Error> {
        if TypeId::of::<T>() == TypeId::of::<Object>() {
            let object: Box<dyn Any> = Box::new(self.read(buf)?);
            return object.downcast::<T>().map(|value| *value).map_err(|_| {
                Error::TypeMismatch {
                    expected: type_name::<T>(),
                    found: type_name::<Object>(),
                }
            });
        }

        let binding = self.resolve(buf)?;
        if binding.type_id != TypeId::of::<T>() {
            return Err(Error::TypeMismatch {
                expected: type_name::<T>(),
                found: binding.type_name,
            });
        }
        binding
            .dispatch
            .read(buf, self)?
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Error::TypeMismatch {
                expected: type_name::<T>(),
                found: binding.type_name,
            })
    }

    fn resolve(&self, buf: &mut dyn Buf) -> Result<&Binding, Error> {
        let id = buffer::get_id(buf)?;
        self.by_id.get(&id).ok_or_else(|| {
            debug!(id, "unknown identifier");
            Error::UnknownIdentifier(id)
        })
    }

    /// Encodes `value` into a new buffer.
    pub fn encode<T: Any + Send + Sync>(&self, value: &T) -> Result<BytesMut, Error> {
        let mut buf = BytesMut::new();
        self.write(value, &mut buf)?;
        Ok(buf)
    }

    /// Decodes one value from `buf`, ensuring the buffer is fully consumed.
    pub fn decode(&self, mut buf: impl Buf) -> Result<Object, Error> {
        let value = self.read(&mut buf)?;
        Self::consumed(&buf)?;
        Ok(value)
    }

    /// Decodes one value of type `T` from `buf`, ensuring the buffer is fully consumed.
    pub fn decode_as<T: Any + Send + Sync>(&self, mut buf: impl Buf) -> Result<T, Error> {
        let value = self.read_as::<T>(&mut buf)?;
        Self::consumed(&buf)?;
        Ok(value)
    }

    fn consumed(buf: &impl Buf) -> Result<(), Error> {
        match buf.remaining() {
            0 => Ok(()),
            remaining => Err(Error::ExtraData(remaining)),
        }
    }

    /// Returns the identifier bound to `T`, if any.
    pub fn identifier_of<T: Any>(&self) -> Option<TypeIdentifier> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Returns the binding for `id`, if any.
    pub fn binding(&self, id: TypeIdentifier) -> Option<&Binding> {
        self.by_id.get(&id)
    }

    /// Iterates over all bindings in identifier order.
    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.by_id.values()
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.by_id.values()).finish()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.by_id.values()).finish()
    }
}
