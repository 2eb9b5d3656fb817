//! Serialize typed objects through a registry of identified codecs.
//!
//! # Overview
//!
//! A [`Registry`] binds each serializable type to a small numeric [`TypeIdentifier`] and a
//! [`Codec`] that knows how to write and read that type's body. Writing a value emits its
//! identifier followed by the body; reading resolves the codec from the identifier. Because
//! every value (including every nested value) is prefixed with its identifier, readers can
//! decode heterogeneous collections and fields whose concrete type is only known at runtime.
//!
//! Identifiers are assigned explicitly, so the wire format stays compact and survives renaming
//! or moving a type. A reader that meets an identifier it does not know (for example, from a
//! newer writer) fails with [`Error::UnknownIdentifier`] rather than guessing.
//!
//! # Wire Format
//!
//! ```text
//! [identifier: u32 big-endian][body written by the bound codec]
//! ```
//!
//! There is no length prefix or checksum at this layer. Codecs for variable-length or
//! composite types write their own framing (see [`types`]).
//!
//! # Supported Types
//!
//! Any `'static + Send + Sync` type other than [`Object`] can be bound. Built-in codecs cover:
//! - Primitives: `u8`..`u64`, `i8`..`i64`, `f32`, `f64`, `bool` ([`Fixed`], which also
//!   handles `u128` and `i128` when bound explicitly)
//! - `String` ([`Utf8`]) and [`bytes::Bytes`] ([`Blob`])
//! - `Vec<T>` ([`Sequence`]), `Option<T>` ([`Nullable`]), `BTreeMap<K, V>` ([`Dictionary`])
//!   and tuples ([`Tuple`]), whose components are written through the registry
//!
//! [`RegistryBuilder::with_builtins`] binds the primitives above (without the 128-bit
//! integers), `String`, `Bytes` and `Vec<Object>` at the identifiers listed in [`builtin`].
//! Generic containers must be bound per element type.
//!
//! # Example
//!
//! ```
//! use bytes::{Buf, BufMut, BytesMut};
//! use tagwire_serializer::{Codec, Error, Fixed, Registry, Utf8};
//!
//! #[derive(Debug, PartialEq)]
//! struct Entry {
//!     term: u64,
//!     command: String,
//! }
//!
//! // A composite codec delegates each field back to the registry.
//! struct EntryCodec;
//!
//! impl Codec<Entry> for EntryCodec {
//!     fn write(&self, value: &Entry, buf: &mut dyn BufMut, registry: &Registry) -> Result<(), Error> {
//!         registry.write(&value.term, buf)?;
//!         registry.write(&value.command, buf)
//!     }
//!
//!     fn read(&self, buf: &mut dyn Buf, registry: &Registry) -> Result<Entry, Error> {
//!         let term = registry.read_as::<u64>(buf)?;
//!         let command = registry.read_as::<String>(buf)?;
//!         Ok(Entry { term, command })
//!     }
//! }
//!
//! let mut builder = Registry::builder();
//! builder
//!     .register::<u64, _>(1, Fixed)?
//!     .register::<String, _>(2, Utf8::new(..=1024))?
//!     .register::<Entry, _>(3, EntryCodec)?;
//! let registry = builder.build();
//!
//! let entry = Entry { term: 7, command: "set x".into() };
//! let mut buf = BytesMut::new();
//! registry.write(&entry, &mut buf)?;
//!
//! let decoded = registry.read_as::<Entry>(&mut buf.freeze())?;
//! assert_eq!(decoded, entry);
//! # Ok::<(), Error>(())
//! ```

pub mod buffer;
pub mod builtin;
pub mod codec;
pub mod config;
pub mod declaration;
pub mod error;
pub mod registry;
pub mod types;

// Re-export main types and traits
pub use codec::{Codec, Native, Serializable};
pub use config::RangeCfg;
pub use declaration::Declaration;
pub use error::Error;
pub use registry::{Binding, Object, Registry, RegistryBuilder, TypeIdentifier};
pub use types::{
    bytes::Blob,
    collections::{Dictionary, Nullable, Sequence},
    primitives::Fixed,
    string::Utf8,
    tuple::Tuple,
};
