//! Reserved identifiers for the built-in bindings.
//!
//! [`crate::RegistryBuilder::with_builtins`] binds the types below at identifiers counting up
//! from [`BASE`]. Identifiers lower than [`BASE`] are never used by the built-ins, so
//! applications can assign them freely.

use crate::{
    Blob, Error, Fixed, Object, RegistryBuilder, Sequence, TypeIdentifier, Utf8,
};
use bytes::Bytes;

/// First identifier reserved for built-in bindings.
pub const BASE: TypeIdentifier = 0xFFFF_FF00;

pub const BOOL: TypeIdentifier = BASE;
pub const U8: TypeIdentifier = BASE + 1;
pub const U16: TypeIdentifier = BASE + 2;
pub const U32: TypeIdentifier = BASE + 3;
pub const U64: TypeIdentifier = BASE + 4;
pub const I8: TypeIdentifier = BASE + 5;
pub const I16: TypeIdentifier = BASE + 6;
pub const I32: TypeIdentifier = BASE + 7;
pub const I64: TypeIdentifier = BASE + 8;
pub const F32: TypeIdentifier = BASE + 9;
pub const F64: TypeIdentifier = BASE + 10;
pub const STRING: TypeIdentifier = BASE + 11;
pub const BYTES: TypeIdentifier = BASE + 12;
/// `Vec<Object>`: a list whose elements may be of any registered type.
pub const LIST: TypeIdentifier = BASE + 13;

pub(crate) fn install(builder: &mut RegistryBuilder) -> Result<(), Error> {
    builder
        .register::<bool, _>(BOOL, Fixed)?
        .register::<u8, _>(U8, Fixed)?
        .register::<u16, _>(U16, Fixed)?
        .register::<u32, _>(U32, Fixed)?
        .register::<u64, _>(U64, Fixed)?
        .register::<i8, _>(I8, Fixed)?
        .register::<i16, _>(I16, Fixed)?
        .register::<i32, _>(I32, Fixed)?
        .register::<i64, _>(I64, Fixed)?
        .register::<f32, _>(F32, Fixed)?
        .register::<f64, _>(F64, Fixed)?
        .register::<String, _>(STRING, Utf8::default())?
        .register::<Bytes, _>(BYTES, Blob::default())?
        .register::<Vec<Object>, _>(LIST, Sequence::default())?;
    Ok(())
}
