//! Error types for registry and codec operations

use crate::TypeIdentifier;
use thiserror::Error;

/// Error type for registry and codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unregistered type: {0}")]
    UnregisteredType(&'static str),
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(TypeIdentifier),
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("identifier {id} already bound to {existing}")]
    DuplicateIdentifier {
        id: TypeIdentifier,
        existing: &'static str,
    },
    #[error("type {type_name} already bound to identifier {id}")]
    DuplicateType {
        type_name: &'static str,
        id: TypeIdentifier,
    },
    #[error("type cannot be bound: {0}")]
    UnbindableType(&'static str),
    #[error("malformed data in {0}: {1}")]
    MalformedData(&'static str, String), // context, message
    #[error("buffer underflow: needed {needed} bytes, {remaining} remaining")]
    BufferUnderflow { needed: usize, remaining: usize },
    #[error("buffer overflow: needed {needed} bytes, {remaining} remaining")]
    BufferOverflow { needed: usize, remaining: usize },
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
}
