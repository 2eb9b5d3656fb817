//! Checked cursor operations over [`Buf`] and [`BufMut`].
//!
//! The `bytes` traits panic when a read or write runs past the end of the underlying
//! storage. Every helper here checks the remaining length first and reports
//! [`Error::BufferUnderflow`] or [`Error::BufferOverflow`] instead, leaving the cursor
//! where it was.
//!
//! All integers (including identifiers and lengths) are big-endian.

use crate::{Error, RangeCfg, TypeIdentifier};
use bytes::{Buf, BufMut, Bytes};

/// Encoded size of a [`TypeIdentifier`].
pub const ID_SIZE: usize = core::mem::size_of::<TypeIdentifier>();

/// Encoded size of a length or count prefix.
pub const LEN_SIZE: usize = core::mem::size_of::<u32>();

/// Returns an error if fewer than `len` bytes remain to be read.
#[inline]
pub fn at_least<B: Buf + ?Sized>(buf: &B, len: usize) -> Result<(), Error> {
    let remaining = buf.remaining();
    if remaining < len {
        return Err(Error::BufferUnderflow {
            needed: len,
            remaining,
        });
    }
    Ok(())
}

/// Returns an error if fewer than `len` bytes can be written.
#[inline]
pub fn has_capacity<B: BufMut + ?Sized>(buf: &B, len: usize) -> Result<(), Error> {
    let remaining = buf.remaining_mut();
    if remaining < len {
        return Err(Error::BufferOverflow {
            needed: len,
            remaining,
        });
    }
    Ok(())
}

/// Writes a type identifier.
#[inline]
pub fn put_id<B: BufMut + ?Sized>(buf: &mut B, id: TypeIdentifier) -> Result<(), Error> {
    has_capacity(buf, ID_SIZE)?;
    buf.put_u32(id);
    Ok(())
}

/// Reads a type identifier.
#[inline]
pub fn get_id<B: Buf + ?Sized>(buf: &mut B) -> Result<TypeIdentifier, Error> {
    at_least(buf, ID_SIZE)?;
    Ok(buf.get_u32())
}

/// Writes a length (or count) prefix.
///
/// Lengths must fit in a `u32` so that the encoding is identical across architectures.
#[inline]
pub fn put_len<B: BufMut + ?Sized>(
    buf: &mut B,
    len: usize,
    context: &'static str,
) -> Result<(), Error> {
    let len = u32::try_from(len)
        .map_err(|_| Error::MalformedData(context, format!("length {len} exceeds u32")))?;
    has_capacity(buf, LEN_SIZE)?;
    buf.put_u32(len);
    Ok(())
}

/// Reads a length (or count) prefix, rejecting values outside of `range`.
#[inline]
pub fn get_len<B: Buf + ?Sized>(
    buf: &mut B,
    range: &RangeCfg,
    context: &'static str,
) -> Result<usize, Error> {
    at_least(buf, LEN_SIZE)?;
    let raw = buf.get_u32();
    let len = usize::try_from(raw)
        .map_err(|_| Error::MalformedData(context, format!("length {raw} exceeds usize")))?;
    if !range.contains(len) {
        return Err(Error::MalformedData(
            context,
            format!("length {len} out of range"),
        ));
    }
    Ok(len)
}

/// Writes raw bytes.
#[inline]
pub fn put_slice<B: BufMut + ?Sized>(buf: &mut B, src: &[u8]) -> Result<(), Error> {
    has_capacity(buf, src.len())?;
    buf.put_slice(src);
    Ok(())
}

/// Reads exactly `len` raw bytes.
#[inline]
pub fn get_bytes<B: Buf + ?Sized>(buf: &mut B, len: usize) -> Result<Bytes, Error> {
    at_least(buf, len)?;
    Ok(buf.copy_to_bytes(len))
}
