//! Codec for UTF-8 strings.

use crate::{
    buffer::{get_bytes, get_len, put_len, put_slice},
    Codec, Error, RangeCfg, Registry,
};
use bytes::{Buf, BufMut};
use core::ops::RangeBounds;

/// Encodes a [`String`] as a 4-byte length followed by its UTF-8 bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Utf8 {
    range: RangeCfg,
}

impl Utf8 {
    /// Creates a codec accepting byte lengths within `range` on read.
    pub fn new(range: impl RangeBounds<usize>) -> Self {
        Self {
            range: RangeCfg::new(range),
        }
    }
}

impl Codec<String> for Utf8 {
    fn write(&self, value: &String, buf: &mut dyn BufMut, _: &Registry) -> Result<(), Error> {
        put_len(buf, value.len(), "String")?;
        put_slice(buf, value.as_bytes())
    }

    fn read(&self, buf: &mut dyn Buf, _: &Registry) -> Result<String, Error> {
        let len = get_len(buf, &self.range, "String")?;
        let bytes = get_bytes(buf, len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|err| Error::MalformedData("String", err.to_string()))
    }
}
