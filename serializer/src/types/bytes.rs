//! Codec for raw byte strings.

use crate::{
    buffer::{get_bytes, get_len, put_len, put_slice},
    Codec, Error, RangeCfg, Registry,
};
use bytes::{Buf, BufMut, Bytes};
use core::ops::RangeBounds;

/// Encodes [`Bytes`] as a 4-byte length followed by the bytes themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blob {
    range: RangeCfg,
}

impl Blob {
    /// Creates a codec accepting lengths within `range` on read.
    pub fn new(range: impl RangeBounds<usize>) -> Self {
        Self {
            range: RangeCfg::new(range),
        }
    }
}

impl Codec<Bytes> for Blob {
    fn write(&self, value: &Bytes, buf: &mut dyn BufMut, _: &Registry) -> Result<(), Error> {
        put_len(buf, value.len(), "Bytes")?;
        put_slice(buf, value)
    }

    fn read(&self, buf: &mut dyn Buf, _: &Registry) -> Result<Bytes, Error> {
        let len = get_len(buf, &self.range, "Bytes")?;
        get_bytes(buf, len)
    }
}
