//! Codecs for containers of registered types.
//!
//! Elements are written through the [`Registry`], so each one carries its own identifier.
//! A container of [`crate::Object`] may therefore hold values of different types.

use crate::{
    buffer::{at_least, get_len, has_capacity, put_len, ID_SIZE},
    Codec, Error, RangeCfg, Registry,
};
use bytes::{Buf, BufMut};
use core::{any::Any, ops::RangeBounds};
use std::collections::BTreeMap;

/// Bounds the capacity reserved for `len` elements by what the buffer could possibly hold.
fn capacity(len: usize, buf: &dyn Buf) -> usize {
    len.min(buf.remaining() / ID_SIZE)
}

/// Encodes a [`Vec`] as a 4-byte count followed by each element.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sequence {
    range: RangeCfg,
}

impl Sequence {
    /// Creates a codec accepting element counts within `range` on read.
    pub fn new(range: impl RangeBounds<usize>) -> Self {
        Self {
            range: RangeCfg::new(range),
        }
    }
}

impl<T: Any + Send + Sync> Codec<Vec<T>> for Sequence {
    fn write(&self, value: &Vec<T>, buf: &mut dyn BufMut, registry: &Registry) -> Result<(), Error> {
        put_len(buf, value.len(), "Vec")?;
        for item in value {
            registry.write(item, buf)?;
        }
        Ok(())
    }

    fn read(&self, buf: &mut dyn Buf, registry: &Registry) -> Result<Vec<T>, Error> {
        let len = get_len(buf, &self.range, "Vec")?;
        let mut vec = Vec::with_capacity(capacity(len, buf));
        for _ in 0..len {
            vec.push(registry.read_as::<T>(buf)?);
        }
        Ok(vec)
    }
}

/// Encodes an [`Option`] as a presence byte (`0` or `1`) followed by the value, if any.
#[derive(Clone, Copy, Debug, Default)]
pub struct Nullable;

impl<T: Any + Send + Sync> Codec<Option<T>> for Nullable {
    fn write(
        &self,
        value: &Option<T>,
        buf: &mut dyn BufMut,
        registry: &Registry,
    ) -> Result<(), Error> {
        has_capacity(buf, 1)?;
        match value {
            Some(inner) => {
                buf.put_u8(1);
                registry.write(inner, buf)
            }
            None => {
                buf.put_u8(0);
                Ok(())
            }
        }
    }

    fn read(&self, buf: &mut dyn Buf, registry: &Registry) -> Result<Option<T>, Error> {
        at_least(buf, 1)?;
        match buf.get_u8() {
            0 => Ok(None),
            1 => Ok(Some(registry.read_as::<T>(buf)?)),
            other => Err(Error::MalformedData(
                "Option",
                format!("invalid presence byte {other}"),
            )),
        }
    }
}

/// Encodes a [`BTreeMap`] as a 4-byte count followed by each key and value, keys ascending.
///
/// Reading rejects keys that are not strictly ascending, so every map has exactly one
/// encoding.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dictionary {
    range: RangeCfg,
}

impl Dictionary {
    /// Creates a codec accepting entry counts within `range` on read.
    pub fn new(range: impl RangeBounds<usize>) -> Self {
        Self {
            range: RangeCfg::new(range),
        }
    }
}

impl<K, V> Codec<BTreeMap<K, V>> for Dictionary
where
    K: Ord + Any + Send + Sync,
    V: Any + Send + Sync,
{
    fn write(
        &self,
        value: &BTreeMap<K, V>,
        buf: &mut dyn BufMut,
        registry: &Registry,
    ) -> Result<(), Error> {
        put_len(buf, value.len(), "BTreeMap")?;
        for (key, item) in value {
            registry.write(key, buf)?;
            registry.write(item, buf)?;
        }
        Ok(())
    }

    fn read(&self, buf: &mut dyn Buf, registry: &Registry) -> Result<BTreeMap<K, V>, Error> {
        let len = get_len(buf, &self.range, "BTreeMap")?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let key = registry.read_as::<K>(buf)?;
            if let Some((last, _)) = map.last_key_value() {
                if &key <= last {
                    return Err(Error::MalformedData(
                        "BTreeMap",
                        "keys not strictly ascending".into(),
                    ));
                }
            }
            let item = registry.read_as::<V>(buf)?;
            map.insert(key, item);
        }
        Ok(map)
    }
}
