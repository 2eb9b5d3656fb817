//! Codec for fixed-width primitives.
//!
//! All integers and floats are written big-endian to avoid host-endian ambiguity. `bool` is a
//! single byte that must be `0` or `1`.

use crate::{
    buffer::{at_least, has_capacity},
    Codec, Error, Registry,
};
use bytes::{Buf, BufMut};

/// Encodes numbers and `bool` in their fixed-width big-endian form.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fixed;

macro_rules! impl_fixed {
    ($type:ty, $read_method:ident, $write_method:ident) => {
        impl Codec<$type> for Fixed {
            #[inline]
            fn write(&self, value: &$type, buf: &mut dyn BufMut, _: &Registry) -> Result<(), Error> {
                has_capacity(buf, core::mem::size_of::<$type>())?;
                buf.$write_method(*value);
                Ok(())
            }

            #[inline]
            fn read(&self, buf: &mut dyn Buf, _: &Registry) -> Result<$type, Error> {
                at_least(buf, core::mem::size_of::<$type>())?;
                Ok(buf.$read_method())
            }
        }
    };
}

impl_fixed!(u8, get_u8, put_u8);
impl_fixed!(u16, get_u16, put_u16);
impl_fixed!(u32, get_u32, put_u32);
impl_fixed!(u64, get_u64, put_u64);
impl_fixed!(u128, get_u128, put_u128);
impl_fixed!(i8, get_i8, put_i8);
impl_fixed!(i16, get_i16, put_i16);
impl_fixed!(i32, get_i32, put_i32);
impl_fixed!(i64, get_i64, put_i64);
impl_fixed!(i128, get_i128, put_i128);
impl_fixed!(f32, get_f32, put_f32);
impl_fixed!(f64, get_f64, put_f64);

impl Codec<bool> for Fixed {
    #[inline]
    fn write(&self, value: &bool, buf: &mut dyn BufMut, _: &Registry) -> Result<(), Error> {
        has_capacity(buf, 1)?;
        buf.put_u8(u8::from(*value));
        Ok(())
    }

    #[inline]
    fn read(&self, buf: &mut dyn Buf, _: &Registry) -> Result<bool, Error> {
        at_least(buf, 1)?;
        match buf.get_u8() {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::MalformedData("bool", format!("invalid byte {other}"))),
        }
    }
}
