//! Codec for tuples.

use crate::{Codec, Error, Registry};
use bytes::{Buf, BufMut};
use core::any::Any;
use paste::paste;

/// Encodes a tuple as each of its components in order.
///
/// There is no framing of its own: each component is written through the [`Registry`] and
/// delimits itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tuple;

macro_rules! impl_tuple {
    ($($index:literal),*) => {
        paste! {
            impl<$( [<T $index>]: Any + Send + Sync ),*> Codec<( $( [<T $index>], )* )> for Tuple {
                #[inline]
                fn write(
                    &self,
                    value: &( $( [<T $index>], )* ),
                    buf: &mut dyn BufMut,
                    registry: &Registry,
                ) -> Result<(), Error> {
                    $( registry.write(&value.$index, buf)?; )*
                    Ok(())
                }

                #[inline]
                fn read(
                    &self,
                    buf: &mut dyn Buf,
                    registry: &Registry,
                ) -> Result<( $( [<T $index>], )* ), Error> {
                    Ok(( $( registry.read_as::<[<T $index>]>(buf)?, )* ))
                }
            }
        }
    };
}

impl_tuple!(0, 1);
impl_tuple!(0, 1, 2);
impl_tuple!(0, 1, 2, 3);
