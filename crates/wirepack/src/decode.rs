//! Type-checked decoding: the [`Decode`] trait and its implementations.

use crate::constants::Tag;
use crate::decoder::Decoder;
use crate::error::PackError;
use crate::types::{Bytes, Embedded, Skip};

/// A value that can be decoded from a [`Decoder`] stream.
///
/// Each implementation consumes exactly one wire value and fails with a
/// typed error when the tag does not match — never a silent coercion.
pub trait Decode: Sized {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, PackError>;
}

impl Decode for bool {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, PackError> {
        dec.read_bool()
    }
}

macro_rules! impl_decode_scalar {
    ($($ty:ty => $read:ident),+ $(,)?) => {
        $(impl Decode for $ty {
            fn decode(dec: &mut Decoder<'_>) -> Result<Self, PackError> {
                dec.$read()
            }
        })+
    };
}

impl_decode_scalar! {
    u8 => read_u8,
    u16 => read_u16,
    u32 => read_u32,
    u64 => read_u64,
    i8 => read_i8,
    i16 => read_i16,
    i32 => read_i32,
    i64 => read_i64,
    f32 => read_f32,
    f64 => read_f64,
    String => read_str,
}

impl Decode for Bytes {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, PackError> {
        dec.read_bytes().map(Bytes)
    }
}

/// Nil decodes to absence; anything else decodes as the inner type.
impl<T: Decode> Decode for Option<T> {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, PackError> {
        if dec.peek_tag()? == Tag::Nil {
            dec.read_nil()?;
            Ok(None)
        } else {
            T::decode(dec).map(Some)
        }
    }
}

/// A sequence resizes to whatever element count the wire declares; it has
/// no arity mismatch concept.
impl<T: Decode> Decode for Vec<T> {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, PackError> {
        let count = dec.read_array_hdr()?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::decode(dec)?);
        }
        Ok(items)
    }
}

/// The extracted blob is decoded by a fresh decoder scoped to exactly
/// those bytes; the outer stream is never touched by the inner decode.
impl<T: Decode> Decode for Embedded<T> {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, PackError> {
        let blob = dec.read_bytes()?;
        let mut inner = Decoder::new(&blob);
        Ok(Embedded(T::decode(&mut inner)?))
    }
}

impl Decode for Skip {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, PackError> {
        dec.skip_value()?;
        Ok(Skip)
    }
}

macro_rules! impl_decode_tuple {
    ($len:expr => $($name:ident),+) => {
        impl<$($name: Decode),+> Decode for ($($name,)+) {
            fn decode(dec: &mut Decoder<'_>) -> Result<Self, PackError> {
                let found = dec.read_array_hdr()?;
                if found != $len {
                    return dec.fail(PackError::LengthMismatch {
                        found,
                        expected: $len,
                    });
                }
                Ok(($($name::decode(dec)?,)+))
            }
        }
    };
}

impl_decode_tuple!(1 => A);
impl_decode_tuple!(2 => A, B);
impl_decode_tuple!(3 => A, B, C);
impl_decode_tuple!(4 => A, B, C, D);
impl_decode_tuple!(5 => A, B, C, D, E);
impl_decode_tuple!(6 => A, B, C, D, E, F);
impl_decode_tuple!(7 => A, B, C, D, E, F, G);
impl_decode_tuple!(8 => A, B, C, D, E, F, G, H);
