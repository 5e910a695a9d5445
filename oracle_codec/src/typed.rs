//! Statically typed front end to the codec.
//!
//! A [`WireType`] knows its own [`Descriptor`] and converts to and from a
//! [`Value`]. Sequences are `Vec<T>` for a single `T`, so a heterogeneous
//! sequence cannot be written at the call site. Record structs are declared
//! with [`wire_record!`](crate::wire_record).

use crate::FIXED_POINT_SCALE;
use crate::codec::{decode, encode};
use crate::descriptor::Descriptor;
use crate::error::CodecError;
use crate::felt::Felt;
use crate::fixed::FixedPoint;
use crate::types::BitWidth;
use crate::value::Value;

/// A Rust type with a static wire shape.
pub trait WireType: Sized {
    fn descriptor() -> Descriptor;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, CodecError>;
}

/// Encode a typed value using its static descriptor.
pub fn encode_typed<T: WireType>(value: &T) -> Result<Vec<u8>, CodecError> {
    encode(&value.to_value(), &T::descriptor())
}

/// Decode a typed value using its static descriptor.
pub fn decode_typed<T: WireType>(bytes: &[u8]) -> Result<T, CodecError> {
    T::from_value(decode(bytes, &T::descriptor())?)
}

fn mismatch<T: WireType>(value: &Value) -> CodecError {
    CodecError::shape(T::descriptor(), value.kind())
}

macro_rules! impl_wire_unsigned {
    ($($ty:ty => $width:expr),* $(,)?) => {
        $(
            impl WireType for $ty {
                fn descriptor() -> Descriptor {
                    Descriptor::Unsigned($width)
                }

                fn to_value(&self) -> Value {
                    Value::Unsigned(*self as u128)
                }

                fn from_value(value: Value) -> Result<Self, CodecError> {
                    match value {
                        Value::Unsigned(v) => {
                            <$ty>::try_from(v).map_err(|_| CodecError::range(v, $width, false))
                        }
                        other => Err(mismatch::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

macro_rules! impl_wire_signed {
    ($($ty:ty => $width:expr),* $(,)?) => {
        $(
            impl WireType for $ty {
                fn descriptor() -> Descriptor {
                    Descriptor::Signed($width)
                }

                fn to_value(&self) -> Value {
                    Value::Signed(*self as i128)
                }

                fn from_value(value: Value) -> Result<Self, CodecError> {
                    match value {
                        Value::Signed(v) => {
                            <$ty>::try_from(v).map_err(|_| CodecError::range(v, $width, true))
                        }
                        other => Err(mismatch::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

impl_wire_unsigned!(
    u8 => BitWidth::U8,
    u16 => BitWidth::U16,
    u32 => BitWidth::U32,
    u64 => BitWidth::U64,
    u128 => BitWidth::U128,
);

impl_wire_signed!(
    i8 => BitWidth::U8,
    i16 => BitWidth::U16,
    i32 => BitWidth::U32,
    i64 => BitWidth::U64,
    i128 => BitWidth::U128,
);

impl WireType for bool {
    fn descriptor() -> Descriptor {
        Descriptor::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl WireType for Felt {
    fn descriptor() -> Descriptor {
        Descriptor::Felt
    }

    fn to_value(&self) -> Value {
        Value::Felt(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Felt(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

/// `FixedPoint` travels at the protocol scale (`k = 32`).
impl WireType for FixedPoint {
    fn descriptor() -> Descriptor {
        Descriptor::fixed64()
    }

    fn to_value(&self) -> Value {
        Value::FixedPoint(*self)
    }

    fn from_value(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::FixedPoint(v) if v.scale() == FIXED_POINT_SCALE => Ok(v),
            Value::FixedPoint(v) => Err(CodecError::ScaleMismatch {
                expected: FIXED_POINT_SCALE,
                got: v.scale(),
            }),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

/// Variable-length byte string; distinct from `Vec<u8>`, which is a
/// sequence of `u8` scalars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteString(pub Vec<u8>);

impl From<&str> for ByteString {
    fn from(value: &str) -> Self {
        ByteString(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(value: Vec<u8>) -> Self {
        ByteString(value)
    }
}

impl WireType for ByteString {
    fn descriptor() -> Descriptor {
        Descriptor::ByteString
    }

    fn to_value(&self) -> Value {
        Value::Bytes(self.0.clone())
    }

    fn from_value(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Bytes(v) => Ok(ByteString(v)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: WireType> WireType for Vec<T> {
    fn descriptor() -> Descriptor {
        Descriptor::sequence(T::descriptor())
    }

    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(WireType::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Sequence(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| T::from_value(item).map_err(|e| e.in_element(index)))
                .collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

/// Unpack the fields of a record value, checking the arity.
#[doc(hidden)]
pub fn take_fields(
    value: Value,
    descriptor: Descriptor,
    expected: usize,
) -> Result<std::vec::IntoIter<Value>, CodecError> {
    match value {
        Value::Record(fields) if fields.len() == expected => Ok(fields.into_iter()),
        Value::Record(fields) => Err(CodecError::shape(
            format!("{descriptor} with {expected} fields"),
            format!("{} fields", fields.len()),
        )),
        other => Err(CodecError::shape(descriptor, other.kind())),
    }
}

/// Convert the next record field, attaching its name and position on failure.
#[doc(hidden)]
pub fn next_field<T: WireType>(
    fields: &mut std::iter::Enumerate<std::vec::IntoIter<Value>>,
    name: &str,
) -> Result<T, CodecError> {
    match fields.next() {
        Some((position, field)) => {
            T::from_value(field).map_err(|e| e.in_field(position, name))
        }
        None => Err(CodecError::shape(name, "missing field")),
    }
}

macro_rules! impl_wire_tuple {
    ($($name:ident : $index:tt),+) => {
        impl<$($name: WireType),+> WireType for ($($name,)+) {
            fn descriptor() -> Descriptor {
                Descriptor::Tuple(vec![$($name::descriptor()),+])
            }

            fn to_value(&self) -> Value {
                Value::Tuple(vec![$(self.$index.to_value()),+])
            }

            fn from_value(value: Value) -> Result<Self, CodecError> {
                const ARITY: usize = [$($index),+].len();
                match value {
                    Value::Tuple(items) if items.len() == ARITY => {
                        let mut items = items.into_iter();
                        Ok(($(
                            match items.next() {
                                Some(item) => $name::from_value(item).map_err(|e| e.in_item($index))?,
                                None => return Err(CodecError::shape(Self::descriptor(), "short tuple")),
                            },
                        )+))
                    }
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    };
}

impl_wire_tuple!(A: 0);
impl_wire_tuple!(A: 0, B: 1);
impl_wire_tuple!(A: 0, B: 1, C: 2);
impl_wire_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_wire_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_wire_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_wire_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_wire_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
impl_wire_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8);
impl_wire_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9);
impl_wire_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10);
impl_wire_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11);

/// Declare a struct that travels as a record, fields in declaration order.
///
/// ```
/// use oracle_codec::{ByteString, decode_typed, encode_typed, wire_record};
///
/// wire_record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Quote {
///         pub id: u32,
///         pub delta: i64,
///         pub memo: ByteString,
///     }
/// }
///
/// let quote = Quote { id: 7, delta: -3, memo: "ok".into() };
/// let bytes = encode_typed(&quote).unwrap();
/// assert_eq!(decode_typed::<Quote>(&bytes).unwrap(), quote);
/// ```
#[macro_export]
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($fvis:vis $field:ident : $ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($fvis $field: $ty),*
        }

        impl $crate::WireType for $name {
            fn descriptor() -> $crate::Descriptor {
                $crate::Descriptor::Record($crate::RecordDescriptor::new(
                    stringify!($name),
                    vec![$(
                        $crate::FieldDescriptor::new(
                            stringify!($field),
                            <$ty as $crate::WireType>::descriptor(),
                        )
                    ),*],
                ))
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Record(vec![$(
                    $crate::WireType::to_value(&self.$field)
                ),*])
            }

            fn from_value(value: $crate::Value) -> Result<Self, $crate::CodecError> {
                let names: &[&str] = &[$(stringify!($field)),*];
                let mut fields = $crate::typed::take_fields(
                    value,
                    <Self as $crate::WireType>::descriptor(),
                    names.len(),
                )?
                .enumerate();
                Ok(Self {
                    $($field: $crate::typed::next_field::<$ty>(&mut fields, stringify!($field))?),*
                })
            }
        }
    };
}
