//! Dynamic value tree mirroring [`Descriptor`](crate::Descriptor).

use crate::felt::Felt;
use crate::fixed::FixedPoint;

/// A decoded (or to-be-encoded) value.
///
/// Record fields and tuple items are positional; names live in the
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Unsigned(u128),
    Signed(i128),
    Bool(bool),
    Felt(Felt),
    FixedPoint(FixedPoint),
    Bytes(Vec<u8>),
    Record(Vec<Value>),
    Sequence(Vec<Value>),
    Tuple(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in shape mismatch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Unsigned(_) => "unsigned integer",
            Value::Signed(_) => "signed integer",
            Value::Bool(_) => "bool",
            Value::Felt(_) => "felt",
            Value::FixedPoint(_) => "fixed-point",
            Value::Bytes(_) => "bytes",
            Value::Record(_) => "record",
            Value::Sequence(_) => "sequence",
            Value::Tuple(_) => "tuple",
        }
    }

    pub fn bytes(value: impl AsRef<[u8]>) -> Self {
        Value::Bytes(value.as_ref().to_vec())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Felt> for Value {
    fn from(value: Felt) -> Self {
        Value::Felt(value)
    }
}

impl From<FixedPoint> for Value {
    fn from(value: FixedPoint) -> Self {
        Value::FixedPoint(value)
    }
}
