//! Static shape descriptions that parameterize the codec.

use std::fmt;

use crate::FIXED_POINT_SCALE;
use crate::types::BitWidth;

/// Shape of an encoded value.
///
/// Built once per declared type and shared by both sides of an oracle call.
/// Composite variants nest descriptors, and the codec walks this tree with a
/// single recursive match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Descriptor {
    Unsigned(BitWidth),
    Signed(BitWidth),
    Bool,
    Felt,
    FixedPoint { scale: u32 },
    ByteString,
    Record(RecordDescriptor),
    Sequence(Box<Descriptor>),
    Tuple(Vec<Descriptor>),
}

impl Descriptor {
    /// Fixed-point at the protocol scale (`k = 32`).
    pub fn fixed64() -> Self {
        Descriptor::FixedPoint {
            scale: FIXED_POINT_SCALE,
        }
    }

    pub fn sequence(element: Descriptor) -> Self {
        Descriptor::Sequence(Box::new(element))
    }

    pub fn record<N, I>(name: N, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (&'static str, Descriptor)>,
    {
        Descriptor::Record(RecordDescriptor::new(
            name,
            fields
                .into_iter()
                .map(|(name, descriptor)| FieldDescriptor::new(name, descriptor))
                .collect(),
        ))
    }

    pub fn tuple(items: impl IntoIterator<Item = Descriptor>) -> Self {
        Descriptor::Tuple(items.into_iter().collect())
    }

    /// Number of words taken by every value of this shape, or `None` when the
    /// size depends on the value (sequences and byte strings).
    pub fn fixed_words(&self) -> Option<usize> {
        match self {
            Descriptor::Unsigned(_)
            | Descriptor::Signed(_)
            | Descriptor::Bool
            | Descriptor::Felt
            | Descriptor::FixedPoint { .. } => Some(1),
            Descriptor::ByteString | Descriptor::Sequence(_) => None,
            Descriptor::Record(record) => record
                .fields
                .iter()
                .map(|field| field.descriptor.fixed_words())
                .sum(),
            Descriptor::Tuple(items) => items.iter().map(Descriptor::fixed_words).sum(),
        }
    }
}

/// Named, ordered fields of a record. Field order is part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub name: String,
    pub descriptor: Descriptor,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, descriptor: Descriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Unsigned(width) => write!(f, "u{}", u32::from(*width)),
            Descriptor::Signed(width) => write!(f, "i{}", u32::from(*width)),
            Descriptor::Bool => f.write_str("bool"),
            Descriptor::Felt => f.write_str("felt"),
            Descriptor::FixedPoint { scale } => write!(f, "fixed<{scale}>"),
            Descriptor::ByteString => f.write_str("bytes"),
            Descriptor::Record(record) => write!(f, "{record}"),
            Descriptor::Sequence(element) => write!(f, "sequence<{element}>"),
            Descriptor::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for RecordDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.name, field.descriptor)?;
        }
        f.write_str("}")
    }
}
