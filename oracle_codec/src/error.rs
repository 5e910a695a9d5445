//! Error types for encoding, decoding and message body framing.

use crate::types::BitWidth;

/// Error raised while encoding or decoding a value against its descriptor.
///
/// Leaf variants describe what went wrong; `Field`, `Item` and `Element`
/// wrap a leaf with the location inside a composite value. Use
/// [`CodecError::root`] to reach the leaf and [`CodecError::path`] for a
/// printable location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Integer magnitude does not fit the declared width.
    #[error("{value} does not fit {}", integer_type(.width, .signed))]
    Range {
        value: String,
        width: BitWidth,
        signed: bool,
    },
    /// Raw word is not a canonical residue (`raw >= P`).
    #[error("word {raw} is not below the field prime")]
    FieldRange { raw: String },
    /// Boolean word other than 0 or 1.
    #[error("invalid boolean word {raw}, expected 0 or 1")]
    InvalidBoolean { raw: String },
    /// Scaled fixed-point value does not fit the underlying 64-bit integer.
    #[error("fixed-point value {value} overflows the scaled 64-bit range")]
    Overflow { value: String },
    /// Fixed-point operands or descriptor disagree on the exponent.
    #[error("fixed-point scale mismatch, expected 2^{expected} got 2^{got}")]
    ScaleMismatch { expected: u32, got: u32 },
    /// Fewer bytes remain than the value being read requires.
    #[error("truncated data, needed {needed} bytes but only {available} remain")]
    TruncatedData { needed: usize, available: usize },
    /// Byte-string padding disagrees with the declared fill count.
    #[error("byte string padding mismatch: {reason}")]
    PaddingMismatch { reason: String },
    /// Value does not have the shape the descriptor declares.
    #[error("shape mismatch, expected {expected} got {found}")]
    ShapeMismatch { expected: String, found: String },
    /// Bytes remain after the top-level value was decoded.
    #[error("{remaining} trailing bytes after decoded value")]
    TrailingData { remaining: usize },
    /// Failure inside a named record field.
    #[error("field `{name}` (position {position}): {source}")]
    Field {
        position: usize,
        name: String,
        #[source]
        source: Box<CodecError>,
    },
    /// Failure inside a tuple item.
    #[error("item {position}: {source}")]
    Item {
        position: usize,
        #[source]
        source: Box<CodecError>,
    },
    /// Failure inside a sequence element.
    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<CodecError>,
    },
}

fn integer_type(width: &BitWidth, signed: &bool) -> String {
    let prefix = if *signed { 'i' } else { 'u' };
    format!("{prefix}{}", u32::from(*width))
}

impl CodecError {
    pub(crate) fn range(value: impl ToString, width: BitWidth, signed: bool) -> Self {
        CodecError::Range {
            value: value.to_string(),
            width,
            signed,
        }
    }

    pub(crate) fn shape(expected: impl ToString, found: impl ToString) -> Self {
        CodecError::ShapeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub(crate) fn padding(reason: impl Into<String>) -> Self {
        CodecError::PaddingMismatch {
            reason: reason.into(),
        }
    }

    pub(crate) fn in_field(self, position: usize, name: &str) -> Self {
        CodecError::Field {
            position,
            name: name.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_item(self, position: usize) -> Self {
        CodecError::Item {
            position,
            source: Box::new(self),
        }
    }

    pub(crate) fn in_element(self, index: usize) -> Self {
        CodecError::Element {
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, with all location wrappers removed.
    pub fn root(&self) -> &CodecError {
        match self {
            CodecError::Field { source, .. }
            | CodecError::Item { source, .. }
            | CodecError::Element { source, .. } => source.root(),
            leaf => leaf,
        }
    }

    /// Location of the failure inside the value, e.g. `.d[1].b`.
    ///
    /// Empty when the failure is at the top level.
    pub fn path(&self) -> String {
        let mut path = String::new();
        let mut current = self;
        loop {
            match current {
                CodecError::Field { name, source, .. } => {
                    path.push('.');
                    path.push_str(name);
                    current = source;
                }
                CodecError::Item { position, source } => {
                    path.push_str(&format!(".{position}"));
                    current = source;
                }
                CodecError::Element { index, source } => {
                    path.push_str(&format!("[{index}]"));
                    current = source;
                }
                _ => return path,
            }
        }
    }
}

/// Error type for peeking version from a message body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeekError {
    /// Data is too short to contain a valid header.
    #[error("data too short to contain valid header")]
    TooShort,
    /// Magic bytes do not match expected value.
    #[error("invalid magic bytes")]
    InvalidMagic,
    /// Version field is corrupt or unreadable.
    #[error("version field is corrupt or unreadable")]
    InvalidVersion,
}

/// Error type for message body deserialization.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    /// Error peeking the version header.
    #[error("header validation failed: {0}")]
    Peek(#[from] PeekError),
    /// Version is not supported.
    #[error("unsupported version {got}, expected {expected}")]
    UnsupportedVersion { got: u32, expected: u32 },
    /// Error deserializing the payload.
    #[error("payload deserialization failed")]
    Payload(#[source] rmp_serde::decode::Error),
}

/// Error type for message body serialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// Arguments or results could not be encoded.
    #[error("value encoding failed: {0}")]
    Codec(#[from] CodecError),
    /// Error serializing the payload.
    #[error("payload serialization failed")]
    Payload(#[source] rmp_serde::encode::Error),
}
