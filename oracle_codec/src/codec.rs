//! Recursive encode and decode over a [`Descriptor`].

use crate::WORD_SIZE;
use crate::bytes::{byte_string_words, decode_byte_string, encode_byte_string};
use crate::cursor::{WordReader, WordWriter, felts_to_bytes};
use crate::descriptor::{Descriptor, RecordDescriptor};
use crate::error::CodecError;
use crate::felt::Felt;
use crate::fixed::FixedPoint;
use crate::scalar::{
    decode_bool, decode_signed, decode_unsigned, encode_bool, encode_signed, encode_unsigned,
};
use crate::types::BitWidth;
use crate::value::Value;

/// Width of sequence and byte-string length prefixes.
const LENGTH_WIDTH: BitWidth = BitWidth::U32;

/// Encode `value` as described by `descriptor`.
///
/// Nothing is returned unless the whole value encodes.
pub fn encode(value: &Value, descriptor: &Descriptor) -> Result<Vec<u8>, CodecError> {
    let mut writer = WordWriter::new();
    write_value(&mut writer, value, descriptor)?;
    Ok(writer.into_bytes())
}

/// Encode `value` into field elements rather than bytes.
pub fn encode_felts(value: &Value, descriptor: &Descriptor) -> Result<Vec<Felt>, CodecError> {
    let mut writer = WordWriter::new();
    write_value(&mut writer, value, descriptor)?;
    Ok(writer.into_felts())
}

/// Decode one value of shape `descriptor`, requiring every byte to be used.
pub fn decode(bytes: &[u8], descriptor: &Descriptor) -> Result<Value, CodecError> {
    let mut reader = WordReader::new(bytes);
    let value = read_value(&mut reader, descriptor)?;
    reader.ensure_consumed()?;
    Ok(value)
}

/// Decode one value from a slice of field elements.
pub fn decode_felts(felts: &[Felt], descriptor: &Descriptor) -> Result<Value, CodecError> {
    decode(&felts_to_bytes(felts), descriptor)
}

/// Encoded size of `value` in bytes, computed without encoding it.
pub fn encoded_len(value: &Value, descriptor: &Descriptor) -> Result<usize, CodecError> {
    Ok(count_words(value, descriptor)? * WORD_SIZE)
}

fn count_words(value: &Value, descriptor: &Descriptor) -> Result<usize, CodecError> {
    match (descriptor, value) {
        (Descriptor::ByteString, Value::Bytes(bytes)) => Ok(byte_string_words(bytes.len())),
        (Descriptor::Sequence(element), Value::Sequence(items)) => {
            check_element_width(element)?;
            items.iter().try_fold(1, |acc, item| Ok(acc + count_words(item, element)?))
        }
        (Descriptor::Record(record), Value::Record(fields)) => {
            check_arity(record.fields.len(), fields.len(), descriptor)?;
            record
                .fields
                .iter()
                .zip(fields)
                .try_fold(0, |acc, (field, value)| {
                    Ok(acc + count_words(value, &field.descriptor)?)
                })
        }
        (Descriptor::Tuple(items), Value::Tuple(values)) => {
            check_arity(items.len(), values.len(), descriptor)?;
            items
                .iter()
                .zip(values)
                .try_fold(0, |acc, (item, value)| Ok(acc + count_words(value, item)?))
        }
        (
            Descriptor::Unsigned(_)
            | Descriptor::Signed(_)
            | Descriptor::Bool
            | Descriptor::Felt
            | Descriptor::FixedPoint { .. },
            _,
        ) => {
            check_scalar_kind(value, descriptor)?;
            Ok(1)
        }
        _ => Err(CodecError::shape(descriptor, value.kind())),
    }
}

fn check_scalar_kind(value: &Value, descriptor: &Descriptor) -> Result<(), CodecError> {
    let matches = matches!(
        (descriptor, value),
        (Descriptor::Unsigned(_), Value::Unsigned(_))
            | (Descriptor::Signed(_), Value::Signed(_))
            | (Descriptor::Bool, Value::Bool(_))
            | (Descriptor::Felt, Value::Felt(_))
            | (Descriptor::FixedPoint { .. }, Value::FixedPoint(_))
    );
    if matches {
        Ok(())
    } else {
        Err(CodecError::shape(descriptor, value.kind()))
    }
}

fn check_arity(expected: usize, found: usize, descriptor: &Descriptor) -> Result<(), CodecError> {
    if expected != found {
        return Err(CodecError::shape(
            format!("{descriptor} with {expected} fields"),
            format!("{found} fields"),
        ));
    }
    Ok(())
}

/// Sequence elements must take at least one word, otherwise the count alone
/// would decide how much is allocated.
fn check_element_width(element: &Descriptor) -> Result<(), CodecError> {
    if element.fixed_words() == Some(0) {
        return Err(CodecError::shape(
            "sequence element of at least one word",
            element,
        ));
    }
    Ok(())
}

fn write_value(
    out: &mut WordWriter,
    value: &Value,
    descriptor: &Descriptor,
) -> Result<(), CodecError> {
    match (descriptor, value) {
        (Descriptor::Unsigned(width), Value::Unsigned(v)) => {
            out.push(encode_unsigned(*v, *width)?);
        }
        (Descriptor::Signed(width), Value::Signed(v)) => {
            out.push(encode_signed(*v, *width)?);
        }
        (Descriptor::Bool, Value::Bool(v)) => out.push(encode_bool(*v)),
        (Descriptor::Felt, Value::Felt(v)) => out.push(v.clone()),
        (Descriptor::FixedPoint { scale }, Value::FixedPoint(v)) => {
            out.push(v.encode_at(*scale)?);
        }
        (Descriptor::ByteString, Value::Bytes(bytes)) => encode_byte_string(bytes, out)?,
        (Descriptor::Record(record), Value::Record(fields)) => {
            check_arity(record.fields.len(), fields.len(), descriptor)?;
            for (position, (field, value)) in record.fields.iter().zip(fields).enumerate() {
                write_value(out, value, &field.descriptor)
                    .map_err(|e| e.in_field(position, &field.name))?;
            }
        }
        (Descriptor::Sequence(element), Value::Sequence(items)) => {
            check_element_width(element)?;
            out.push(encode_unsigned(items.len() as u128, LENGTH_WIDTH)?);
            for (index, item) in items.iter().enumerate() {
                write_value(out, item, element).map_err(|e| e.in_element(index))?;
            }
        }
        (Descriptor::Tuple(items), Value::Tuple(values)) => {
            check_arity(items.len(), values.len(), descriptor)?;
            for (position, (item, value)) in items.iter().zip(values).enumerate() {
                write_value(out, value, item).map_err(|e| e.in_item(position))?;
            }
        }
        _ => return Err(CodecError::shape(descriptor, value.kind())),
    }
    Ok(())
}

fn read_value(reader: &mut WordReader<'_>, descriptor: &Descriptor) -> Result<Value, CodecError> {
    let value = match descriptor {
        Descriptor::Unsigned(width) => Value::Unsigned(decode_unsigned(&reader.read_word()?, *width)?),
        Descriptor::Signed(width) => Value::Signed(decode_signed(&reader.read_word()?, *width)?),
        Descriptor::Bool => Value::Bool(decode_bool(&reader.read_word()?)?),
        Descriptor::Felt => Value::Felt(reader.read_word()?),
        Descriptor::FixedPoint { scale } => {
            Value::FixedPoint(FixedPoint::decode(&reader.read_word()?, *scale)?)
        }
        Descriptor::ByteString => Value::Bytes(decode_byte_string(reader)?),
        Descriptor::Record(record) => Value::Record(read_record(reader, record)?),
        Descriptor::Sequence(element) => {
            check_element_width(element)?;
            let count = decode_unsigned(&reader.read_word()?, LENGTH_WIDTH)? as usize;
            reader.require_words(count)?;
            let mut items = Vec::with_capacity(count.min(reader.remaining_words()));
            for index in 0..count {
                items.push(read_value(reader, element).map_err(|e| e.in_element(index))?);
            }
            Value::Sequence(items)
        }
        Descriptor::Tuple(items) => {
            let mut values = Vec::with_capacity(items.len());
            for (position, item) in items.iter().enumerate() {
                values.push(read_value(reader, item).map_err(|e| e.in_item(position))?);
            }
            Value::Tuple(values)
        }
    };
    Ok(value)
}

fn read_record(
    reader: &mut WordReader<'_>,
    record: &RecordDescriptor,
) -> Result<Vec<Value>, CodecError> {
    record
        .fields
        .iter()
        .enumerate()
        .map(|(position, field)| {
            read_value(reader, &field.descriptor).map_err(|e| e.in_field(position, &field.name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Descriptor {
        Descriptor::record(
            "Pair",
            [
                ("a", Descriptor::Unsigned(BitWidth::U32)),
                ("b", Descriptor::Signed(BitWidth::U64)),
            ],
        )
    }

    #[test]
    fn test_record_round_trip() {
        let value = Value::Record(vec![Value::Unsigned(1), Value::Signed(-2)]);
        let bytes = encode(&value, &pair()).unwrap();
        assert_eq!(bytes.len(), 2 * WORD_SIZE);
        assert_eq!(decode(&bytes, &pair()).unwrap(), value);
    }

    #[test]
    fn test_truncated_record_names_the_field() {
        let value = Value::Record(vec![Value::Unsigned(1), Value::Signed(-2)]);
        let bytes = encode(&value, &pair()).unwrap();
        let err = decode(&bytes[..WORD_SIZE + 3], &pair()).unwrap_err();

        assert_eq!(err.path(), ".b");
        assert!(matches!(
            err,
            CodecError::Field { position: 1, ref name, .. } if name == "b"
        ));
        assert!(matches!(err.root(), CodecError::TruncatedData { .. }));
    }

    #[test]
    fn test_empty_sequence() {
        let descriptor = Descriptor::sequence(Descriptor::Signed(BitWidth::U32));
        let value = Value::Sequence(vec![]);
        let bytes = encode(&value, &descriptor).unwrap();
        assert_eq!(bytes, vec![0u8; WORD_SIZE]);
        assert_eq!(decode(&bytes, &descriptor).unwrap(), value);
    }

    #[test]
    fn test_sequence_count_beyond_payload_is_truncated() {
        let descriptor = Descriptor::sequence(Descriptor::Unsigned(BitWidth::U8));
        let felts = vec![Felt::from(3u32), Felt::from(1u32), Felt::from(2u32)];
        assert!(matches!(
            decode_felts(&felts, &descriptor),
            Err(CodecError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_sequence_of_empty_records_is_rejected() {
        let descriptor =
            Descriptor::sequence(Descriptor::Record(RecordDescriptor::new("Empty", vec![])));
        assert!(matches!(
            decode_felts(&[Felt::from(20_000_000u32)], &descriptor),
            Err(CodecError::ShapeMismatch { .. })
        ));
        let value = Value::Sequence(vec![Value::Record(vec![])]);
        assert!(matches!(
            encode(&value, &descriptor),
            Err(CodecError::ShapeMismatch { .. })
        ));
        assert!(encoded_len(&value, &descriptor).is_err());
    }

    #[test]
    fn test_sequence_element_error_is_indexed() {
        let descriptor = Descriptor::sequence(Descriptor::Bool);
        let felts = vec![Felt::from(2u32), Felt::from(1u32), Felt::from(5u32)];
        let err = decode_felts(&felts, &descriptor).unwrap_err();
        assert_eq!(err.path(), "[1]");
        assert!(matches!(err.root(), CodecError::InvalidBoolean { .. }));
    }

    #[test]
    fn test_shape_mismatch_on_encode() {
        let err = encode(&Value::Bool(true), &Descriptor::Felt).unwrap_err();
        assert!(matches!(err, CodecError::ShapeMismatch { .. }));

        let short = Value::Record(vec![Value::Unsigned(1)]);
        assert!(matches!(
            encode(&short, &pair()),
            Err(CodecError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_heterogeneous_sequence_is_rejected() {
        let descriptor = Descriptor::sequence(Descriptor::Unsigned(BitWidth::U32));
        let value = Value::Sequence(vec![Value::Unsigned(1), Value::Signed(1)]);
        let err = encode(&value, &descriptor).unwrap_err();
        assert_eq!(err.path(), "[1]");
        assert!(matches!(err.root(), CodecError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_encode_range_error_is_tagged() {
        let value = Value::Record(vec![Value::Unsigned(u64::MAX as u128), Value::Signed(0)]);
        let err = encode(&value, &pair()).unwrap_err();
        assert_eq!(err.path(), ".a");
        assert!(matches!(err.root(), CodecError::Range { .. }));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = encode(&Value::Bool(true), &Descriptor::Bool).unwrap();
        bytes.push(0);
        assert_eq!(
            decode(&bytes, &Descriptor::Bool),
            Err(CodecError::TrailingData { remaining: 1 })
        );
    }

    #[test]
    fn test_encoded_len_matches_encoding() {
        let descriptor = Descriptor::tuple([
            Descriptor::ByteString,
            Descriptor::sequence(pair()),
            Descriptor::fixed64(),
        ]);
        let value = Value::Tuple(vec![
            Value::bytes("Hello world, how are you doing today?"),
            Value::Sequence(vec![
                Value::Record(vec![Value::Unsigned(1), Value::Signed(2)]),
                Value::Record(vec![Value::Unsigned(3), Value::Signed(-4)]),
            ]),
            Value::FixedPoint(FixedPoint::from_raw_default(1 << 31)),
        ]);
        let bytes = encode(&value, &descriptor).unwrap();
        assert_eq!(encoded_len(&value, &descriptor).unwrap(), bytes.len());
        assert_eq!(bytes.len(), (4 + 5 + 1) * WORD_SIZE);
    }

    #[test]
    fn test_fixed_point_scale_checked_against_descriptor() {
        let value = Value::FixedPoint(FixedPoint::from_raw(1, 16));
        assert!(matches!(
            encode(&value, &Descriptor::fixed64()),
            Err(CodecError::ScaleMismatch { .. })
        ));
    }

    #[test]
    fn test_felts_and_bytes_agree() {
        let value = Value::Tuple(vec![Value::Signed(-5), Value::Felt(Felt::from(9u32))]);
        let descriptor = Descriptor::tuple([Descriptor::Signed(BitWidth::U8), Descriptor::Felt]);
        let felts = encode_felts(&value, &descriptor).unwrap();
        assert_eq!(felts, vec![Felt::from(-5i64), Felt::from(9u32)]);
        assert_eq!(felts_to_bytes(&felts), encode(&value, &descriptor).unwrap());
        assert_eq!(decode_felts(&felts, &descriptor).unwrap(), value);
    }
}
