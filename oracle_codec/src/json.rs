//! Conversion between JSON documents and [`Value`] trees.
//!
//! The descriptor drives both directions: records map to objects keyed by
//! field name, sequences and tuples to arrays. Felts are read from decimal,
//! `0x` hex or short strings and written as `0x` hex. Integers outside the
//! 64-bit JSON number range travel as decimal strings.

use serde_json::{Map, Number, Value as Json};

use crate::descriptor::Descriptor;
use crate::error::CodecError;
use crate::felt::Felt;
use crate::fixed::FixedPoint;
use crate::types::BitWidth;
use crate::value::Value;

/// Error converting between JSON and a value. `path` locates the failure,
/// `$` being the document root.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JsonError {
    #[error("{path}: expected {expected}, found {found}")]
    Expected {
        path: String,
        expected: String,
        found: String,
    },
    #[error("{path}: missing field `{field}`")]
    MissingField { path: String, field: String },
    #[error("{path}: {source}")]
    Codec {
        path: String,
        #[source]
        source: CodecError,
    },
    #[error("{path}: byte string is not valid UTF-8")]
    NonUtf8 { path: String },
}

fn expected(path: &str, expected: impl ToString, found: &Json) -> JsonError {
    JsonError::Expected {
        path: path.to_string(),
        expected: expected.to_string(),
        found: json_kind(found).to_string(),
    }
}

fn codec(path: &str, source: CodecError) -> JsonError {
    JsonError::Codec {
        path: path.to_string(),
        source,
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Build a value of shape `descriptor` from a JSON document.
pub fn value_from_json(json: &Json, descriptor: &Descriptor) -> Result<Value, JsonError> {
    from_json(json, descriptor, "$")
}

/// Render a value of shape `descriptor` as JSON.
pub fn value_to_json(value: &Value, descriptor: &Descriptor) -> Result<Json, JsonError> {
    to_json(value, descriptor, "$")
}

fn from_json(json: &Json, descriptor: &Descriptor, path: &str) -> Result<Value, JsonError> {
    match descriptor {
        Descriptor::Unsigned(width) => {
            let value = match json {
                Json::Number(n) => n.as_u64().map(u128::from),
                Json::String(s) => s.parse::<u128>().ok(),
                _ => None,
            }
            .ok_or_else(|| expected(path, descriptor, json))?;
            check_unsigned(value, *width).map_err(|e| codec(path, e))?;
            Ok(Value::Unsigned(value))
        }
        Descriptor::Signed(width) => {
            let value = match json {
                Json::Number(n) => n.as_i64().map(i128::from),
                Json::String(s) => s.parse::<i128>().ok(),
                _ => None,
            }
            .ok_or_else(|| expected(path, descriptor, json))?;
            check_signed(value, *width).map_err(|e| codec(path, e))?;
            Ok(Value::Signed(value))
        }
        Descriptor::Bool => json
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| expected(path, descriptor, json)),
        Descriptor::Felt => felt_from_json(json, path).map(Value::Felt),
        Descriptor::FixedPoint { scale } => {
            let number = json
                .as_f64()
                .ok_or_else(|| expected(path, descriptor, json))?;
            FixedPoint::from_f64(number, *scale)
                .map(Value::FixedPoint)
                .map_err(|e| codec(path, e))
        }
        Descriptor::ByteString => json
            .as_str()
            .map(Value::bytes)
            .ok_or_else(|| expected(path, descriptor, json)),
        Descriptor::Record(record) => {
            let object = json
                .as_object()
                .ok_or_else(|| expected(path, &record.name, json))?;
            let mut fields = Vec::with_capacity(record.fields.len());
            for field in &record.fields {
                let field_path = format!("{path}.{}", field.name);
                let item = object.get(&field.name).ok_or_else(|| JsonError::MissingField {
                    path: path.to_string(),
                    field: field.name.clone(),
                })?;
                fields.push(from_json(item, &field.descriptor, &field_path)?);
            }
            Ok(Value::Record(fields))
        }
        Descriptor::Sequence(element) => {
            let array = json
                .as_array()
                .ok_or_else(|| expected(path, descriptor, json))?;
            array
                .iter()
                .enumerate()
                .map(|(i, item)| from_json(item, element, &format!("{path}[{i}]")))
                .collect::<Result<_, _>>()
                .map(Value::Sequence)
        }
        Descriptor::Tuple(items) => {
            let array = match json.as_array() {
                Some(array) if array.len() == items.len() => array,
                _ => return Err(expected(path, descriptor, json)),
            };
            array
                .iter()
                .zip(items)
                .enumerate()
                .map(|(i, (item, descriptor))| from_json(item, descriptor, &format!("{path}.{i}")))
                .collect::<Result<_, _>>()
                .map(Value::Tuple)
        }
    }
}

fn check_unsigned(value: u128, width: BitWidth) -> Result<(), CodecError> {
    if value > width.max_unsigned() {
        return Err(CodecError::range(value, width, false));
    }
    Ok(())
}

fn check_signed(value: i128, width: BitWidth) -> Result<(), CodecError> {
    if value < width.min_signed() || value > width.max_signed() {
        return Err(CodecError::range(value, width, true));
    }
    Ok(())
}

/// Numeric strings (decimal or `0x` hex) parse as numbers, anything else as
/// a short string.
fn felt_from_json(json: &Json, path: &str) -> Result<Felt, JsonError> {
    match json {
        Json::Number(n) => match (n.as_u64(), n.as_i64()) {
            (Some(v), _) => Ok(Felt::from(v)),
            (None, Some(v)) => Ok(Felt::from(v)),
            _ => Err(expected(path, "integer field element", json)),
        },
        Json::String(s) if is_numeric(s) => s.parse().map_err(|e| codec(path, e)),
        Json::String(s) => Felt::from_short_string(s).map_err(|e| codec(path, e)),
        _ => Err(expected(path, "field element", json)),
    }
}

fn is_numeric(s: &str) -> bool {
    if s.starts_with("0x") || s.starts_with("0X") {
        return true;
    }
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn mismatch(path: &str, descriptor: &Descriptor, value: &Value) -> JsonError {
    JsonError::Expected {
        path: path.to_string(),
        expected: descriptor.to_string(),
        found: value.kind().to_string(),
    }
}

fn to_json(value: &Value, descriptor: &Descriptor, path: &str) -> Result<Json, JsonError> {
    match (descriptor, value) {
        (Descriptor::Unsigned(_), Value::Unsigned(v)) => Ok(match u64::try_from(*v) {
            Ok(v) => Json::Number(v.into()),
            Err(_) => Json::String(v.to_string()),
        }),
        (Descriptor::Signed(_), Value::Signed(v)) => Ok(match i64::try_from(*v) {
            Ok(v) => Json::Number(v.into()),
            Err(_) => Json::String(v.to_string()),
        }),
        (Descriptor::Bool, Value::Bool(v)) => Ok(Json::Bool(*v)),
        (Descriptor::Felt, Value::Felt(v)) => Ok(Json::String(v.to_hex_string())),
        (Descriptor::FixedPoint { .. }, Value::FixedPoint(v)) => Number::from_f64(v.to_f64())
            .map(Json::Number)
            .ok_or_else(|| mismatch(path, descriptor, value)),
        (Descriptor::ByteString, Value::Bytes(bytes)) => String::from_utf8(bytes.clone())
            .map(Json::String)
            .map_err(|_| JsonError::NonUtf8 {
                path: path.to_string(),
            }),
        (Descriptor::Record(record), Value::Record(fields))
            if record.fields.len() == fields.len() =>
        {
            let mut object = Map::new();
            for (field, value) in record.fields.iter().zip(fields) {
                let field_path = format!("{path}.{}", field.name);
                object.insert(
                    field.name.clone(),
                    to_json(value, &field.descriptor, &field_path)?,
                );
            }
            Ok(Json::Object(object))
        }
        (Descriptor::Sequence(element), Value::Sequence(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| to_json(item, element, &format!("{path}[{i}]")))
            .collect::<Result<_, _>>()
            .map(Json::Array),
        (Descriptor::Tuple(descriptors), Value::Tuple(items))
            if descriptors.len() == items.len() =>
        {
            items
                .iter()
                .zip(descriptors)
                .enumerate()
                .map(|(i, (item, descriptor))| to_json(item, descriptor, &format!("{path}.{i}")))
                .collect::<Result<_, _>>()
                .map(Json::Array)
        }
        _ => Err(mismatch(path, descriptor, value)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Descriptor {
        Descriptor::record(
            "Sample",
            [
                ("id", Descriptor::Unsigned(BitWidth::U32)),
                ("delta", Descriptor::Signed(BitWidth::U64)),
                ("tag", Descriptor::Felt),
                ("price", Descriptor::fixed64()),
                ("memo", Descriptor::ByteString),
                ("flags", Descriptor::sequence(Descriptor::Bool)),
            ],
        )
    }

    #[test]
    fn test_from_json() {
        let value = value_from_json(
            &json!({
                "id": 7,
                "delta": -12,
                "tag": "Hello World",
                "price": 1.5,
                "memo": "hi",
                "flags": [true, false],
                "ignored": null
            }),
            &sample(),
        )
        .unwrap();
        assert_eq!(
            value,
            Value::Record(vec![
                Value::Unsigned(7),
                Value::Signed(-12),
                Value::Felt(Felt::from_short_string("Hello World").unwrap()),
                Value::FixedPoint(FixedPoint::from_raw(3 << 31, 32)),
                Value::bytes("hi"),
                Value::Sequence(vec![Value::Bool(true), Value::Bool(false)]),
            ])
        );
    }

    #[test]
    fn test_to_json() {
        let value = Value::Record(vec![
            Value::Unsigned(7),
            Value::Signed(-12),
            Value::Felt(Felt::from(255u32)),
            Value::FixedPoint(FixedPoint::from_raw(-(1 << 31), 32)),
            Value::bytes("hi"),
            Value::Sequence(vec![]),
        ]);
        assert_eq!(
            value_to_json(&value, &sample()).unwrap(),
            json!({
                "id": 7,
                "delta": -12,
                "tag": "0xff",
                "price": -0.5,
                "memo": "hi",
                "flags": []
            })
        );
    }

    #[test]
    fn test_felt_forms() {
        let d = Descriptor::Felt;
        let decimal = value_from_json(&json!("255"), &d).unwrap();
        assert_eq!(decimal, value_from_json(&json!("0xff"), &d).unwrap());
        assert_eq!(decimal, value_from_json(&json!(255), &d).unwrap());
        assert_eq!(
            value_from_json(&json!(-1), &d).unwrap(),
            Value::Felt(-Felt::from(1u32))
        );
    }

    #[test]
    fn test_wide_integers_use_strings() {
        let d = Descriptor::Unsigned(BitWidth::U128);
        let big = Value::Unsigned(u128::MAX);
        let rendered = value_to_json(&big, &d).unwrap();
        assert_eq!(rendered, json!(u128::MAX.to_string()));
        assert_eq!(value_from_json(&rendered, &d).unwrap(), big);
    }

    #[test]
    fn test_range_error_carries_path() {
        let err = value_from_json(
            &json!({"id": 1, "delta": 0, "tag": "0x0", "price": 0, "memo": "", "flags": [true, 2]}),
            &sample(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            JsonError::Expected {
                path: "$.flags[1]".into(),
                expected: "bool".into(),
                found: "number".into(),
            }
        );

        let err = value_from_json(&json!(256), &Descriptor::Unsigned(BitWidth::U8)).unwrap_err();
        assert!(matches!(err, JsonError::Codec { source: CodecError::Range { .. }, .. }));
    }

    #[test]
    fn test_missing_field() {
        let err = value_from_json(&json!({"id": 1}), &sample()).unwrap_err();
        assert_eq!(
            err,
            JsonError::MissingField {
                path: "$".into(),
                field: "delta".into(),
            }
        );
    }

    #[test]
    fn test_non_utf8_bytes() {
        let err = value_to_json(&Value::bytes([0xff, 0xfe]), &Descriptor::ByteString).unwrap_err();
        assert_eq!(err, JsonError::NonUtf8 { path: "$".into() });
    }

    #[test]
    fn test_tuple_arity() {
        let d = Descriptor::tuple([Descriptor::Bool, Descriptor::Bool]);
        assert!(value_from_json(&json!([true]), &d).is_err());
        assert_eq!(
            value_from_json(&json!([true, false]), &d).unwrap(),
            Value::Tuple(vec![Value::Bool(true), Value::Bool(false)])
        );
    }
}
