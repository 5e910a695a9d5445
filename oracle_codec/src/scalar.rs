//! Scalar codec: integers, booleans and field elements, one word each.

use crate::error::CodecError;
use crate::felt::Felt;
use crate::types::BitWidth;

/// Encode an unsigned integer of the declared width.
pub fn encode_unsigned(value: u128, width: BitWidth) -> Result<Felt, CodecError> {
    if value > width.max_unsigned() {
        return Err(CodecError::range(value, width, false));
    }
    Ok(Felt::from(value))
}

/// Decode an unsigned integer, checking the magnitude against the declared width.
pub fn decode_unsigned(word: &Felt, width: BitWidth) -> Result<u128, CodecError> {
    match word.to_u128() {
        Some(value) if value <= width.max_unsigned() => Ok(value),
        _ => Err(CodecError::range(word, width, false)),
    }
}

/// Encode a signed integer; negative values become `P + value`.
pub fn encode_signed(value: i128, width: BitWidth) -> Result<Felt, CodecError> {
    if value < width.min_signed() || value > width.max_signed() {
        return Err(CodecError::range(value, width, true));
    }
    Ok(Felt::from(value))
}

/// Decode a signed integer.
///
/// Words above `(P - 1) / 2` are negative with magnitude `P - word`. The
/// reconstructed value must fit the declared width.
pub fn decode_signed(word: &Felt, width: BitWidth) -> Result<i128, CodecError> {
    let out_of_range = || CodecError::range(word, width, true);
    if word.is_upper_half() {
        let magnitude = u128::try_from(&word.negated_magnitude()).map_err(|_| out_of_range())?;
        // i128::MIN has magnitude 2^127, which wraps onto itself
        let value = (magnitude as i128).wrapping_neg();
        if magnitude > width.min_signed().unsigned_abs() {
            return Err(out_of_range());
        }
        Ok(value)
    } else {
        match word.to_u128() {
            Some(value) if value <= width.max_signed() as u128 => Ok(value as i128),
            _ => Err(out_of_range()),
        }
    }
}

pub fn encode_bool(value: bool) -> Felt {
    Felt::from(value)
}

pub fn decode_bool(word: &Felt) -> Result<bool, CodecError> {
    match word.to_u128() {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(CodecError::InvalidBoolean {
            raw: word.to_hex_string(),
        }),
    }
}
