//! Fixed-point numbers stored as `raw / 2^scale`.
//!
//! Encoding a rational rounds `value * 2^scale` to the nearest integer with
//! ties going to the even neighbour. Decoding is exact through [`FixedPoint::raw`];
//! [`FixedPoint::to_f64`] gives the nearest `f64`, which loses precision once
//! `|raw|` exceeds 2^53.

use std::fmt;

use crate::FIXED_POINT_SCALE;
use crate::error::CodecError;
use crate::felt::Felt;
use crate::scalar::{decode_signed, encode_signed};
use crate::types::BitWidth;

/// Largest exponent whose power of two still fits an `i128` multiplier.
const MAX_SCALE: u32 = 126;

/// 2^63 as an `f64`, the first value past `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Rational value `raw / 2^scale` over a signed 64-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedPoint {
    raw: i64,
    scale: u32,
}

impl FixedPoint {
    pub const fn from_raw(raw: i64, scale: u32) -> Self {
        Self { raw, scale }
    }

    /// A raw value at the protocol scale (`k = 32`).
    pub const fn from_raw_default(raw: i64) -> Self {
        Self::from_raw(raw, FIXED_POINT_SCALE)
    }

    pub fn raw(&self) -> i64 {
        self.raw
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Scale `value` by 2^scale and round half to even.
    pub fn from_f64(value: f64, scale: u32) -> Result<Self, CodecError> {
        let overflow = || CodecError::Overflow {
            value: value.to_string(),
        };
        if scale > MAX_SCALE {
            return Err(overflow());
        }
        let scaled = (value * 2f64.powi(scale as i32)).round_ties_even();
        if !scaled.is_finite() || scaled < -I64_LIMIT || scaled >= I64_LIMIT {
            return Err(overflow());
        }
        Ok(Self::from_raw(scaled as i64, scale))
    }

    /// Exact rational `numerator / denominator`, rounded half to even.
    pub fn from_ratio(numerator: i128, denominator: i128, scale: u32) -> Result<Self, CodecError> {
        let overflow = || CodecError::Overflow {
            value: format!("{numerator}/{denominator}"),
        };
        if denominator == 0 || scale > MAX_SCALE {
            return Err(overflow());
        }
        let scaled = numerator.checked_mul(1i128 << scale).ok_or_else(overflow)?;
        let (scaled, denominator) = if denominator < 0 {
            (
                scaled.checked_neg().ok_or_else(overflow)?,
                denominator.checked_neg().ok_or_else(overflow)?,
            )
        } else {
            (scaled, denominator)
        };
        let raw = div_round_half_even(scaled, denominator);
        let raw = i64::try_from(raw).map_err(|_| overflow())?;
        Ok(Self::from_raw(raw, scale))
    }

    /// Nearest `f64` to `raw / 2^scale`.
    pub fn to_f64(&self) -> f64 {
        self.raw as f64 / 2f64.powi(self.scale as i32)
    }

    fn check_scale(&self, other: &Self) -> Result<(), CodecError> {
        if self.scale != other.scale {
            return Err(CodecError::ScaleMismatch {
                expected: self.scale,
                got: other.scale,
            });
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self, CodecError> {
        self.check_scale(other)?;
        let raw = self.raw.checked_add(other.raw).ok_or_else(|| CodecError::Overflow {
            value: format!("{self} + {other}"),
        })?;
        Ok(Self::from_raw(raw, self.scale))
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self, CodecError> {
        self.check_scale(other)?;
        let raw = self.raw.checked_sub(other.raw).ok_or_else(|| CodecError::Overflow {
            value: format!("{self} - {other}"),
        })?;
        Ok(Self::from_raw(raw, self.scale))
    }

    /// Product rescaled back to `2^scale`, rounded half to even.
    pub fn checked_mul(&self, other: &Self) -> Result<Self, CodecError> {
        self.check_scale(other)?;
        let overflow = || CodecError::Overflow {
            value: format!("{self} * {other}"),
        };
        if self.scale > MAX_SCALE {
            return Err(overflow());
        }
        let product = self.raw as i128 * other.raw as i128;
        let raw = div_round_half_even(product, 1i128 << self.scale);
        let raw = i64::try_from(raw).map_err(|_| overflow())?;
        Ok(Self::from_raw(raw, self.scale))
    }

    /// Encode the raw integer as a signed 64-bit scalar.
    pub fn encode(&self) -> Felt {
        Felt::from(self.raw)
    }

    /// Decode a word holding a signed 64-bit raw value at the given scale.
    pub fn decode(word: &Felt, scale: u32) -> Result<Self, CodecError> {
        let raw = decode_signed(word, BitWidth::U64)?;
        // the width check above guarantees the cast is lossless
        Ok(Self::from_raw(raw as i64, scale))
    }

    /// Encode and check the value against an expected scale.
    pub(crate) fn encode_at(&self, scale: u32) -> Result<Felt, CodecError> {
        if self.scale != scale {
            return Err(CodecError::ScaleMismatch {
                expected: scale,
                got: self.scale,
            });
        }
        encode_signed(self.raw as i128, BitWidth::U64)
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

/// `numerator / denominator` for a positive denominator, ties to even.
fn div_round_half_even(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator.div_euclid(denominator);
    let remainder = numerator.rem_euclid(denominator);
    // remainder < denominator, so comparing against the other half avoids overflow
    let upper = denominator - remainder;
    if remainder > upper || (remainder == upper && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: i64 = 1 << 31;

    #[test]
    fn test_from_f64_exact_values() {
        assert_eq!(FixedPoint::from_f64(0.5, 32).unwrap().raw(), HALF);
        assert_eq!(FixedPoint::from_f64(-1.25, 32).unwrap().raw(), -(5 << 30));
        assert_eq!(FixedPoint::from_raw_default(HALF).to_f64(), 0.5);
    }

    #[test]
    fn test_rounding_is_half_to_even() {
        // at scale 1, 0.25 and 0.75 scale to 0.5 and 1.5
        assert_eq!(FixedPoint::from_f64(0.25, 1).unwrap().raw(), 0);
        assert_eq!(FixedPoint::from_f64(0.75, 1).unwrap().raw(), 2);
        assert_eq!(FixedPoint::from_f64(-0.25, 1).unwrap().raw(), 0);
        assert_eq!(FixedPoint::from_f64(-0.75, 1).unwrap().raw(), -2);

        assert_eq!(FixedPoint::from_ratio(1, 4, 1).unwrap().raw(), 0);
        assert_eq!(FixedPoint::from_ratio(3, 4, 1).unwrap().raw(), 2);
        assert_eq!(FixedPoint::from_ratio(-3, 4, 1).unwrap().raw(), -2);
        assert_eq!(FixedPoint::from_ratio(3, -4, 1).unwrap().raw(), -2);
        // 1/3 at scale 2 is 1.333..., rounds down
        assert_eq!(FixedPoint::from_ratio(1, 3, 2).unwrap().raw(), 1);
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            FixedPoint::from_f64(2f64.powi(31), 32),
            Err(CodecError::Overflow { .. })
        ));
        assert!(matches!(
            FixedPoint::from_f64(f64::NAN, 32),
            Err(CodecError::Overflow { .. })
        ));
        assert!(matches!(
            FixedPoint::from_ratio(1, 0, 32),
            Err(CodecError::Overflow { .. })
        ));
        assert!(matches!(
            FixedPoint::from_ratio(1, i128::MIN, 0),
            Err(CodecError::Overflow { .. })
        ));
        // the most negative representable value is exactly -2^31 at k = 32
        assert_eq!(
            FixedPoint::from_f64(-(2f64.powi(31)), 32).unwrap().raw(),
            i64::MIN
        );
    }

    #[test]
    fn test_arithmetic_preserves_scale() {
        let a = FixedPoint::from_f64(1.5, 32).unwrap();
        let b = FixedPoint::from_f64(0.25, 32).unwrap();
        assert_eq!(a.checked_add(&b).unwrap().to_f64(), 1.75);
        assert_eq!(a.checked_sub(&b).unwrap().to_f64(), 1.25);
        assert_eq!(a.checked_mul(&b).unwrap().to_f64(), 0.375);
        assert_eq!(a.checked_mul(&b).unwrap().scale(), 32);
    }

    #[test]
    fn test_scale_mismatch() {
        let a = FixedPoint::from_raw(1, 32);
        let b = FixedPoint::from_raw(1, 16);
        assert_eq!(
            a.checked_add(&b),
            Err(CodecError::ScaleMismatch {
                expected: 32,
                got: 16
            })
        );
        assert!(matches!(
            b.encode_at(32),
            Err(CodecError::ScaleMismatch { .. })
        ));
    }

    #[test]
    fn test_add_overflow() {
        let max = FixedPoint::from_raw_default(i64::MAX);
        assert!(matches!(
            max.checked_add(&FixedPoint::from_raw_default(1)),
            Err(CodecError::Overflow { .. })
        ));
    }

    #[test]
    fn test_word_round_trip() {
        let value = FixedPoint::from_f64(-3.75, 32).unwrap();
        let word = value.encode_at(32).unwrap();
        assert_eq!(FixedPoint::decode(&word, 32).unwrap(), value);
        assert_eq!(value.encode(), word);
    }
}
