//! Field elements of the Stark prime field.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;
use std::sync::LazyLock;

use num_bigint::BigUint;

use crate::error::CodecError;
use crate::{BYTES_CHUNK_WIDTH, WORD_SIZE};

static PRIME: LazyLock<BigUint> = LazyLock::new(|| {
    (BigUint::from(1u32) << 251usize) + (BigUint::from(17u32) << 192usize) + BigUint::from(1u32)
});

/// `(P - 1) / 2`; raw words above it are read back as negative integers.
static HALF_PRIME: LazyLock<BigUint> = LazyLock::new(|| (&*PRIME - BigUint::from(1u32)) >> 1usize);

/// Residue modulo the field prime `P`, held in canonical form `[0, P)`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Felt(BigUint);

impl Felt {
    /// The field prime `P`.
    pub fn prime() -> &'static BigUint {
        &PRIME
    }

    pub fn zero() -> Self {
        Felt::default()
    }

    /// Wrap a canonical integer, rejecting anything `>= P`.
    pub fn from_biguint(value: BigUint) -> Result<Self, CodecError> {
        if value >= *PRIME {
            return Err(CodecError::FieldRange {
                raw: format!("0x{}", value.to_str_radix(16)),
            });
        }
        Ok(Felt(value))
    }

    /// Reduce an arbitrary integer modulo `P`.
    pub fn reduce(value: BigUint) -> Self {
        Felt(value % &*PRIME)
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.bits() == 0
    }

    /// True when the residue lies in the upper half of the field and so
    /// represents a negative integer.
    pub fn is_upper_half(&self) -> bool {
        self.0 > *HALF_PRIME
    }

    /// Magnitude `P - self`, the absolute value of an upper-half residue.
    pub(crate) fn negated_magnitude(&self) -> BigUint {
        &*PRIME - &self.0
    }

    pub fn to_u128(&self) -> Option<u128> {
        u128::try_from(&self.0).ok()
    }

    /// Canonical 32-byte big-endian form.
    pub fn to_be_bytes(&self) -> [u8; WORD_SIZE] {
        let digits = self.0.to_bytes_be();
        let mut out = [0u8; WORD_SIZE];
        out[WORD_SIZE - digits.len()..].copy_from_slice(&digits);
        out
    }

    /// Parse a 32-byte big-endian word, failing with `FieldRange` if it is not
    /// below `P`.
    pub fn from_be_bytes(bytes: &[u8; WORD_SIZE]) -> Result<Self, CodecError> {
        Felt::from_biguint(BigUint::from_bytes_be(bytes))
    }

    /// Pack a short string (at most 31 bytes) into a single element, first
    /// byte most significant.
    pub fn from_short_string(value: &str) -> Result<Self, CodecError> {
        if value.len() > BYTES_CHUNK_WIDTH {
            return Err(CodecError::shape(
                format!("short string of at most {BYTES_CHUNK_WIDTH} bytes"),
                format!("{} bytes", value.len()),
            ));
        }
        Ok(Felt(BigUint::from_bytes_be(value.as_bytes())))
    }

    /// Lowercase hex with a `0x` prefix and no leading zeros.
    pub fn to_hex_string(&self) -> String {
        format!("0x{}", self.0.to_str_radix(16))
    }
}

impl fmt::Debug for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Felt").field(&self.to_hex_string()).finish()
    }
}

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

/// Accepts decimal (optionally negative) or `0x`-prefixed hex.
impl FromStr for Felt {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::shape("decimal or 0x-prefixed hex field element", s);
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let value = BigUint::parse_bytes(hex.as_bytes(), 16).ok_or_else(invalid)?;
            return Felt::from_biguint(value);
        }
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        let felt = Felt::from_biguint(value)?;
        Ok(if negative { -felt } else { felt })
    }
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Felt {
                fn from(value: $ty) -> Self {
                    Felt(BigUint::from(value))
                }
            }
        )*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, u128, usize);

impl From<bool> for Felt {
    fn from(value: bool) -> Self {
        Felt::from(value as u8)
    }
}

impl From<i64> for Felt {
    fn from(value: i64) -> Self {
        Felt::from(value as i128)
    }
}

/// Negative values map to `P + value`.
impl From<i128> for Felt {
    fn from(value: i128) -> Self {
        let magnitude = Felt::from(value.unsigned_abs());
        if value < 0 { -magnitude } else { magnitude }
    }
}

impl Add for &Felt {
    type Output = Felt;

    fn add(self, rhs: &Felt) -> Felt {
        Felt::reduce(&self.0 + &rhs.0)
    }
}

impl Add for Felt {
    type Output = Felt;

    fn add(self, rhs: Felt) -> Felt {
        &self + &rhs
    }
}

impl Sub for &Felt {
    type Output = Felt;

    fn sub(self, rhs: &Felt) -> Felt {
        Felt::reduce(&self.0 + &*PRIME - &rhs.0)
    }
}

impl Sub for Felt {
    type Output = Felt;

    fn sub(self, rhs: Felt) -> Felt {
        &self - &rhs
    }
}

impl Neg for &Felt {
    type Output = Felt;

    fn neg(self) -> Felt {
        if self.is_zero() {
            Felt::zero()
        } else {
            Felt(self.negated_magnitude())
        }
    }
}

impl Neg for Felt {
    type Output = Felt;

    fn neg(self) -> Felt {
        -&self
    }
}

impl Mul for &Felt {
    type Output = Felt;

    fn mul(self, rhs: &Felt) -> Felt {
        Felt::reduce(&self.0 * &rhs.0)
    }
}

impl Mul for Felt {
    type Output = Felt;

    fn mul(self, rhs: Felt) -> Felt {
        &self * &rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prime_minus_one() -> Felt {
        Felt::from_biguint(Felt::prime() - BigUint::from(1u32)).unwrap()
    }

    #[test]
    fn test_prime_matches_published_constant() {
        let expected = crate::FIELD_PRIME_HEX.parse::<Felt>();
        // P itself is not a canonical element
        assert!(matches!(expected, Err(CodecError::FieldRange { .. })));
        assert_eq!(
            format!("0x{}", Felt::prime().to_str_radix(16)),
            crate::FIELD_PRIME_HEX
        );
    }

    #[test]
    fn test_from_be_bytes_rejects_prime() {
        let mut bytes = [0u8; WORD_SIZE];
        let digits = Felt::prime().to_bytes_be();
        bytes[WORD_SIZE - digits.len()..].copy_from_slice(&digits);
        assert!(matches!(
            Felt::from_be_bytes(&bytes),
            Err(CodecError::FieldRange { .. })
        ));
    }

    #[test]
    fn test_from_be_bytes_accepts_prime_minus_one() {
        let max = prime_minus_one();
        let bytes = max.to_be_bytes();
        assert_eq!(Felt::from_be_bytes(&bytes).unwrap(), max);
    }

    #[test]
    fn test_negative_integers_use_additive_inverse() {
        assert_eq!(Felt::from(-1i64), prime_minus_one());
        assert_eq!(Felt::from(-20i64) + Felt::from(20u32), Felt::zero());
        assert!(Felt::from(-1i64).is_upper_half());
        assert!(!Felt::from(i128::MAX).is_upper_half());
    }

    #[test]
    fn test_modular_arithmetic() {
        let a = Felt::from(7u32);
        let b = Felt::from(10u32);
        assert_eq!(&a - &b, Felt::from(-3i64));
        assert_eq!(&a * &b, Felt::from(70u32));
        assert_eq!(-Felt::zero(), Felt::zero());
        assert_eq!(prime_minus_one() * prime_minus_one(), Felt::from(1u32));
    }

    #[test]
    fn test_parse_decimal_hex_and_negative() {
        assert_eq!("42".parse::<Felt>().unwrap(), Felt::from(42u32));
        assert_eq!("0x1234".parse::<Felt>().unwrap(), Felt::from(0x1234u32));
        assert_eq!("-60".parse::<Felt>().unwrap(), Felt::from(-60i64));
        assert!("hello".parse::<Felt>().is_err());
        assert!("".parse::<Felt>().is_err());
    }

    #[test]
    fn test_short_string() {
        let felt = Felt::from_short_string("hello").unwrap();
        assert_eq!(felt.to_hex_string(), "0x68656c6c6f");
        assert!(Felt::from_short_string(&"x".repeat(32)).is_err());
    }
}
