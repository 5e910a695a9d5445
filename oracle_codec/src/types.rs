//! Integer bit widths accepted by the scalar codec.

use serde::{Deserialize, Serialize};

/// Type-safe bit width for integer scalars.
///
/// The width is threaded explicitly through every integer encode and decode
/// call; a signed decode cannot tell a small negative number from a large
/// positive one without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BitWidth {
    U8 = 8,
    U16 = 16,
    U32 = 32,
    U64 = 64,
    U128 = 128,
}

/// Error type for invalid bit width conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("bit_width must be 8, 16, 32, 64, or 128, got {0}")]
pub struct InvalidBitWidth(pub u32);

impl BitWidth {
    /// Get the byte width (bit_width / 8).
    pub fn byte_width(self) -> u32 {
        u32::from(self) / 8
    }

    /// Get the maximum unsigned value for this bit width.
    pub fn max_unsigned(self) -> u128 {
        match self {
            BitWidth::U8 => u8::MAX as u128,
            BitWidth::U16 => u16::MAX as u128,
            BitWidth::U32 => u32::MAX as u128,
            BitWidth::U64 => u64::MAX as u128,
            BitWidth::U128 => u128::MAX,
        }
    }

    /// Get the maximum signed value for this bit width.
    pub fn max_signed(self) -> i128 {
        match self {
            BitWidth::U8 => i8::MAX as i128,
            BitWidth::U16 => i16::MAX as i128,
            BitWidth::U32 => i32::MAX as i128,
            BitWidth::U64 => i64::MAX as i128,
            BitWidth::U128 => i128::MAX,
        }
    }

    /// Get the minimum signed value for this bit width.
    pub fn min_signed(self) -> i128 {
        match self {
            BitWidth::U8 => i8::MIN as i128,
            BitWidth::U16 => i16::MIN as i128,
            BitWidth::U32 => i32::MIN as i128,
            BitWidth::U64 => i64::MIN as i128,
            BitWidth::U128 => i128::MIN,
        }
    }
}

impl TryFrom<u16> for BitWidth {
    type Error = InvalidBitWidth;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        BitWidth::try_from(value as u32)
    }
}

impl TryFrom<u32> for BitWidth {
    type Error = InvalidBitWidth;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(BitWidth::U8),
            16 => Ok(BitWidth::U16),
            32 => Ok(BitWidth::U32),
            64 => Ok(BitWidth::U64),
            128 => Ok(BitWidth::U128),
            _ => Err(InvalidBitWidth(value)),
        }
    }
}

impl From<BitWidth> for u8 {
    fn from(bw: BitWidth) -> u8 {
        bw as u8
    }
}

impl From<BitWidth> for u32 {
    fn from(bw: BitWidth) -> u32 {
        bw as u32
    }
}

impl From<BitWidth> for usize {
    fn from(bw: BitWidth) -> usize {
        bw as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_width_try_from_valid() {
        assert_eq!(BitWidth::try_from(8u32).unwrap(), BitWidth::U8);
        assert_eq!(BitWidth::try_from(16u32).unwrap(), BitWidth::U16);
        assert_eq!(BitWidth::try_from(32u32).unwrap(), BitWidth::U32);
        assert_eq!(BitWidth::try_from(64u32).unwrap(), BitWidth::U64);
        assert_eq!(BitWidth::try_from(128u16).unwrap(), BitWidth::U128);
    }

    #[test]
    fn test_bit_width_try_from_invalid() {
        assert_eq!(BitWidth::try_from(0u32), Err(InvalidBitWidth(0)));
        assert_eq!(BitWidth::try_from(7u32), Err(InvalidBitWidth(7)));
        assert_eq!(BitWidth::try_from(256u16), Err(InvalidBitWidth(256)));
    }

    #[test]
    fn test_signed_bounds() {
        assert_eq!(BitWidth::U8.min_signed(), -128);
        assert_eq!(BitWidth::U8.max_signed(), 127);
        assert_eq!(BitWidth::U128.min_signed(), i128::MIN);
        assert_eq!(BitWidth::U64.max_unsigned(), u64::MAX as u128);
        assert_eq!(BitWidth::U128.byte_width(), 16);
    }
}
