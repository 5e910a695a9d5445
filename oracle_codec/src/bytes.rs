//! Byte-string codec.
//!
//! ```text
//! [n_full][chunk_0]...[chunk_{n_full-1}][pending_word][pending_len]
//! ```
//!
//! Each full chunk carries 31 bytes right-aligned in its word. The pending
//! word carries the trailing `len % 31` bytes right-aligned, and `pending_len`
//! records how many of its bytes are data. A string whose length is a multiple
//! of 31 ends with an empty pending word.

use num_bigint::BigUint;

use crate::cursor::{WordReader, WordWriter};
use crate::error::CodecError;
use crate::felt::Felt;
use crate::scalar::{decode_unsigned, encode_unsigned};
use crate::types::BitWidth;
use crate::{BYTES_CHUNK_WIDTH, WORD_SIZE};

/// Number of words used to encode a byte string of `len` bytes.
pub fn byte_string_words(len: usize) -> usize {
    len / BYTES_CHUNK_WIDTH + 3
}

pub fn encode_byte_string(bytes: &[u8], out: &mut WordWriter) -> Result<(), CodecError> {
    let chunks = bytes.chunks_exact(BYTES_CHUNK_WIDTH);
    let pending = chunks.remainder();

    out.push(encode_unsigned(chunks.len() as u128, BitWidth::U32)?);
    for chunk in chunks {
        out.push(Felt::reduce(BigUint::from_bytes_be(chunk)));
    }
    out.push(Felt::reduce(BigUint::from_bytes_be(pending)));
    out.push(Felt::from(pending.len()));
    Ok(())
}

pub fn decode_byte_string(reader: &mut WordReader<'_>) -> Result<Vec<u8>, CodecError> {
    let full = decode_unsigned(&reader.read_word()?, BitWidth::U32)? as usize;
    // full chunks plus the pending word and its length
    reader.require_words(full.saturating_add(2))?;

    let mut out = Vec::with_capacity(full * BYTES_CHUNK_WIDTH + BYTES_CHUNK_WIDTH);
    for index in 0..full {
        let word = reader.read_word()?.to_be_bytes();
        let (pad, data) = word.split_at(WORD_SIZE - BYTES_CHUNK_WIDTH);
        if pad.iter().any(|&b| b != 0) {
            return Err(CodecError::padding(format!(
                "chunk {index} has data outside its {BYTES_CHUNK_WIDTH} bytes"
            )));
        }
        out.extend_from_slice(data);
    }

    let pending = reader.read_word()?.to_be_bytes();
    let pending_len = reader.read_word()?;
    let pending_len = match pending_len.to_u128() {
        Some(len) if len < BYTES_CHUNK_WIDTH as u128 => len as usize,
        _ => {
            return Err(CodecError::padding(format!(
                "pending length {pending_len} is not below the chunk width {BYTES_CHUNK_WIDTH}"
            )));
        }
    };
    let (pad, data) = pending.split_at(WORD_SIZE - pending_len);
    if pad.iter().any(|&b| b != 0) {
        return Err(CodecError::padding(format!(
            "pending word holds more than {pending_len} bytes"
        )));
    }
    out.extend_from_slice(data);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(bytes: &[u8]) -> Vec<Felt> {
        let mut writer = WordWriter::new();
        encode_byte_string(bytes, &mut writer).unwrap();
        writer.into_felts()
    }

    fn decode(felts: &[Felt]) -> Result<Vec<u8>, CodecError> {
        let bytes = crate::cursor::felts_to_bytes(felts);
        let mut reader = WordReader::new(&bytes);
        decode_byte_string(&mut reader)
    }

    fn hex(value: &str) -> Felt {
        value.parse().unwrap()
    }

    #[test]
    fn test_matches_reference_layout() {
        let words = encode(b"Hello world, how are you doing today?");
        assert_eq!(
            words,
            vec![
                Felt::from(1u32),
                hex("0x48656c6c6f20776f726c642c20686f772061726520796f7520646f696e6720"),
                hex("0x746f6461793f"),
                Felt::from(6u32),
            ]
        );
    }

    #[test]
    fn test_empty_string() {
        let words = encode(b"");
        assert_eq!(words, vec![Felt::zero(), Felt::zero(), Felt::zero()]);
        assert_eq!(decode(&words).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_exact_multiple_has_no_partial_chunk() {
        let data = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ12345";
        assert_eq!(data.len(), BYTES_CHUNK_WIDTH);
        let words = encode(data);
        assert_eq!(words.len(), byte_string_words(data.len()));
        assert_eq!(words[0], Felt::from(1u32));
        assert_eq!(words[2], Felt::zero());
        assert_eq!(words[3], Felt::zero());
        assert_eq!(decode(&words).unwrap(), data.to_vec());
    }

    #[test]
    fn test_round_trip_across_chunk_boundaries() {
        for len in [1, 30, 32, 61, 62, 63, 200] {
            let data: Vec<u8> = (0..len).map(|i| (i * 7 + 3) as u8).collect();
            let words = encode(&data);
            assert_eq!(words.len(), byte_string_words(len));
            assert_eq!(decode(&words).unwrap(), data);
        }
    }

    #[test]
    fn test_truncated() {
        let mut words = encode(&[0xab; 70]);
        words.truncate(3);
        assert!(matches!(
            decode(&words),
            Err(CodecError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_pending_length_must_be_below_chunk_width() {
        let words = vec![Felt::zero(), Felt::zero(), Felt::from(31u32)];
        assert!(matches!(
            decode(&words),
            Err(CodecError::PaddingMismatch { .. })
        ));
    }

    #[test]
    fn test_pending_length_is_compared_at_full_width() {
        // 2^64 + 5 must not wrap to a 5-byte tail
        let len = Felt::from((1u128 << 64) + 5);
        let words = vec![Felt::zero(), Felt::zero(), len];
        assert!(matches!(
            decode(&words),
            Err(CodecError::PaddingMismatch { .. })
        ));
    }

    #[test]
    fn test_pending_word_longer_than_declared() {
        let words = vec![Felt::zero(), hex("0x414243"), Felt::from(2u32)];
        assert!(matches!(
            decode(&words),
            Err(CodecError::PaddingMismatch { .. })
        ));
    }

    #[test]
    fn test_full_chunk_with_high_byte_set() {
        let mut oversized = [0u8; WORD_SIZE];
        oversized[0] = 1;
        let words = vec![
            Felt::from(1u32),
            Felt::from_be_bytes(&oversized).unwrap(),
            Felt::zero(),
            Felt::zero(),
        ];
        assert!(matches!(
            decode(&words),
            Err(CodecError::PaddingMismatch { .. })
        ));
    }
}
