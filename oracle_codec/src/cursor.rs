//! Word-level reader and writer over encoded byte buffers.

use crate::WORD_SIZE;
use crate::error::CodecError;
use crate::felt::Felt;

/// Cursor over an encoded byte slice that yields one field element per read.
#[derive(Debug, Clone, Copy)]
pub struct WordReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> WordReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Current byte offset within the slice.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    /// Number of whole words not yet consumed.
    pub fn remaining_words(&self) -> usize {
        self.remaining() / WORD_SIZE
    }

    /// Read the next word, validating that it is a canonical field element.
    pub fn read_word(&mut self) -> Result<Felt, CodecError> {
        let available = self.remaining();
        if available < WORD_SIZE {
            return Err(CodecError::TruncatedData {
                needed: WORD_SIZE,
                available,
            });
        }
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(&self.bytes[self.offset..self.offset + WORD_SIZE]);
        let felt = Felt::from_be_bytes(&word)?;
        self.offset += WORD_SIZE;
        Ok(felt)
    }

    /// Fail unless `words` more words are available.
    pub fn require_words(&self, words: usize) -> Result<(), CodecError> {
        let needed = words.saturating_mul(WORD_SIZE);
        let available = self.remaining();
        if needed > available {
            return Err(CodecError::TruncatedData { needed, available });
        }
        Ok(())
    }

    /// Ensure that every byte was consumed.
    pub fn ensure_consumed(&self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(CodecError::TrailingData { remaining }),
        }
    }
}

impl<'a> From<&'a [u8]> for WordReader<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        WordReader::new(bytes)
    }
}

/// Append-only buffer of encoded words.
#[derive(Debug, Clone, Default)]
pub struct WordWriter {
    words: Vec<Felt>,
}

impl WordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, word: Felt) {
        self.words.push(word);
    }

    pub fn len_words(&self) -> usize {
        self.words.len()
    }

    pub fn into_felts(self) -> Vec<Felt> {
        self.words
    }

    /// Flatten into `WORD_SIZE` big-endian bytes per word.
    pub fn into_bytes(self) -> Vec<u8> {
        felts_to_bytes(&self.words)
    }
}

pub(crate) fn felts_to_bytes(felts: &[Felt]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(felts.len() * WORD_SIZE);
    for felt in felts {
        buf.extend_from_slice(&felt.to_be_bytes());
    }
    buf
}
