//! Composite-value codec for arguments and results exchanged between a
//! proved program and an external oracle service.
//!
//! # Wire Format
//!
//! Every value is flattened into a sequence of field elements ("words"). A word
//! is the canonical representative of a residue modulo the Stark prime
//! ([`FIELD_PRIME_HEX`]), written as 32 big-endian bytes:
//!
//! ```text
//! unsigned / signed / bool / felt / fixed-point   [word]
//! byte string                                     [n_full][chunk]*n_full[pending_word][pending_len]
//! sequence                                        [count][element]*count
//! record / tuple                                  [field_0][field_1]...
//! ```
//!
//! - Negative integers are stored as `P + v` and recovered with the declared
//!   bit width.
//! - Byte strings are split into 31-byte chunks; the trailing partial chunk
//!   and its byte count close the encoding.
//! - Fixed-point numbers store `value * 2^k` as a signed 64-bit integer.
//!
//! Shapes come from a [`Descriptor`], never from the bytes themselves, so both
//! sides of an oracle call must agree on the descriptor out of band (see
//! [`Schema`]).
//!
//! # Message Bodies
//!
//! Oracle requests and responses wrap encoded tuples in a versioned body:
//!
//! ```text
//! [MAGIC: 4 bytes][VERSION: 4 bytes big-endian u32][PAYLOAD: msgpack bytes]
//! ```
//!
//! - **MAGIC**: "ORCQ" for requests, "ORCR" for responses
//! - **VERSION**: strict match, a mismatch is rejected before the payload is read

mod bytes;
mod codec;
mod cursor;
mod descriptor;
mod error;
mod felt;
mod fixed;
pub mod json;
mod scalar;
mod schema;
pub mod typed;
mod types;
mod value;
mod wire;

pub use bytes::{byte_string_words, decode_byte_string, encode_byte_string};
pub use codec::{decode, decode_felts, encode, encode_felts, encoded_len};
pub use cursor::{WordReader, WordWriter};
pub use descriptor::{Descriptor, FieldDescriptor, RecordDescriptor};
pub use error::{CodecError, DeserializeError, PeekError, SerializeError};
pub use felt::Felt;
pub use fixed::FixedPoint;
pub use scalar::{
    decode_bool, decode_signed, decode_unsigned, encode_bool, encode_signed, encode_unsigned,
};
pub use schema::{Schema, SchemaDef, SchemaError, SchemaField, SchemaType};
pub use typed::{ByteString, WireType, decode_typed, encode_typed};
pub use types::{BitWidth, InvalidBitWidth};
pub use value::Value;
pub use wire::{
    OracleRequest, OracleResponse, deserialize_request, deserialize_request_payload,
    deserialize_response, deserialize_response_payload, peek_request_version,
    peek_response_version, serialize_request, serialize_response,
};

/// Field prime `P = 2^251 + 17 * 2^192 + 1`, hex encoded.
pub const FIELD_PRIME_HEX: &str =
    "0x800000000000011000000000000000000000000000000000000000000000001";

/// Size in bytes of one encoded field element.
pub const WORD_SIZE: usize = 32;

/// Number of payload bytes carried by one byte-string chunk.
pub const BYTES_CHUNK_WIDTH: usize = 31;

/// Exponent `k` of the default fixed-point type (`value = raw / 2^k`).
pub const FIXED_POINT_SCALE: u32 = 32;

/// Current protocol version for oracle requests.
pub const REQUEST_VERSION: u32 = 1;

/// Current protocol version for oracle responses.
pub const RESPONSE_VERSION: u32 = 1;

/// Magic bytes identifying oracle request bodies: "ORCQ" in ASCII.
pub const REQUEST_MAGIC: [u8; 4] = *b"ORCQ";

/// Magic bytes identifying oracle response bodies: "ORCR" in ASCII.
pub const RESPONSE_MAGIC: [u8; 4] = *b"ORCR";

/// Header size: 4 bytes magic + 4 bytes version.
pub const HEADER_SIZE: usize = 8;
