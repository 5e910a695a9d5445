//! Versioned message bodies for oracle requests and responses.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::codec::{decode, encode};
use crate::descriptor::Descriptor;
use crate::error::{CodecError, DeserializeError, PeekError, SerializeError};
use crate::value::Value;
use crate::{HEADER_SIZE, REQUEST_MAGIC, REQUEST_VERSION, RESPONSE_MAGIC, RESPONSE_VERSION};

/// A call to an oracle method with its encoded argument record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRequest {
    pub method: String,
    pub args: Vec<u8>,
}

impl OracleRequest {
    pub fn new(
        method: impl Into<String>,
        args: &Value,
        descriptor: &Descriptor,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            method: method.into(),
            args: encode(args, descriptor)?,
        })
    }

    pub fn decode_args(&self, descriptor: &Descriptor) -> Result<Value, CodecError> {
        decode(&self.args, descriptor)
    }
}

/// Encoded result record returned by an oracle method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleResponse {
    pub results: Vec<u8>,
}

impl OracleResponse {
    pub fn new(results: &Value, descriptor: &Descriptor) -> Result<Self, CodecError> {
        Ok(Self {
            results: encode(results, descriptor)?,
        })
    }

    pub fn decode_results(&self, descriptor: &Descriptor) -> Result<Value, CodecError> {
        decode(&self.results, descriptor)
    }
}

/// Peek the version number from request bytes without full deserialization.
///
/// This reads only the header (magic bytes + version) to allow fast-fail
/// for unsupported versions without deserializing the payload.
pub fn peek_request_version(bytes: &[u8]) -> Result<u32, PeekError> {
    peek_version(bytes, &REQUEST_MAGIC)
}

/// Peek the version number from response bytes without full deserialization.
pub fn peek_response_version(bytes: &[u8]) -> Result<u32, PeekError> {
    peek_version(bytes, &RESPONSE_MAGIC)
}

fn peek_version(bytes: &[u8], expected_magic: &[u8; 4]) -> Result<u32, PeekError> {
    if bytes.len() < HEADER_SIZE {
        return Err(PeekError::TooShort);
    }
    if &bytes[0..4] != expected_magic {
        return Err(PeekError::InvalidMagic);
    }
    let version_bytes: [u8; 4] = bytes[4..8]
        .try_into()
        .map_err(|_| PeekError::InvalidVersion)?;
    Ok(u32::from_be_bytes(version_bytes))
}

/// Serialize a request with magic bytes and version header.
pub fn serialize_request(request: &OracleRequest) -> Result<Vec<u8>, SerializeError> {
    serialize_with_header(&REQUEST_MAGIC, REQUEST_VERSION, request)
}

/// Serialize a response with magic bytes and version header.
pub fn serialize_response(response: &OracleResponse) -> Result<Vec<u8>, SerializeError> {
    serialize_with_header(&RESPONSE_MAGIC, RESPONSE_VERSION, response)
}

fn serialize_with_header<T: Serialize + ?Sized>(
    magic: &[u8; 4],
    version: u32,
    payload: &T,
) -> Result<Vec<u8>, SerializeError> {
    let mut buf = Vec::with_capacity(HEADER_SIZE);
    buf.extend_from_slice(magic);
    buf.extend_from_slice(&version.to_be_bytes());
    let payload_bytes = rmp_serde::to_vec(payload).map_err(SerializeError::Payload)?;
    buf.extend_from_slice(&payload_bytes);
    Ok(buf)
}

fn check_version(version: u32, expected: u32) -> Result<(), DeserializeError> {
    if version != expected {
        return Err(DeserializeError::UnsupportedVersion {
            got: version,
            expected,
        });
    }
    Ok(())
}

fn payload(bytes: &[u8]) -> Result<&[u8], DeserializeError> {
    bytes
        .get(HEADER_SIZE..)
        .ok_or(DeserializeError::Peek(PeekError::TooShort))
}

/// Deserialize a request payload, assuming the header was already validated.
///
/// The caller must have validated the header via `peek_request_version` and
/// pass the returned version. This function checks the version against
/// `REQUEST_VERSION` and deserializes the msgpack payload.
pub fn deserialize_request_payload(
    bytes: &[u8],
    version: u32,
) -> Result<OracleRequest, DeserializeError> {
    check_version(version, REQUEST_VERSION)?;
    let request: OracleRequest =
        rmp_serde::from_slice(payload(bytes)?).map_err(DeserializeError::Payload)?;
    debug!(
        "decoded request for `{}` with {} argument bytes",
        request.method,
        request.args.len()
    );
    Ok(request)
}

/// Deserialize a request, validating magic bytes and version.
pub fn deserialize_request(bytes: &[u8]) -> Result<OracleRequest, DeserializeError> {
    let version = peek_request_version(bytes)?;
    deserialize_request_payload(bytes, version)
}

/// Deserialize a response payload, assuming the header was already validated.
///
/// The caller must have validated the header via `peek_response_version` and
/// pass the returned version.
pub fn deserialize_response_payload(
    bytes: &[u8],
    version: u32,
) -> Result<OracleResponse, DeserializeError> {
    check_version(version, RESPONSE_VERSION)?;
    let response: OracleResponse =
        rmp_serde::from_slice(payload(bytes)?).map_err(DeserializeError::Payload)?;
    debug!("decoded response with {} result bytes", response.results.len());
    Ok(response)
}

/// Deserialize a response, validating magic bytes and version.
pub fn deserialize_response(bytes: &[u8]) -> Result<OracleResponse, DeserializeError> {
    let version = peek_response_version(bytes)?;
    deserialize_response_payload(bytes, version)
}
