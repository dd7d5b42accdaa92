//! Text encoding for key and signature fields on the wire.
//!
//! Standard base64 (RFC 4648) with padding. Decoding is strict: characters
//! outside the alphabet, bad padding, or trailing bits are rejected.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Malformed base64 input.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("invalid base64: {0}")]
pub struct DecodeError(#[from] base64::DecodeError);

pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(STANDARD.decode(text)?)
}
