//! Pactum cryptographic primitives.
//!
//! - Ed25519 key pair generation, signing and verification
//! - Base64 wire encoding for key and signature fields
//! - Key fingerprints and constant-time comparison helpers

#![forbid(unsafe_code)]

pub mod encoding;
pub mod hash;
pub mod keypair;
pub mod utils;

#[cfg(test)]
mod proptests;

pub use keypair::{generate_key_pair, sign, verify, KeyError, KeyPair};
