//! Ed25519 key pairs for handshakes and account signing keys.
//!
//! One-use handshake keys and long-lived account signing keys share the same
//! representation: raw 32-byte private seed and 32-byte public key. Private
//! key material is zeroized when the `KeyPair` is dropped.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand_core::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of an Ed25519 private key seed in bytes.
pub const PRIVATE_KEY_LEN: usize = 32;

/// Length of an Ed25519 public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Error type for key operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid {kind} format: expected {expected} bytes, got {got}")]
    InvalidKeyFormat {
        kind: &'static str,
        expected: usize,
        got: usize,
    },
}

impl KeyError {
    fn invalid(kind: &'static str, expected: usize, got: usize) -> Self {
        KeyError::InvalidKeyFormat {
            kind,
            expected,
            got,
        }
    }
}

/// An Ed25519 key pair held as raw bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    private_key: Vec<u8>,
    #[zeroize(skip)]
    public_key: Vec<u8>,
}

impl KeyPair {
    /// Rebuild a key pair from a 32-byte private seed, deriving the public key.
    pub fn from_private_key(private_key: &[u8]) -> Result<Self, KeyError> {
        let seed: &[u8; PRIVATE_KEY_LEN] = private_key
            .try_into()
            .map_err(|_| KeyError::invalid("private key", PRIVATE_KEY_LEN, private_key.len()))?;
        let signing_key = SigningKey::from_bytes(seed);
        Ok(Self {
            private_key: seed.to_vec(),
            public_key: signing_key.verifying_key().to_bytes().to_vec(),
        })
    }

    /// Reassemble a key pair from previously stored halves.
    ///
    /// Lengths are checked; the halves are trusted to belong together.
    pub fn from_parts(private_key: Vec<u8>, public_key: Vec<u8>) -> Result<Self, KeyError> {
        if private_key.len() != PRIVATE_KEY_LEN {
            return Err(KeyError::invalid(
                "private key",
                PRIVATE_KEY_LEN,
                private_key.len(),
            ));
        }
        if public_key.len() != PUBLIC_KEY_LEN {
            return Err(KeyError::invalid(
                "public key",
                PUBLIC_KEY_LEN,
                public_key.len(),
            ));
        }
        Ok(Self {
            private_key,
            public_key,
        })
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"<redacted>")
            .field("public_key", &hex::encode(&self.public_key))
            .finish()
    }
}

/// Generate a fresh Ed25519 key pair from the OS random source.
pub fn generate_key_pair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    KeyPair {
        private_key: signing_key.to_bytes().to_vec(),
        public_key: signing_key.verifying_key().to_bytes().to_vec(),
    }
}

/// Sign `payload` with a 32-byte Ed25519 private seed.
///
/// Returns a 64-byte signature.
pub fn sign(payload: &[u8], private_key: &[u8]) -> Result<Vec<u8>, KeyError> {
    let seed: &[u8; PRIVATE_KEY_LEN] = private_key
        .try_into()
        .map_err(|_| KeyError::invalid("private key", PRIVATE_KEY_LEN, private_key.len()))?;
    let signature: Signature = SigningKey::from_bytes(seed).sign(payload);
    Ok(signature.to_bytes().to_vec())
}

/// Verify an Ed25519 signature over `payload`.
///
/// Wrong-length inputs are a format error. A well-sized public key that is
/// not a valid curve point, or a well-sized signature that does not check
/// out, yields `Ok(false)`.
pub fn verify(signature: &[u8], payload: &[u8], public_key: &[u8]) -> Result<bool, KeyError> {
    let key_bytes: &[u8; PUBLIC_KEY_LEN] = public_key
        .try_into()
        .map_err(|_| KeyError::invalid("public key", PUBLIC_KEY_LEN, public_key.len()))?;
    let sig_bytes: &[u8; SIGNATURE_LEN] = signature
        .try_into()
        .map_err(|_| KeyError::invalid("signature", SIGNATURE_LEN, signature.len()))?;

    let Ok(verifying_key) = VerifyingKey::from_bytes(key_bytes) else {
        return Ok(false);
    };
    let sig = Signature::from_bytes(sig_bytes);
    Ok(verifying_key.verify_strict(payload, &sig).is_ok())
}
