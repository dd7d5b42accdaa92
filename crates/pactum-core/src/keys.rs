//! Key service seam used by the directory and the handshake engine.

use pactum_crypto::{KeyError, KeyPair};

use crate::types::{Account, UserId};

/// Generates one-use key pairs and signs/verifies handshake payloads.
///
/// `verify` is a predicate: a signature that does not check out is
/// `Ok(false)`. Only structurally invalid input is an error.
pub trait KeyService: Send + Sync {
    fn generate_one_use_key_pair(&self) -> KeyPair;

    fn sign(&self, payload: &[u8], private_key: &[u8]) -> Result<Vec<u8>, KeyError>;

    fn verify(
        &self,
        signature: &[u8],
        payload: &[u8],
        public_key: &[u8],
    ) -> Result<bool, KeyError>;
}

/// Ed25519 key service backed by the OS random source.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519KeyService;

impl KeyService for Ed25519KeyService {
    fn generate_one_use_key_pair(&self) -> KeyPair {
        pactum_crypto::generate_key_pair()
    }

    fn sign(&self, payload: &[u8], private_key: &[u8]) -> Result<Vec<u8>, KeyError> {
        pactum_crypto::sign(payload, private_key)
    }

    fn verify(
        &self,
        signature: &[u8],
        payload: &[u8],
        public_key: &[u8],
    ) -> Result<bool, KeyError> {
        pactum_crypto::verify(signature, payload, public_key)
    }
}

/// Generate a fresh account with a long-lived signing key pair.
pub fn generate_account(id: UserId) -> Account {
    Account {
        id,
        signing_keys: pactum_crypto::generate_key_pair(),
    }
}
