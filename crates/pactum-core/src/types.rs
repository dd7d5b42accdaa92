use pactum_crypto::KeyPair;

/// Identifier of a local user account.
pub type UserId = u64;

/// A local user account and its long-lived signing key pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: UserId,
    pub signing_keys: KeyPair, // Ed25519, attests one-use keys
}

impl Account {
    pub fn signing_public_key(&self) -> &[u8] {
        self.signing_keys.public_key()
    }

    pub fn signing_private_key(&self) -> &[u8] {
        self.signing_keys.private_key()
    }
}
