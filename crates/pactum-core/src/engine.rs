//! Mutual handshake engine.
//!
//! Each side of a contact holds a one-use key pair. A handshake message
//! carries the sender's one-use public key, the sender's long-lived signing
//! public key, and a signature over the former made with the latter.
//!
//! ```text
//!   A: init_handshake(A, "bob")          ──── message ────▶  B: accept_init_handshake(B, "alice", m)
//!   A: accept_reply_handshake(A, "bob")  ◀──── message ────  B: reply_handshake(B, "alice")
//! ```
//!
//! Contact state is `Pending` until a verified message has been applied,
//! then `Established`. Incoming messages are decoded and verified before any
//! field of the contact is touched.

use std::sync::Arc;

use tracing::{debug, info, warn};

use pactum_crypto::{
    encoding, hash::short_fingerprint, keypair::PUBLIC_KEY_LEN, utils::constant_time_compare,
    KeyError,
};

use crate::{
    contact::Contact,
    directory::ContactDirectory,
    errors::HandshakeError,
    keys::KeyService,
    message::HandshakeMessage,
    store::{AccountStore, ContactStore},
    types::UserId,
};

/// Handshake protocol engine.
pub struct HandshakeEngine<C, A, K> {
    directory: ContactDirectory<C, A, K>,
    contacts: Arc<C>,
    accounts: Arc<A>,
    keys: Arc<K>,
}

impl<C: ContactStore, A: AccountStore, K: KeyService> HandshakeEngine<C, A, K> {
    /// Create an engine over the given stores and key service.
    pub fn new(contacts: Arc<C>, accounts: Arc<A>, keys: Arc<K>) -> Self {
        Self {
            directory: ContactDirectory::new(contacts.clone(), accounts.clone(), keys.clone()),
            contacts,
            accounts,
            keys,
        }
    }

    /// The directory this engine resolves contacts through.
    pub fn directory(&self) -> &ContactDirectory<C, A, K> {
        &self.directory
    }

    /// Start a handshake with `name`, creating the contact if needed.
    pub async fn init_handshake(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<HandshakeMessage, HandshakeError> {
        let contact = self.directory.find_or_create(owner, name).await?;
        self.build_message(&contact).await
    }

    /// Accept a handshake someone else initiated.
    pub async fn accept_init_handshake(
        &self,
        owner: UserId,
        name: &str,
        incoming: &HandshakeMessage,
    ) -> Result<Contact, HandshakeError> {
        let contact = self.directory.find_or_create(owner, name).await?;
        self.validate_and_apply(contact, incoming).await
    }

    /// Answer an initiated handshake. The contact must already exist.
    pub async fn reply_handshake(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<HandshakeMessage, HandshakeError> {
        let contact = self.directory.find_required(owner, name).await?;
        self.build_message(&contact).await
    }

    /// Accept the reply to a handshake we initiated. The contact must exist.
    pub async fn accept_reply_handshake(
        &self,
        owner: UserId,
        name: &str,
        incoming: &HandshakeMessage,
    ) -> Result<Contact, HandshakeError> {
        let contact = self.directory.find_required(owner, name).await?;
        self.validate_and_apply(contact, incoming).await
    }

    /// Sign the contact's one-use public key with the owner's signing key.
    ///
    /// The identifier echoed is whatever the contact currently stores.
    async fn build_message(&self, contact: &Contact) -> Result<HandshakeMessage, HandshakeError> {
        let owner = contact.owner();
        let account = self
            .accounts
            .load_account(owner)
            .await?
            .ok_or_else(|| HandshakeError::NotFound(format!("user {}", owner)))?;

        let signature = self
            .keys
            .sign(contact.handshake_public_key(), account.signing_private_key())?;

        debug!(
            owner,
            contact = contact.name(),
            oneuse_key = %short_fingerprint(contact.handshake_public_key()),
            "built handshake message"
        );

        Ok(HandshakeMessage {
            identifier: contact.identifier().unwrap_or_default().to_string(),
            oneuse_key: encoding::encode(contact.handshake_public_key()),
            signing_key: encoding::encode(account.signing_public_key()),
            signature: encoding::encode(&signature),
        })
    }

    /// Decode, verify, then apply and persist the counterparty identity.
    ///
    /// `contact` is a private copy; on any failure before the save it is
    /// dropped and the stored record is unchanged.
    async fn validate_and_apply(
        &self,
        mut contact: Contact,
        incoming: &HandshakeMessage,
    ) -> Result<Contact, HandshakeError> {
        let handshake = incoming.decode()?;
        if handshake.oneuse_key.len() != PUBLIC_KEY_LEN {
            return Err(KeyError::InvalidKeyFormat {
                kind: "one-use key",
                expected: PUBLIC_KEY_LEN,
                got: handshake.oneuse_key.len(),
            }
            .into());
        }

        let verified = self.keys.verify(
            &handshake.signature,
            &handshake.oneuse_key,
            &handshake.signing_key,
        )?;
        if !verified {
            warn!(
                owner = contact.owner(),
                contact = contact.name(),
                signing_key = %short_fingerprint(&handshake.signing_key),
                "rejected handshake: signature mismatch"
            );
            return Err(HandshakeError::SignatureMismatch);
        }

        if let Some(previous) = contact.counterparty() {
            if !constant_time_compare(&previous.signing_key, &handshake.signing_key) {
                warn!(
                    owner = contact.owner(),
                    contact = contact.name(),
                    previous = %short_fingerprint(&previous.signing_key),
                    current = %short_fingerprint(&handshake.signing_key),
                    "counterparty signing key changed"
                );
            }
        }

        let signing_key_fp = short_fingerprint(&handshake.signing_key);
        contact.set_counterparty(handshake.into_counterparty());
        self.contacts.save_contact(contact.clone()).await?;

        info!(
            owner = contact.owner(),
            contact = contact.name(),
            signing_key = %signing_key_fp,
            "handshake established"
        );
        Ok(contact)
    }
}
