//! Test harness for Pactum core.
//!
//! Helpers to stand up in-memory engines, seed accounts, and run a complete
//! two-party handshake.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    contact::Contact,
    engine::HandshakeEngine,
    errors::HandshakeError,
    keys::{generate_account, Ed25519KeyService},
    store::{AccountStore, ContactStore, InMemoryStore, StoreError},
    types::{Account, UserId},
};

/// Engine over a single in-memory store with the Ed25519 key service.
pub type MemoryEngine = HandshakeEngine<InMemoryStore, InMemoryStore, Ed25519KeyService>;

/// A fresh in-memory store and an engine over it.
pub fn memory_engine() -> (Arc<InMemoryStore>, MemoryEngine) {
    let store = InMemoryStore::new_shared();
    let engine = HandshakeEngine::new(store.clone(), store.clone(), Arc::new(Ed25519KeyService));
    (store, engine)
}

/// Create and store an account with a fresh signing key pair.
pub async fn seed_account<S: AccountStore>(store: &S, id: UserId) -> Result<Account, StoreError> {
    let account = generate_account(id);
    store.insert_account(account.clone()).await?;
    Ok(account)
}

/// Contact store that reads through to an inner store but fails every save.
///
/// Inserts still succeed so contacts can be created.
pub struct FailingSaves<S> {
    pub inner: Arc<S>,
}

#[async_trait]
impl<S: ContactStore> ContactStore for FailingSaves<S> {
    async fn insert_contact(&self, contact: Contact) -> Result<(), StoreError> {
        self.inner.insert_contact(contact).await
    }

    async fn save_contact(&self, _contact: Contact) -> Result<(), StoreError> {
        Err(StoreError::OperationFailed("disk unavailable".into()))
    }

    async fn load_contact(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<Option<Contact>, StoreError> {
        self.inner.load_contact(owner, name).await
    }

    async fn list_contacts_for_owner(&self, owner: UserId) -> Result<Vec<Contact>, StoreError> {
        self.inner.list_contacts_for_owner(owner).await
    }

    async fn delete_contact(&self, owner: UserId, name: &str) -> Result<bool, StoreError> {
        self.inner.delete_contact(owner, name).await
    }
}

/// Run a complete handshake between two parties with separate stores.
///
/// 1. Initiator calls `init_handshake` for `responder_name`
/// 2. Responder accepts it as `initiator_name`
/// 3. Responder replies
/// 4. Initiator accepts the reply
///
/// Returns (initiator's contact, responder's contact), both `Established`.
pub async fn run_handshake_flow(
    initiator: UserId,
    initiator_name: &str,
    responder: UserId,
    responder_name: &str,
) -> Result<(Contact, Contact), HandshakeError> {
    let (store_a, engine_a) = memory_engine();
    let (store_b, engine_b) = memory_engine();
    seed_account(store_a.as_ref(), initiator).await?;
    seed_account(store_b.as_ref(), responder).await?;

    let init = engine_a.init_handshake(initiator, responder_name).await?;
    let responder_contact = engine_b
        .accept_init_handshake(responder, initiator_name, &init)
        .await?;

    let reply = engine_b.reply_handshake(responder, initiator_name).await?;
    let initiator_contact = engine_a
        .accept_reply_handshake(initiator, responder_name, &reply)
        .await?;

    Ok((initiator_contact, responder_contact))
}
