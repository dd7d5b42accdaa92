//! Contact directory: lookup and creation of contacts by (owner, name).

use std::sync::Arc;

use tracing::debug;

use pactum_crypto::hash::short_fingerprint;

use crate::{
    contact::{Contact, ContactSummary},
    errors::HandshakeError,
    keys::KeyService,
    store::{AccountStore, ContactStore, StoreError},
    types::UserId,
};

/// Resolves contacts for the handshake engine and for direct callers.
pub struct ContactDirectory<C, A, K> {
    contacts: Arc<C>,
    accounts: Arc<A>,
    keys: Arc<K>,
}

impl<C, A, K> Clone for ContactDirectory<C, A, K> {
    fn clone(&self) -> Self {
        Self {
            contacts: self.contacts.clone(),
            accounts: self.accounts.clone(),
            keys: self.keys.clone(),
        }
    }
}

impl<C: ContactStore, A: AccountStore, K: KeyService> ContactDirectory<C, A, K> {
    pub fn new(contacts: Arc<C>, accounts: Arc<A>, keys: Arc<K>) -> Self {
        Self {
            contacts,
            accounts,
            keys,
        }
    }

    /// Create a contact with a fresh one-use key pair.
    ///
    /// Fails with `NotFound` if the owner has no account and with
    /// `AlreadyExists` if the owner already has a contact by that name.
    pub async fn create(&self, owner: UserId, name: &str) -> Result<Contact, HandshakeError> {
        if self.accounts.load_account(owner).await?.is_none() {
            return Err(HandshakeError::NotFound(format!("user {}", owner)));
        }

        let contact = Contact::new(owner, name, self.keys.generate_one_use_key_pair());
        match self.contacts.insert_contact(contact.clone()).await {
            Ok(()) => {
                debug!(
                    owner,
                    name,
                    oneuse_key = %short_fingerprint(contact.handshake_public_key()),
                    "created contact"
                );
                Ok(contact)
            }
            Err(StoreError::AlreadyExists(_)) => Err(HandshakeError::AlreadyExists(format!(
                "contact {:?} for user {}",
                name, owner
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a contact; absence is not an error.
    pub async fn find(&self, owner: UserId, name: &str) -> Result<Option<Contact>, HandshakeError> {
        Ok(self.contacts.load_contact(owner, name).await?)
    }

    /// Look up a contact that must already exist.
    pub async fn find_required(&self, owner: UserId, name: &str) -> Result<Contact, HandshakeError> {
        self.find(owner, name).await?.ok_or_else(|| {
            HandshakeError::NotFound(format!("contact {:?} for user {}", name, owner))
        })
    }

    /// Return the existing contact or create it.
    ///
    /// Creation goes through the store's uniqueness check. A caller that loses
    /// a concurrent creation race gets `AlreadyExists` from the insert and
    /// re-reads the winner's record instead of creating a second one.
    pub async fn find_or_create(&self, owner: UserId, name: &str) -> Result<Contact, HandshakeError> {
        if let Some(contact) = self.find(owner, name).await? {
            return Ok(contact);
        }

        match self.create(owner, name).await {
            Ok(contact) => Ok(contact),
            Err(HandshakeError::AlreadyExists(_)) => {
                debug!(owner, name, "lost creation race, re-reading contact");
                self.find_required(owner, name).await
            }
            Err(e) => Err(e),
        }
    }

    /// Names and states of an owner's contacts, ordered by name.
    pub async fn list_by_owner(&self, owner: UserId) -> Result<Vec<ContactSummary>, HandshakeError> {
        let contacts = self.contacts.list_contacts_for_owner(owner).await?;
        Ok(contacts.iter().map(Contact::summary).collect())
    }

    /// Delete one of the owner's contacts. Returns whether anything was removed.
    pub async fn delete(&self, owner: UserId, name: &str) -> Result<bool, HandshakeError> {
        let removed = self.contacts.delete_contact(owner, name).await?;
        if removed {
            debug!(owner, name, "deleted contact");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactState;
    use crate::keys::{generate_account, Ed25519KeyService};
    use crate::store::InMemoryStore;

    async fn directory_with_account(
        owner: UserId,
    ) -> (
        Arc<InMemoryStore>,
        ContactDirectory<InMemoryStore, InMemoryStore, Ed25519KeyService>,
    ) {
        let store = InMemoryStore::new_shared();
        store.insert_account(generate_account(owner)).await.unwrap();
        let directory = ContactDirectory::new(store.clone(), store.clone(), Arc::new(Ed25519KeyService));
        (store, directory)
    }

    #[tokio::test]
    async fn test_create_requires_account() {
        let (_store, directory) = directory_with_account(1).await;

        let result = directory.create(2, "bob").await;
        assert!(matches!(result, Err(HandshakeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_name() {
        let (_store, directory) = directory_with_account(1).await;
        directory.create(1, "bob").await.unwrap();

        let result = directory.create(1, "bob").await;
        assert!(matches!(result, Err(HandshakeError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_find_absent_is_none() {
        let (_store, directory) = directory_with_account(1).await;
        assert!(directory.find(1, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_required_absent_is_not_found() {
        let (_store, directory) = directory_with_account(1).await;

        let result = directory.find_required(1, "bob").await;
        assert!(matches!(result, Err(HandshakeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_or_create_returns_same_key_pair() {
        let (store, directory) = directory_with_account(1).await;

        let first = directory.find_or_create(1, "bob").await.unwrap();
        let second = directory.find_or_create(1, "bob").await.unwrap();

        assert_eq!(first.handshake_keys(), second.handshake_keys());
        assert_eq!(first.state(), ContactState::Pending);
        assert_eq!(store.contact_count().await, 1);
    }

    #[tokio::test]
    async fn test_list_by_owner_only_lists_own_contacts() {
        let (store, directory) = directory_with_account(1).await;
        store.insert_account(generate_account(2)).await.unwrap();
        directory.create(1, "carol").await.unwrap();
        directory.create(1, "bob").await.unwrap();
        directory.create(2, "dave").await.unwrap();

        let summaries = directory.list_by_owner(1).await.unwrap();
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["bob", "carol"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let (_store, directory) = directory_with_account(1).await;
        directory.create(1, "bob").await.unwrap();

        assert!(directory.delete(1, "bob").await.unwrap());
        assert!(!directory.delete(1, "bob").await.unwrap());
        assert!(directory.find(1, "bob").await.unwrap().is_none());
    }
}
