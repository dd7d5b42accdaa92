//! Storage abstraction for Pactum contacts and accounts.
//!
//! This module defines the `ContactStore` and `AccountStore` traits and
//! provides an in-memory implementation of both for tests and embedding.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::contact::Contact;
use crate::types::{Account, UserId};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("record already exists: {0}")]
    AlreadyExists(String),

    #[error("storage operation failed: {0}")]
    OperationFailed(String),

    #[error("data corruption detected: {0}")]
    DataCorruption(String),
}

// ============================================================================
// Store Traits
// ============================================================================

/// Persistence for contacts, keyed by (owner, name).
///
/// Implementations must enforce uniqueness of (owner, name) in
/// `insert_contact`; the directory relies on it to avoid duplicate creation.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert a new contact.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(StoreError::AlreadyExists)` if (owner, name) is taken
    async fn insert_contact(&self, contact: Contact) -> Result<(), StoreError>;

    /// Insert or replace a contact.
    async fn save_contact(&self, contact: Contact) -> Result<(), StoreError>;

    /// Retrieve a contact by owner and name.
    ///
    /// # Returns
    /// * `Ok(Some(contact))` if found
    /// * `Ok(None)` if not found
    async fn load_contact(&self, owner: UserId, name: &str)
        -> Result<Option<Contact>, StoreError>;

    /// List an owner's contacts, ordered by name.
    async fn list_contacts_for_owner(&self, owner: UserId) -> Result<Vec<Contact>, StoreError>;

    /// Delete a contact.
    ///
    /// # Returns
    /// * `Ok(true)` if a contact was removed
    /// * `Ok(false)` if there was nothing to remove
    async fn delete_contact(&self, owner: UserId, name: &str) -> Result<bool, StoreError>;
}

/// Lookup of local user accounts and their signing keys.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account.
    ///
    /// # Returns
    /// * `Err(StoreError::AlreadyExists)` if the id is taken
    async fn insert_account(&self, account: Account) -> Result<(), StoreError>;

    /// Retrieve an account by id.
    async fn load_account(&self, id: UserId) -> Result<Option<Account>, StoreError>;
}

// ============================================================================
// In-Memory Store Implementation
// ============================================================================

/// Thread-safe in-memory store implementation.
///
/// Uses `RwLock` for concurrent access with multiple readers or single writer.
/// Uniqueness checks happen under the write lock.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    /// Contacts indexed by (owner, name)
    contacts: Arc<RwLock<HashMap<(UserId, String), Contact>>>,
    /// Accounts indexed by id
    accounts: Arc<RwLock<HashMap<UserId, Account>>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new in-memory store wrapped in an Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of stored contacts across all owners.
    pub async fn contact_count(&self) -> usize {
        self.contacts.read().await.len()
    }
}

#[async_trait]
impl ContactStore for InMemoryStore {
    async fn insert_contact(&self, contact: Contact) -> Result<(), StoreError> {
        let mut contacts = self.contacts.write().await;
        let key = (contact.owner(), contact.name().to_string());
        if contacts.contains_key(&key) {
            return Err(StoreError::AlreadyExists(format!(
                "contact {:?} for owner {}",
                key.1, key.0
            )));
        }
        contacts.insert(key, contact);
        Ok(())
    }

    async fn save_contact(&self, contact: Contact) -> Result<(), StoreError> {
        let mut contacts = self.contacts.write().await;
        let key = (contact.owner(), contact.name().to_string());
        contacts.insert(key, contact);
        Ok(())
    }

    async fn load_contact(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<Option<Contact>, StoreError> {
        let contacts = self.contacts.read().await;
        Ok(contacts.get(&(owner, name.to_string())).cloned())
    }

    async fn list_contacts_for_owner(&self, owner: UserId) -> Result<Vec<Contact>, StoreError> {
        let contacts = self.contacts.read().await;
        let mut owned: Vec<Contact> = contacts
            .values()
            .filter(|c| c.owner() == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(owned)
    }

    async fn delete_contact(&self, owner: UserId, name: &str) -> Result<bool, StoreError> {
        let mut contacts = self.contacts.write().await;
        Ok(contacts.remove(&(owner, name.to_string())).is_some())
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.id) {
            return Err(StoreError::AlreadyExists(format!("account {}", account.id)));
        }
        accounts.insert(account.id, account);
        Ok(())
    }

    async fn load_account(&self, id: UserId) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
