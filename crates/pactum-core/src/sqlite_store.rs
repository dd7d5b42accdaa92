//! SQLite-based persistent storage implementation for Pactum.
//!
//! This module provides a storage backend using SQLite with schema
//! migrations. The `contacts` table carries a `UNIQUE(owner, name)`
//! constraint, which is what makes concurrent find-or-create safe, and a
//! CHECK constraint that keeps the counterparty columns all-null or
//! all-set.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use tokio::sync::Mutex;

use pactum_crypto::KeyPair;

use crate::contact::{Contact, Counterparty};
use crate::store::{AccountStore, ContactStore, StoreError};
use crate::types::{Account, UserId};

// ============================================================================
// Schema Version
// ============================================================================

/// Current schema version for migrations.
/// Increment this when adding new migrations.
const SCHEMA_VERSION: i32 = 1;

const CONTACT_COLUMNS: &str = "owner, name, handshake_private_key, handshake_public_key,
     identifier, signing_key, oneuse_key, signature";

// ============================================================================
// SQLite Store Implementation
// ============================================================================

/// SQLite-based persistent store implementation.
///
/// Thread-safe access via a mutex around a single connection; each trait
/// method holds the lock for one statement.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

/// Raw column values of a `contacts` row.
struct ContactRow {
    owner: i64,
    name: String,
    handshake_private_key: Vec<u8>,
    handshake_public_key: Vec<u8>,
    identifier: Option<String>,
    signing_key: Option<Vec<u8>>,
    oneuse_key: Option<Vec<u8>>,
    signature: Option<Vec<u8>>,
}

impl ContactRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            owner: row.get(0)?,
            name: row.get(1)?,
            handshake_private_key: row.get(2)?,
            handshake_public_key: row.get(3)?,
            identifier: row.get(4)?,
            signing_key: row.get(5)?,
            oneuse_key: row.get(6)?,
            signature: row.get(7)?,
        })
    }

    fn into_contact(self) -> Result<Contact, StoreError> {
        let keys = KeyPair::from_parts(self.handshake_private_key, self.handshake_public_key)
            .map_err(|e| {
                StoreError::DataCorruption(format!("contact {:?} handshake keys: {}", self.name, e))
            })?;

        let counterparty = match (self.identifier, self.signing_key, self.oneuse_key, self.signature)
        {
            (None, None, None, None) => None,
            (Some(identifier), Some(signing_key), Some(oneuse_key), Some(signature)) => {
                Some(Counterparty {
                    identifier,
                    signing_key,
                    oneuse_key,
                    signature,
                })
            }
            _ => {
                return Err(StoreError::DataCorruption(format!(
                    "contact {:?} has partially set counterparty fields",
                    self.name
                )))
            }
        };

        Ok(Contact::restore(self.owner as UserId, self.name, keys, counterparty))
    }
}

impl SqliteStore {
    /// Create a new SQLite store at the specified path.
    ///
    /// Creates the database file if it doesn't exist and runs migrations.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| {
            StoreError::OperationFailed(format!("failed to open database: {}", e))
        })?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| StoreError::OperationFailed(format!("failed to set pragmas: {}", e)))?;

        Self::run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create a new in-memory SQLite store for testing.
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StoreError::OperationFailed(format!("failed to open in-memory database: {}", e))
        })?;

        Self::run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run database migrations to ensure schema is up to date.
    fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )",
            [],
        )
        .map_err(|e| StoreError::OperationFailed(format!("failed to create schema_version: {}", e)))?;

        let current_version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| {
                row.get(0)
            })
            .map_err(|e| StoreError::OperationFailed(format!("failed to read schema version: {}", e)))?;

        if current_version > SCHEMA_VERSION {
            return Err(StoreError::OperationFailed(format!(
                "database schema version {} is newer than supported version {}",
                current_version, SCHEMA_VERSION
            )));
        }

        if current_version < 1 {
            Self::migrate_v1(conn)?;
        }

        Ok(())
    }

    /// Migration to schema version 1 - initial schema.
    fn migrate_v1(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- Accounts table
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY,
                signing_private_key BLOB NOT NULL,
                signing_public_key BLOB NOT NULL
            );

            -- Contacts table
            CREATE TABLE IF NOT EXISTS contacts (
                owner INTEGER NOT NULL,
                name TEXT NOT NULL,
                handshake_private_key BLOB NOT NULL,
                handshake_public_key BLOB NOT NULL,
                identifier TEXT,
                signing_key BLOB,
                oneuse_key BLOB,
                signature BLOB,
                UNIQUE(owner, name),
                CHECK (
                    (identifier IS NULL AND signing_key IS NULL
                        AND oneuse_key IS NULL AND signature IS NULL)
                    OR
                    (identifier IS NOT NULL AND signing_key IS NOT NULL
                        AND oneuse_key IS NOT NULL AND signature IS NOT NULL)
                )
            );
            CREATE INDEX IF NOT EXISTS idx_contacts_owner ON contacts(owner);

            -- Record schema version
            INSERT INTO schema_version (version) VALUES (1);
            "#,
        )
        .map_err(|e| StoreError::OperationFailed(format!("migration v1 failed: {}", e)))?;

        Ok(())
    }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

/// Split a contact into bindable column values.
fn counterparty_columns(
    contact: &Contact,
) -> (Option<&str>, Option<&[u8]>, Option<&[u8]>, Option<&[u8]>) {
    match contact.counterparty() {
        Some(c) => (
            Some(c.identifier.as_str()),
            Some(c.signing_key.as_slice()),
            Some(c.oneuse_key.as_slice()),
            Some(c.signature.as_slice()),
        ),
        None => (None, None, None, None),
    }
}

// ============================================================================
// Store Trait Implementations
// ============================================================================

#[async_trait]
impl ContactStore for SqliteStore {
    async fn insert_contact(&self, contact: Contact) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let (identifier, signing_key, oneuse_key, signature) = counterparty_columns(&contact);

        conn.execute(
            &format!(
                "INSERT INTO contacts ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                CONTACT_COLUMNS
            ),
            params![
                contact.owner() as i64,
                contact.name(),
                contact.handshake_keys().private_key(),
                contact.handshake_keys().public_key(),
                identifier,
                signing_key,
                oneuse_key,
                signature,
            ],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                StoreError::AlreadyExists(format!(
                    "contact {:?} for owner {}",
                    contact.name(),
                    contact.owner()
                ))
            } else {
                StoreError::OperationFailed(format!("failed to insert contact: {}", e))
            }
        })?;
        Ok(())
    }

    async fn save_contact(&self, contact: Contact) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let (identifier, signing_key, oneuse_key, signature) = counterparty_columns(&contact);

        conn.execute(
            &format!(
                "INSERT INTO contacts ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(owner, name) DO UPDATE SET
                    handshake_private_key = excluded.handshake_private_key,
                    handshake_public_key = excluded.handshake_public_key,
                    identifier = excluded.identifier,
                    signing_key = excluded.signing_key,
                    oneuse_key = excluded.oneuse_key,
                    signature = excluded.signature",
                CONTACT_COLUMNS
            ),
            params![
                contact.owner() as i64,
                contact.name(),
                contact.handshake_keys().private_key(),
                contact.handshake_keys().public_key(),
                identifier,
                signing_key,
                oneuse_key,
                signature,
            ],
        )
        .map_err(|e| StoreError::OperationFailed(format!("failed to save contact: {}", e)))?;
        Ok(())
    }

    async fn load_contact(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<Option<Contact>, StoreError> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM contacts WHERE owner = ?1 AND name = ?2",
                    CONTACT_COLUMNS
                ),
                params![owner as i64, name],
                ContactRow::from_row,
            )
            .optional()
            .map_err(|e| StoreError::OperationFailed(format!("failed to load contact: {}", e)))?;

        row.map(ContactRow::into_contact).transpose()
    }

    async fn list_contacts_for_owner(&self, owner: UserId) -> Result<Vec<Contact>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM contacts WHERE owner = ?1 ORDER BY name",
                CONTACT_COLUMNS
            ))
            .map_err(|e| StoreError::OperationFailed(format!("failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![owner as i64], ContactRow::from_row)
            .map_err(|e| StoreError::OperationFailed(format!("failed to list contacts: {}", e)))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::OperationFailed(format!("failed to collect contacts: {}", e)))?;

        rows.into_iter().map(ContactRow::into_contact).collect()
    }

    async fn delete_contact(&self, owner: UserId, name: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().await;
        let rows_affected = conn
            .execute(
                "DELETE FROM contacts WHERE owner = ?1 AND name = ?2",
                params![owner as i64, name],
            )
            .map_err(|e| StoreError::OperationFailed(format!("failed to delete contact: {}", e)))?;
        Ok(rows_affected > 0)
    }
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO accounts (id, signing_private_key, signing_public_key)
             VALUES (?1, ?2, ?3)",
            params![
                account.id as i64,
                account.signing_private_key(),
                account.signing_public_key(),
            ],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                StoreError::AlreadyExists(format!("account {}", account.id))
            } else {
                StoreError::OperationFailed(format!("failed to insert account: {}", e))
            }
        })?;
        Ok(())
    }

    async fn load_account(&self, id: UserId) -> Result<Option<Account>, StoreError> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                "SELECT signing_private_key, signing_public_key FROM accounts WHERE id = ?1",
                params![id as i64],
                |row| {
                    let private_key: Vec<u8> = row.get(0)?;
                    let public_key: Vec<u8> = row.get(1)?;
                    Ok((private_key, public_key))
                },
            )
            .optional()
            .map_err(|e| StoreError::OperationFailed(format!("failed to load account: {}", e)))?;

        match row {
            Some((private_key, public_key)) => {
                let signing_keys = KeyPair::from_parts(private_key, public_key).map_err(|e| {
                    StoreError::DataCorruption(format!("account {} signing keys: {}", id, e))
                })?;
                Ok(Some(Account { id, signing_keys }))
            }
            None => Ok(None),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
