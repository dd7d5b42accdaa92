//! Integration tests for Pactum core flows.
//!
//! These tests verify the complete end-to-end workflows including:
//! - Two-party handshake establishment over separate stores
//! - Rejection of tampered and malformed messages
//! - Concurrent contact creation
//! - Storage failures after successful verification

use std::sync::Arc;

use pactum_core::{
    harness::{memory_engine, seed_account, FailingSaves, MemoryEngine},
    store::{ContactStore, InMemoryStore},
    ContactState, Ed25519KeyService, ErrorCode, HandshakeEngine, HandshakeError,
    HandshakeMessage,
};
use pactum_crypto::{encoding, generate_key_pair};

struct Party {
    store: Arc<InMemoryStore>,
    engine: MemoryEngine,
}

async fn party(id: u64) -> Party {
    let (store, engine) = memory_engine();
    seed_account(store.as_ref(), id).await.unwrap();
    Party { store, engine }
}

/// Alice (1) initiates with "bob"; Bob (2) accepts as "alice" and replies.
async fn exchange(alice: &Party, bob: &Party) -> HandshakeMessage {
    let init = alice.engine.init_handshake(1, "bob").await.unwrap();
    bob.engine
        .accept_init_handshake(2, "alice", &init)
        .await
        .unwrap();
    bob.engine.reply_handshake(2, "alice").await.unwrap()
}

/// Test: Both sides end up holding each other's keys
#[tokio::test]
async fn integration_handshake_round_trip() {
    let alice = party(1).await;
    let bob = party(2).await;

    let init = alice.engine.init_handshake(1, "bob").await.unwrap();
    let bob_view = bob
        .engine
        .accept_init_handshake(2, "alice", &init)
        .await
        .unwrap();
    let reply = bob.engine.reply_handshake(2, "alice").await.unwrap();
    let alice_view = alice
        .engine
        .accept_reply_handshake(1, "bob", &reply)
        .await
        .unwrap();

    assert_eq!(alice_view.state(), ContactState::Established);
    assert_eq!(bob_view.state(), ContactState::Established);

    let alice_cp = alice_view.counterparty().unwrap();
    let bob_cp = bob_view.counterparty().unwrap();
    assert_eq!(alice_cp.oneuse_key, bob_view.handshake_public_key());
    assert_eq!(bob_cp.oneuse_key, alice_view.handshake_public_key());
    assert_eq!(encoding::encode(&alice_cp.signing_key), reply.signing_key);
    assert_eq!(encoding::encode(&bob_cp.signing_key), init.signing_key);

    // Persisted, not just returned
    let stored = alice.engine.directory().find_required(1, "bob").await.unwrap();
    assert_eq!(stored, alice_view);
}

/// Test: Messages survive a JSON round trip with the wire field names
#[tokio::test]
async fn integration_message_json_wire_format() {
    let alice = party(1).await;
    let bob = party(2).await;

    let init = alice.engine.init_handshake(1, "bob").await.unwrap();
    let json = serde_json::to_string(&init).unwrap();
    assert!(json.contains("\"oneuseKey\""));
    assert!(json.contains("\"signingKey\""));

    let received: HandshakeMessage = serde_json::from_str(&json).unwrap();
    let contact = bob
        .engine
        .accept_init_handshake(2, "alice", &received)
        .await
        .unwrap();
    assert_eq!(contact.state(), ContactState::Established);
}

/// Test: A one-use key swapped for another valid key fails verification
#[tokio::test]
async fn integration_tampered_oneuse_key_rejected() {
    let alice = party(1).await;
    let bob = party(2).await;

    let mut init = alice.engine.init_handshake(1, "bob").await.unwrap();
    init.oneuse_key = encoding::encode(generate_key_pair().public_key());

    let result = bob.engine.accept_init_handshake(2, "alice", &init).await;
    assert!(matches!(result, Err(HandshakeError::SignatureMismatch)));

    // The contact was created before verification but never established
    let contact = bob.engine.directory().find_required(2, "alice").await.unwrap();
    assert_eq!(contact.state(), ContactState::Pending);
    assert!(contact.counterparty().is_none());
}

/// Test: A signature by a different signing key fails verification
#[tokio::test]
async fn integration_substituted_signing_key_rejected() {
    let alice = party(1).await;
    let bob = party(2).await;

    let mut init = alice.engine.init_handshake(1, "bob").await.unwrap();
    init.signing_key = encoding::encode(generate_key_pair().public_key());

    let result = bob.engine.accept_init_handshake(2, "alice", &init).await;
    assert_eq!(result.unwrap_err().code(), ErrorCode::SignatureMismatch);
}

/// Test: Non-base64 fields are reported as decode errors naming the field
#[tokio::test]
async fn integration_invalid_base64_rejected() {
    let alice = party(1).await;
    let bob = party(2).await;

    let mut init = alice.engine.init_handshake(1, "bob").await.unwrap();
    init.signature = "not base64!".into();

    let result = bob.engine.accept_init_handshake(2, "alice", &init).await;
    match result {
        Err(HandshakeError::Decode { field, .. }) => assert_eq!(field, "signature"),
        other => panic!("expected decode error, got {:?}", other),
    }
}

/// Test: An established contact re-verifies and keeps its counterparty on failure
#[tokio::test]
async fn integration_established_contact_not_overwritten_by_forgery() {
    let alice = party(1).await;
    let bob = party(2).await;

    let reply = exchange(&alice, &bob).await;
    let established = alice
        .engine
        .accept_reply_handshake(1, "bob", &reply)
        .await
        .unwrap();

    let mut forged = reply.clone();
    forged.oneuse_key = encoding::encode(generate_key_pair().public_key());
    let result = alice.engine.accept_reply_handshake(1, "bob", &forged).await;
    assert!(matches!(result, Err(HandshakeError::SignatureMismatch)));

    let stored = alice.engine.directory().find_required(1, "bob").await.unwrap();
    assert_eq!(stored, established);
}

/// Test: Applying the same valid reply twice is harmless
#[tokio::test]
async fn integration_replayed_reply_is_idempotent() {
    let alice = party(1).await;
    let bob = party(2).await;

    let reply = exchange(&alice, &bob).await;
    let first = alice
        .engine
        .accept_reply_handshake(1, "bob", &reply)
        .await
        .unwrap();
    let second = alice
        .engine
        .accept_reply_handshake(1, "bob", &reply)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(alice.store.contact_count().await, 1);
}

/// Test: accept_reply for an unknown contact fails without creating one
#[tokio::test]
async fn integration_accept_reply_unknown_contact() {
    let alice = party(1).await;
    let bob = party(2).await;

    let reply = exchange(&alice, &bob).await;
    let result = alice.engine.accept_reply_handshake(1, "carol", &reply).await;

    assert!(matches!(result, Err(HandshakeError::NotFound(_))));
    assert!(alice.engine.directory().find(1, "carol").await.unwrap().is_none());
}

/// Test: The reply echoes the identifier stored from the initiator's message
#[tokio::test]
async fn integration_identifier_echoed_in_reply() {
    let alice = party(1).await;
    let bob = party(2).await;

    let mut init = alice.engine.init_handshake(1, "bob").await.unwrap();
    assert_eq!(init.identifier, "");
    init.identifier = "alice-laptop".into();

    let contact = bob
        .engine
        .accept_init_handshake(2, "alice", &init)
        .await
        .unwrap();
    assert_eq!(contact.identifier(), Some("alice-laptop"));

    let reply = bob.engine.reply_handshake(2, "alice").await.unwrap();
    assert_eq!(reply.identifier, "alice-laptop");
}

/// Test: Concurrent find-or-create for one name yields a single contact
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn integration_concurrent_find_or_create() {
    let alice = party(1).await;
    let directory = alice.engine.directory().clone();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let directory = directory.clone();
        handles.push(tokio::spawn(async move {
            directory.find_or_create(1, "bob").await
        }));
    }

    let mut keys = Vec::new();
    for handle in handles {
        let contact = handle.await.unwrap().unwrap();
        keys.push(contact.handshake_public_key().to_vec());
    }

    assert_eq!(alice.store.contact_count().await, 1);
    let stored = directory.find_required(1, "bob").await.unwrap();
    assert!(keys.iter().all(|k| k == stored.handshake_public_key()));
}

/// Test: A storage failure after verification is reported as persistence
#[tokio::test]
async fn integration_save_failure_is_persistence_error() {
    let alice = party(1).await;

    let store = InMemoryStore::new_shared();
    seed_account(store.as_ref(), 2).await.unwrap();
    let failing = Arc::new(FailingSaves {
        inner: store.clone(),
    });
    let bob = HandshakeEngine::new(failing, store.clone(), Arc::new(Ed25519KeyService));

    let init = alice.engine.init_handshake(1, "bob").await.unwrap();
    let err = bob
        .accept_init_handshake(2, "alice", &init)
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::PersistenceError);
    assert!(err.is_retryable());
    assert!(!HandshakeError::SignatureMismatch.is_retryable());

    // The stored record was never updated
    let stored = store.load_contact(2, "alice").await.unwrap().unwrap();
    assert_eq!(stored.state(), ContactState::Pending);
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use pactum_core::sqlite_store::SqliteStore;

    /// Test: A handshake over SQLite survives reopening the database
    #[tokio::test]
    async fn integration_handshake_over_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bob.db");
        let alice = party(1).await;

        {
            let store = Arc::new(SqliteStore::new(&path).unwrap());
            seed_account(store.as_ref(), 2).await.unwrap();
            let bob = HandshakeEngine::new(store.clone(), store, Arc::new(Ed25519KeyService));

            let init = alice.engine.init_handshake(1, "bob").await.unwrap();
            bob.accept_init_handshake(2, "alice", &init).await.unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        let contact = store.load_contact(2, "alice").await.unwrap().unwrap();
        assert_eq!(contact.state(), ContactState::Established);
    }

    /// Test: Concurrent find-or-create over SQLite yields a single row
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn integration_concurrent_find_or_create_over_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::new(dir.path().join("alice.db")).unwrap());
        seed_account(store.as_ref(), 1).await.unwrap();
        let engine =
            HandshakeEngine::new(store.clone(), store.clone(), Arc::new(Ed25519KeyService));
        let directory = engine.directory().clone();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let directory = directory.clone();
            handles.push(tokio::spawn(async move {
                directory.find_or_create(1, "bob").await
            }));
        }

        let mut keys = Vec::new();
        for handle in handles {
            let contact = handle.await.unwrap().unwrap();
            keys.push(contact.handshake_public_key().to_vec());
        }

        let stored = store.list_contacts_for_owner(1).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(keys.iter().all(|k| k == stored[0].handshake_public_key()));
    }
}
