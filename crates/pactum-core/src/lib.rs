//! Pactum Core - contact records and the mutual handshake protocol.
//!
//! This crate implements:
//! - Contact records and their handshake state
//! - The contact directory (find-or-create by owner and name)
//! - The handshake engine (build, validate and apply handshake messages)
//! - Persistent storage abstraction for contacts and accounts

#![forbid(unsafe_code)]

// Handshake protocol
pub mod engine;
pub mod message;

// Records and lookup
pub mod contact;
pub mod directory;

// Infrastructure
pub mod store;

// Supporting modules
pub mod errors;
pub mod types;
pub mod keys;
pub mod harness;

// Optional storage implementations
#[cfg(feature = "sqlite")]
pub mod sqlite_store;

pub use contact::{Contact, ContactState, ContactSummary, Counterparty};
pub use directory::ContactDirectory;
pub use engine::HandshakeEngine;
pub use errors::{ErrorCode, HandshakeError};
pub use keys::{Ed25519KeyService, KeyService};
pub use message::HandshakeMessage;
pub use types::{Account, UserId};
