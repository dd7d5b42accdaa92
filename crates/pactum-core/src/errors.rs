//! Error types for Pactum Core.
//!
//! `HandshakeError` is what every directory and engine operation returns.
//! `ErrorCode` gives each variant a stable machine-readable name for callers
//! that need to branch on the failure class (CLI exit codes, JSON output).

use thiserror::Error;

use pactum_crypto::{encoding::DecodeError, KeyError};

use crate::store::StoreError;

/// Errors surfaced by the contact directory and handshake engine.
#[derive(Debug, Error, Clone)]
pub enum HandshakeError {
    /// Required contact or user account is absent
    #[error("not found: {0}")]
    NotFound(String),

    /// Explicit create on a name that is already taken
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Incoming handshake field is not valid base64
    #[error("malformed {field}: {source}")]
    Decode {
        field: &'static str,
        source: DecodeError,
    },

    /// Counterparty signature did not verify over the one-use key
    #[error("signature mismatch: counterparty signature does not verify")]
    SignatureMismatch,

    /// Key or signature bytes are structurally invalid for Ed25519
    #[error(transparent)]
    InvalidKeyFormat(#[from] KeyError),

    /// Storage failed (possibly after a successful verification)
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// Stable failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    AlreadyExists,
    DecodeError,
    SignatureMismatch,
    InvalidKeyFormat,
    PersistenceError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
            ErrorCode::DecodeError => "DECODE_ERROR",
            ErrorCode::SignatureMismatch => "SIGNATURE_MISMATCH",
            ErrorCode::InvalidKeyFormat => "INVALID_KEY_FORMAT",
            ErrorCode::PersistenceError => "PERSISTENCE_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HandshakeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            HandshakeError::NotFound(_) => ErrorCode::NotFound,
            HandshakeError::AlreadyExists(_) => ErrorCode::AlreadyExists,
            HandshakeError::Decode { .. } => ErrorCode::DecodeError,
            HandshakeError::SignatureMismatch => ErrorCode::SignatureMismatch,
            HandshakeError::InvalidKeyFormat(_) => ErrorCode::InvalidKeyFormat,
            HandshakeError::Persistence(_) => ErrorCode::PersistenceError,
        }
    }

    /// Whether the caller may retry the whole operation with the same input.
    ///
    /// Only storage failures qualify; a rejected signature stays rejected.
    pub fn is_retryable(&self) -> bool {
        matches!(self, HandshakeError::Persistence(_))
    }
}
