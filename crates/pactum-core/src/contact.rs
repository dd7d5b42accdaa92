//! Contact records.
//!
//! A contact is one side's view of a handshake relationship with a named
//! counterparty. The counterparty fields are held together in a single
//! `Counterparty` value, so a contact either has all of them or none.

use serde::Serialize;

use pactum_crypto::KeyPair;

use crate::types::UserId;

/// Counterparty identity received in a verified handshake message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counterparty {
    /// Opaque identifier supplied by the counterparty (may be empty)
    pub identifier: String,
    /// Counterparty's long-lived Ed25519 signing public key
    pub signing_key: Vec<u8>,
    /// Counterparty's one-use public key
    pub oneuse_key: Vec<u8>,
    /// Signature over `oneuse_key` made with `signing_key`
    pub signature: Vec<u8>,
}

/// Handshake state, derived from which fields are populated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactState {
    /// Own one-use key pair present, no counterparty yet
    Pending,
    /// Counterparty identity present and verified
    Established,
}

impl ContactState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactState::Pending => "pending",
            ContactState::Established => "established",
        }
    }
}

impl std::fmt::Display for ContactState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named relationship owned by one local user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contact {
    owner: UserId,
    name: String,
    handshake_keys: KeyPair,
    counterparty: Option<Counterparty>,
}

impl Contact {
    /// A fresh contact in the `Pending` state.
    pub fn new(owner: UserId, name: impl Into<String>, handshake_keys: KeyPair) -> Self {
        Self {
            owner,
            name: name.into(),
            handshake_keys,
            counterparty: None,
        }
    }

    /// Rebuild a contact from persisted fields.
    pub fn restore(
        owner: UserId,
        name: impl Into<String>,
        handshake_keys: KeyPair,
        counterparty: Option<Counterparty>,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            handshake_keys,
            counterparty,
        }
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handshake_keys(&self) -> &KeyPair {
        &self.handshake_keys
    }

    pub fn handshake_public_key(&self) -> &[u8] {
        self.handshake_keys.public_key()
    }

    pub fn counterparty(&self) -> Option<&Counterparty> {
        self.counterparty.as_ref()
    }

    /// Counterparty identifier, if a handshake has completed.
    pub fn identifier(&self) -> Option<&str> {
        self.counterparty.as_ref().map(|c| c.identifier.as_str())
    }

    pub fn state(&self) -> ContactState {
        match self.counterparty {
            Some(_) => ContactState::Established,
            None => ContactState::Pending,
        }
    }

    pub fn summary(&self) -> ContactSummary {
        ContactSummary {
            owner: self.owner,
            name: self.name.clone(),
            state: self.state(),
        }
    }

    /// Replace the counterparty. Callers must have verified it first.
    pub(crate) fn set_counterparty(&mut self, counterparty: Counterparty) {
        self.counterparty = Some(counterparty);
    }
}

/// Listing view of a contact; carries no key material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContactSummary {
    pub owner: UserId,
    pub name: String,
    pub state: ContactState,
}
