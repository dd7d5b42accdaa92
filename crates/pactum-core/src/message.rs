//! Handshake wire message.
//!
//! Serialized as JSON with the field names `identifier`, `oneuseKey`,
//! `signingKey` and `signature`. Key and signature fields carry standard
//! base64 text.

use serde::{Deserialize, Serialize};

use pactum_crypto::encoding;

use crate::contact::Counterparty;
use crate::errors::HandshakeError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeMessage {
    #[serde(default)]
    pub identifier: String,
    pub oneuse_key: String,
    pub signing_key: String,
    pub signature: String,
}

/// A decoded message whose signature has not been checked yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnverifiedHandshake {
    pub identifier: String,
    pub oneuse_key: Vec<u8>,
    pub signing_key: Vec<u8>,
    pub signature: Vec<u8>,
}

impl HandshakeMessage {
    /// Decode the base64 fields. Nothing is verified here.
    pub fn decode(&self) -> Result<UnverifiedHandshake, HandshakeError> {
        Ok(UnverifiedHandshake {
            identifier: self.identifier.clone(),
            oneuse_key: decode_field("oneuseKey", &self.oneuse_key)?,
            signing_key: decode_field("signingKey", &self.signing_key)?,
            signature: decode_field("signature", &self.signature)?,
        })
    }
}

impl UnverifiedHandshake {
    /// Only the engine turns a handshake into a counterparty, after verifying it.
    pub(crate) fn into_counterparty(self) -> Counterparty {
        Counterparty {
            identifier: self.identifier,
            signing_key: self.signing_key,
            oneuse_key: self.oneuse_key,
            signature: self.signature,
        }
    }
}

fn decode_field(field: &'static str, text: &str) -> Result<Vec<u8>, HandshakeError> {
    encoding::decode(text).map_err(|source| HandshakeError::Decode { field, source })
}
