//! Reading handshake messages supplied on the command line
//!
//! The `--message` argument accepts three forms:
//! - `-` reads the message JSON from stdin
//! - `@path` reads it from a file
//! - anything else is taken as the JSON text itself

use std::io::Read;
use std::path::PathBuf;

use thiserror::Error;

use pactum_core::HandshakeMessage;

/// Errors while obtaining an incoming message
#[derive(Debug, Error)]
pub enum InputError {
    /// Failed to read the message source
    #[error("failed to read message from {source_name}: {error}")]
    Read {
        source_name: String,
        error: std::io::Error,
    },

    /// Message is not valid handshake JSON
    #[error("invalid handshake message JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where a handshake message comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSource {
    /// JSON given directly as the argument
    Inline(String),
    /// JSON file
    File(PathBuf),
    /// Standard input
    Stdin,
}

impl MessageSource {
    /// Interpret a `--message` argument.
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else if let Some(path) = arg.strip_prefix('@') {
            Self::File(PathBuf::from(path))
        } else {
            Self::Inline(arg.to_string())
        }
    }

    /// Read the raw message text.
    pub fn read_to_string(&self) -> Result<String, InputError> {
        match self {
            Self::Inline(text) => Ok(text.clone()),
            Self::File(path) => std::fs::read_to_string(path).map_err(|error| InputError::Read {
                source_name: path.display().to_string(),
                error,
            }),
            Self::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .map_err(|error| InputError::Read {
                        source_name: "stdin".to_string(),
                        error,
                    })?;
                Ok(text)
            }
        }
    }

    /// Read and parse the handshake message.
    pub fn load(&self) -> Result<HandshakeMessage, InputError> {
        let text = self.read_to_string()?;
        Ok(serde_json::from_str(text.trim())?)
    }
}
