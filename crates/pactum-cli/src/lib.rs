//! Pactum CLI - accounts, contacts and mutual handshakes from the command line
//!
//! This crate provides a command-line interface for:
//! - Creating local accounts with long-lived signing keys
//! - Managing an account's contacts
//! - Producing and accepting handshake messages

pub mod cli;
pub mod config;
pub mod input;
pub mod output;
pub mod store;

#[cfg(test)]
mod proptests;

use pactum_core::{ErrorCode, HandshakeError};

pub use cli::Cli;
pub use config::{CliOverrides, Config};
pub use output::{JsonResponse, OutputFormat, OutputFormatter, SuccessMessage};

/// Exit codes for CLI operations
///
/// Exit codes provide machine-readable status for scripting and automation:
/// - 0: Success - operation completed successfully
/// - 1: General error - unspecified error occurred
/// - 2: Authentication failed - a handshake signature did not verify
/// - 3: Invalid input - bad arguments, message JSON, base64 or key bytes
/// - 4: Not found - account or contact does not exist
/// - 5: Already exists - account id or contact name is taken
/// - 6: Storage error - the database could not be read or written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully (exit code 0)
    Success = 0,
    /// General error (exit code 1)
    GeneralError = 1,
    /// Signature verification failed (exit code 2)
    AuthenticationFailed = 2,
    /// Invalid input provided (exit code 3)
    InvalidInput = 3,
    /// Account or contact not found (exit code 4)
    NotFound = 4,
    /// Account or contact already exists (exit code 5)
    AlreadyExists = 5,
    /// Storage failure (exit code 6)
    StorageError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ErrorCode> for ExitCode {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::NotFound => ExitCode::NotFound,
            ErrorCode::AlreadyExists => ExitCode::AlreadyExists,
            ErrorCode::DecodeError | ErrorCode::InvalidKeyFormat => ExitCode::InvalidInput,
            ErrorCode::SignatureMismatch => ExitCode::AuthenticationFailed,
            ErrorCode::PersistenceError => ExitCode::StorageError,
        }
    }
}

impl ExitCode {
    /// Convert to process exit code
    pub fn to_exit_code(self) -> std::process::ExitCode {
        std::process::ExitCode::from(self as u8)
    }

    /// Classify an error that escaped a command.
    pub fn from_error(error: &anyhow::Error) -> Self {
        if let Some(e) = error.downcast_ref::<HandshakeError>() {
            return e.code().into();
        }
        if error.downcast_ref::<input::InputError>().is_some()
            || error.downcast_ref::<config::ConfigError>().is_some()
        {
            return ExitCode::InvalidInput;
        }
        if error.downcast_ref::<pactum_core::store::StoreError>().is_some() {
            return ExitCode::StorageError;
        }
        ExitCode::GeneralError
    }

    /// Get the exit code name as a string
    pub fn name(&self) -> &'static str {
        match self {
            ExitCode::Success => "SUCCESS",
            ExitCode::GeneralError => "GENERAL_ERROR",
            ExitCode::AuthenticationFailed => "AUTH_FAILED",
            ExitCode::InvalidInput => "INVALID_INPUT",
            ExitCode::NotFound => "NOT_FOUND",
            ExitCode::AlreadyExists => "ALREADY_EXISTS",
            ExitCode::StorageError => "STORAGE_ERROR",
        }
    }
}
