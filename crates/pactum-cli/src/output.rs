//! Output formatting for CLI results
//!
//! This module provides consistent output formatting across all CLI commands.
//! It supports three output formats:
//! - Table: Human-readable tables (default)
//! - JSON: Structured JSON for scripting and automation
//! - Quiet: Minimal output; handshake commands print only the compact message
//!   JSON so it can be piped to the other party

use std::str::FromStr;

use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

use pactum_core::{Account, Contact, ContactSummary, HandshakeMessage};
use pactum_crypto::{encoding, hash::fingerprint, hash::short_fingerprint};

use crate::config::OutputConfig;
use crate::ExitCode;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for scripting
    Json,
    /// Minimal output
    Quiet,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "quiet" => Ok(Self::Quiet),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Quiet => write!(f, "quiet"),
        }
    }
}

/// Standard JSON response wrapper for consistent schema
#[derive(Serialize)]
pub struct JsonResponse<T: Serialize> {
    /// Whether the operation was successful
    pub success: bool,
    /// The response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Numeric exit code (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Exit code name (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code_name: Option<&'static str>,
    /// ISO 8601 timestamp
    pub timestamp: String,
    /// Command that was executed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl<T: Serialize> JsonResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            exit_code: None,
            exit_code_name: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: None,
        }
    }

    /// Create a successful response with command context
    pub fn success_with_command(data: T, command: &str) -> Self {
        Self {
            command: Some(command.to_string()),
            ..Self::success(data)
        }
    }
}

impl JsonResponse<()> {
    /// Create an error response
    pub fn error(message: &str) -> JsonResponse<()> {
        JsonResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
            exit_code: None,
            exit_code_name: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: None,
        }
    }

    /// Create an error response carrying the exit code
    pub fn error_with_code(message: &str, code: ExitCode) -> JsonResponse<()> {
        JsonResponse {
            exit_code: Some(code.into()),
            exit_code_name: Some(code.name()),
            ..Self::error(message)
        }
    }
}

/// Formats output for different modes
pub struct OutputFormatter {
    format: OutputFormat,
    verbose: bool,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Formatter for a validated `[output]` config section
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.format.parse().unwrap_or_default(), config.verbose)
    }

    /// Get the current output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format account info
    pub fn format_account(&self, account: &Account, command: &str) -> String {
        let info = AccountOutput::from(account);
        match self.format {
            OutputFormat::Table => {
                let mut table = property_table();
                table.add_row(vec!["Account ID", &info.id.to_string()]);
                table.add_row(vec!["Signing Key", &info.signing_key]);
                table.add_row(vec!["Fingerprint", &info.fingerprint]);
                table.to_string()
            }
            OutputFormat::Json => self.to_json_response(&info, command),
            OutputFormat::Quiet => String::new(),
        }
    }

    /// Format an owner's contact list
    pub fn format_contacts(&self, owner: u64, contacts: &[ContactSummary]) -> String {
        match self.format {
            OutputFormat::Table => {
                if contacts.is_empty() {
                    return format!("No contacts found for account {owner}.");
                }
                let mut table = Table::new();
                table.load_preset(UTF8_FULL);
                table.set_header(vec!["Name", "State"]);
                for c in contacts {
                    table.add_row(vec![c.name.as_str(), c.state.as_str()]);
                }
                table.to_string()
            }
            OutputFormat::Json => self.to_json_response(
                &ContactsOutput {
                    owner,
                    count: contacts.len(),
                    contacts,
                },
                "contact list",
            ),
            OutputFormat::Quiet => String::new(),
        }
    }

    /// Format a single contact
    pub fn format_contact(&self, contact: &Contact, command: &str) -> String {
        let detail = ContactDetailOutput::from(contact);
        match self.format {
            OutputFormat::Table => {
                let mut table = property_table();
                table.add_row(vec!["Owner", &detail.owner.to_string()]);
                table.add_row(vec!["Name", &detail.name]);
                table.add_row(vec!["State", detail.state]);
                table.add_row(vec!["One-use Key", &detail.oneuse_key]);
                table.add_row(vec![
                    "Counterparty ID",
                    detail.counterparty_identifier.as_deref().unwrap_or("-"),
                ]);
                table.add_row(vec![
                    "Counterparty Key",
                    detail.counterparty_signing_key.as_deref().unwrap_or("-"),
                ]);
                table.to_string()
            }
            OutputFormat::Json => self.to_json_response(&detail, command),
            OutputFormat::Quiet => String::new(),
        }
    }

    /// Format an outgoing handshake message
    ///
    /// Quiet mode prints the compact message JSON and nothing else.
    pub fn format_message(&self, message: &HandshakeMessage, command: &str) -> String {
        match self.format {
            OutputFormat::Table => {
                let mut table = property_table();
                table.add_row(vec!["identifier", message.identifier.as_str()]);
                table.add_row(vec!["oneuseKey", message.oneuse_key.as_str()]);
                table.add_row(vec!["signingKey", message.signing_key.as_str()]);
                table.add_row(vec!["signature", message.signature.as_str()]);
                format!(
                    "{table}\nSend this to the other party:\n{}",
                    compact_json(message)
                )
            }
            OutputFormat::Json => self.to_json_response(message, command),
            OutputFormat::Quiet => compact_json(message),
        }
    }

    /// Format error with exit code context
    pub fn format_error_with_code(&self, message: &str, code: ExitCode) -> String {
        match self.format {
            OutputFormat::Table => format!("Error: {message}"),
            OutputFormat::Json => to_json(&JsonResponse::error_with_code(message, code)),
            OutputFormat::Quiet => String::new(),
        }
    }

    /// Progress message (only shown in verbose mode)
    pub fn progress(&self, message: &str) {
        if self.verbose && self.format == OutputFormat::Table {
            eprintln!("... {message}");
        }
    }

    /// Success message
    pub fn success(&self, message: &str, command: &str) {
        match self.format {
            OutputFormat::Table => println!("✓ {message}"),
            OutputFormat::Json => println!(
                "{}",
                self.to_json_response(&SuccessMessage::new(message), command)
            ),
            OutputFormat::Quiet => {}
        }
    }

    /// Error message; quiet mode relies on the exit code
    pub fn error(&self, message: &str, code: ExitCode) {
        match self.format {
            OutputFormat::Table => eprintln!("✗ {message}"),
            OutputFormat::Json => println!("{}", self.format_error_with_code(message, code)),
            OutputFormat::Quiet => {}
        }
    }

    /// Format data with consistent JSON response wrapper
    fn to_json_response<T: Serialize>(&self, value: &T, command: &str) -> String {
        to_json(&JsonResponse::success_with_command(value, command))
    }
}

fn property_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Property", "Value"]);
    table
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"success\": false, \"error\": \"serialization error: {e}\"}}"))
}

fn compact_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| format!("{{\"success\": false, \"error\": \"serialization error: {e}\"}}"))
}

// JSON output structures

#[derive(Serialize)]
struct AccountOutput {
    id: u64,
    signing_key: String,
    fingerprint: String,
}

impl From<&Account> for AccountOutput {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id,
            signing_key: encoding::encode(a.signing_public_key()),
            fingerprint: fingerprint(a.signing_public_key()),
        }
    }
}

#[derive(Serialize)]
struct ContactsOutput<'a> {
    owner: u64,
    count: usize,
    contacts: &'a [ContactSummary],
}

#[derive(Serialize)]
struct ContactDetailOutput {
    owner: u64,
    name: String,
    state: &'static str,
    oneuse_key: String,
    counterparty_identifier: Option<String>,
    counterparty_signing_key: Option<String>,
    counterparty_fingerprint: Option<String>,
}

impl From<&Contact> for ContactDetailOutput {
    fn from(c: &Contact) -> Self {
        let counterparty = c.counterparty();
        Self {
            owner: c.owner(),
            name: c.name().to_string(),
            state: c.state().as_str(),
            oneuse_key: encoding::encode(c.handshake_public_key()),
            counterparty_identifier: counterparty.map(|cp| cp.identifier.clone()),
            counterparty_signing_key: counterparty.map(|cp| encoding::encode(&cp.signing_key)),
            counterparty_fingerprint: counterparty.map(|cp| short_fingerprint(&cp.signing_key)),
        }
    }
}

/// Simple success message for JSON output
#[derive(Serialize)]
pub struct SuccessMessage {
    pub message: String,
}

impl SuccessMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
