//! CLI command definitions and argument parsing

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use pactum_core::{keys::generate_account, store::AccountStore, store::StoreError, UserId};
use pactum_crypto::hash::short_fingerprint;

use crate::config::{CliOverrides, Config};
use crate::input::MessageSource;
use crate::output::{OutputFormat, OutputFormatter};
use crate::store::Workspace;
use crate::ExitCode;

/// Pactum CLI - mutual contact handshakes
#[derive(Parser, Debug)]
#[command(name = "pactum")]
#[command(version, about = "Pactum CLI - mutual contact handshakes")]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: table, json, quiet
    #[arg(long, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database path
    #[arg(long, global = true, env = "PACTUM_DB")]
    pub db: Option<PathBuf>,
}

impl Cli {
    /// Config values set by flags on this invocation
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            output_format: self.output.map(|f| f.to_string()),
            verbose: self.verbose.then_some(true),
            debug: self.debug.then_some(true),
            db_path: self.db.clone(),
        }
    }

    /// Execute the CLI command with a resolved configuration
    pub async fn execute_with_config(self, config: Config) -> anyhow::Result<ExitCode> {
        let formatter = OutputFormatter::from_config(&config.output);
        let db_path = config
            .db_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine database path; pass --db"))?;

        formatter.progress(&format!("Opening {}...", db_path.display()));
        let workspace = Workspace::open(&db_path)?;

        match self.command {
            Commands::Account(args) => args.execute(&workspace, &formatter).await,
            Commands::Contact(args) => args.execute(&workspace, &formatter).await,
            Commands::Handshake(args) => args.execute(&workspace, &formatter).await,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage local accounts
    Account(AccountArgs),
    /// Manage an account's contacts
    Contact(ContactArgs),
    /// Produce and accept handshake messages
    Handshake(HandshakeArgs),
}

fn emit(output: String) {
    if !output.is_empty() {
        println!("{output}");
    }
}

/// Arguments for the account command
#[derive(Parser, Debug)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub action: AccountAction,
}

/// Account subcommands
#[derive(Subcommand, Debug)]
pub enum AccountAction {
    /// Create an account with a new signing key pair
    Create {
        /// Account ID
        id: UserId,
    },
    /// Show an account's signing key
    Show {
        /// Account ID
        id: UserId,
    },
}

impl AccountArgs {
    pub async fn execute(
        self,
        workspace: &Workspace,
        formatter: &OutputFormatter,
    ) -> anyhow::Result<ExitCode> {
        match self.action {
            AccountAction::Create { id } => {
                formatter.progress(&format!("Generating signing key for account {id}..."));
                let account = generate_account(id);
                match workspace.store.insert_account(account.clone()).await {
                    Ok(()) => {
                        info!(
                            account = id,
                            signing_key = %short_fingerprint(account.signing_public_key()),
                            "created account"
                        );
                        emit(formatter.format_account(&account, "account create"));
                        Ok(ExitCode::Success)
                    }
                    Err(StoreError::AlreadyExists(_)) => {
                        formatter.error(
                            &format!("Account already exists: {id}"),
                            ExitCode::AlreadyExists,
                        );
                        Ok(ExitCode::AlreadyExists)
                    }
                    Err(e) => Err(e.into()),
                }
            }
            AccountAction::Show { id } => match workspace.store.load_account(id).await? {
                Some(account) => {
                    emit(formatter.format_account(&account, "account show"));
                    Ok(ExitCode::Success)
                }
                None => {
                    formatter.error(&format!("Account not found: {id}"), ExitCode::NotFound);
                    Ok(ExitCode::NotFound)
                }
            },
        }
    }
}

/// Arguments for the contact command
#[derive(Parser, Debug)]
pub struct ContactArgs {
    #[command(subcommand)]
    pub action: ContactAction,
}

/// Contact subcommands
#[derive(Subcommand, Debug)]
pub enum ContactAction {
    /// Create a contact with a fresh one-use key pair
    Create {
        /// Owning account ID
        #[arg(long)]
        user: UserId,
        /// Contact name
        name: String,
    },
    /// List an account's contacts
    List {
        /// Owning account ID
        #[arg(long)]
        user: UserId,
    },
    /// Show a contact
    Show {
        /// Owning account ID
        #[arg(long)]
        user: UserId,
        /// Contact name
        name: String,
    },
    /// Delete a contact
    Delete {
        /// Owning account ID
        #[arg(long)]
        user: UserId,
        /// Contact name
        name: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

impl ContactArgs {
    pub async fn execute(
        self,
        workspace: &Workspace,
        formatter: &OutputFormatter,
    ) -> anyhow::Result<ExitCode> {
        let directory = workspace.directory();

        match self.action {
            ContactAction::Create { user, name } => {
                let contact = directory.create(user, &name).await?;
                emit(formatter.format_contact(&contact, "contact create"));
                Ok(ExitCode::Success)
            }
            ContactAction::List { user } => {
                formatter.progress(&format!("Loading contacts for account {user}..."));
                let contacts = directory.list_by_owner(user).await?;
                emit(formatter.format_contacts(user, &contacts));
                Ok(ExitCode::Success)
            }
            ContactAction::Show { user, name } => match directory.find(user, &name).await? {
                Some(contact) => {
                    emit(formatter.format_contact(&contact, "contact show"));
                    Ok(ExitCode::Success)
                }
                None => {
                    formatter.error(&format!("Contact not found: {name}"), ExitCode::NotFound);
                    Ok(ExitCode::NotFound)
                }
            },
            ContactAction::Delete { user, name, force } => {
                if directory.find(user, &name).await?.is_none() {
                    formatter.error(&format!("Contact not found: {name}"), ExitCode::NotFound);
                    return Ok(ExitCode::NotFound);
                }

                // Confirm unless --force is specified
                if !force {
                    eprintln!("WARNING: This will delete contact '{name}' and its one-use key.");
                    eprintln!("You will need to repeat the handshake to re-establish it.");
                    eprint!("Are you sure you want to continue? [y/N] ");
                    io::stderr().flush()?;

                    let mut answer = String::new();
                    io::stdin().read_line(&mut answer)?;

                    if !answer.trim().eq_ignore_ascii_case("y") {
                        eprintln!("Aborted.");
                        return Ok(ExitCode::Success);
                    }
                }

                directory.delete(user, &name).await?;
                formatter.success(&format!("Deleted contact: {name}"), "contact delete");
                Ok(ExitCode::Success)
            }
        }
    }
}

/// Arguments for the handshake command
#[derive(Parser, Debug)]
pub struct HandshakeArgs {
    #[command(subcommand)]
    pub action: HandshakeAction,
}

/// Handshake subcommands
#[derive(Subcommand, Debug)]
pub enum HandshakeAction {
    /// Start a handshake, creating the contact if needed
    Init {
        /// Owning account ID
        #[arg(long)]
        user: UserId,
        /// Contact name
        name: String,
    },
    /// Accept a handshake another party started
    AcceptInit {
        /// Owning account ID
        #[arg(long)]
        user: UserId,
        /// Contact name
        name: String,
        /// Message JSON, @file, or - for stdin
        #[arg(long)]
        message: String,
    },
    /// Answer a handshake for an existing contact
    Reply {
        /// Owning account ID
        #[arg(long)]
        user: UserId,
        /// Contact name
        name: String,
    },
    /// Accept the reply to a handshake we started
    AcceptReply {
        /// Owning account ID
        #[arg(long)]
        user: UserId,
        /// Contact name
        name: String,
        /// Message JSON, @file, or - for stdin
        #[arg(long)]
        message: String,
    },
}

impl HandshakeArgs {
    pub async fn execute(
        self,
        workspace: &Workspace,
        formatter: &OutputFormatter,
    ) -> anyhow::Result<ExitCode> {
        let engine = &workspace.engine;

        match self.action {
            HandshakeAction::Init { user, name } => {
                let message = engine.init_handshake(user, &name).await?;
                emit(formatter.format_message(&message, "handshake init"));
            }
            HandshakeAction::Reply { user, name } => {
                let message = engine.reply_handshake(user, &name).await?;
                emit(formatter.format_message(&message, "handshake reply"));
            }
            HandshakeAction::AcceptInit {
                user,
                name,
                message,
            } => {
                let incoming = MessageSource::parse(&message).load()?;
                let contact = engine.accept_init_handshake(user, &name, &incoming).await?;
                emit(formatter.format_contact(&contact, "handshake accept-init"));
            }
            HandshakeAction::AcceptReply {
                user,
                name,
                message,
            } => {
                let incoming = MessageSource::parse(&message).load()?;
                let contact = engine.accept_reply_handshake(user, &name, &incoming).await?;
                emit(formatter.format_contact(&contact, "handshake accept-reply"));
            }
        }
        Ok(ExitCode::Success)
    }
}
