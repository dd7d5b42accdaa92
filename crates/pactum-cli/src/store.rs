//! Opening the local database and wiring the handshake engine over it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

use pactum_core::{sqlite_store::SqliteStore, ContactDirectory, Ed25519KeyService, HandshakeEngine};

pub type SqliteEngine = HandshakeEngine<SqliteStore, SqliteStore, Ed25519KeyService>;

/// An open database and the engine that runs over it.
pub struct Workspace {
    pub db_path: PathBuf,
    pub store: Arc<SqliteStore>,
    pub engine: SqliteEngine,
}

impl Workspace {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("could not create database directory {}", parent.display())
                })?;
            }
        }

        let store = Arc::new(
            SqliteStore::new(path)
                .with_context(|| format!("could not open database {}", path.display()))?,
        );
        let engine = HandshakeEngine::new(store.clone(), store.clone(), Arc::new(Ed25519KeyService));
        debug!(path = %path.display(), "opened database");

        Ok(Self {
            db_path: path.to_path_buf(),
            store,
            engine,
        })
    }

    pub fn directory(&self) -> &ContactDirectory<SqliteStore, SqliteStore, Ed25519KeyService> {
        self.engine.directory()
    }
}
