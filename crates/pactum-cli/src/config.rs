//! Configuration management for pactum
//!
//! This module handles loading, saving, and validating configuration for the
//! Pactum CLI. Configuration is stored in TOML format.
//!
//! # Configuration File Locations
//!
//! - Linux: `~/.config/pactum/config.toml`
//! - macOS: `~/Library/Application Support/dev.pactum.pactum/config.toml`
//! - Windows: `%APPDATA%\pactum\pactum\config\config.toml`
//!
//! Precedence is CLI flags, then the config file, then built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// CLI configuration
///
/// # Example TOML
///
/// ```toml
/// [storage]
/// db_path = "/var/lib/pactum/pactum.db"  # Omit for the default location
///
/// [output]
/// format = "table"  # "table" | "json" | "quiet"
/// verbose = false
///
/// [logging]
/// level = "warn"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database (absent = default location)
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format: "table", "json", "quiet"
    #[serde(default = "default_format")]
    pub format: String,

    /// Verbose output
    #[serde(default)]
    pub verbose: bool,
}

fn default_format() -> String {
    "table".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            verbose: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "pactum", "pactum")
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from custom path or default
    ///
    /// An explicitly named file must load. A broken file at the default
    /// location is reported and replaced by the defaults.
    pub fn load_from(custom_path: Option<&Path>) -> Result<Self, ConfigError> {
        match custom_path {
            Some(path) => Self::load(path),
            None => Ok(Self::load_default().unwrap_or_else(|e| {
                eprintln!("Warning: Config error: {e}");
                eprintln!("Using default configuration.");
                Self::default()
            })),
        }
    }

    /// Get default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path (for the database)
    pub fn data_dir() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Database path when neither the CLI nor the config file names one
    pub fn default_db_path() -> Option<PathBuf> {
        Self::data_dir().map(|dir| dir.join("pactum.db"))
    }

    /// The database path this configuration resolves to
    pub fn db_path(&self) -> Option<PathBuf> {
        self.storage.db_path.clone().or_else(Self::default_db_path)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Create default configuration file if it doesn't exist
    pub fn create_default_if_missing() -> Result<bool, ConfigError> {
        if let Some(path) = Self::default_path() {
            if !path.exists() {
                let config = Self::default();
                config.save(&path)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_formats = ["table", "json", "quiet"];
        if !valid_formats.contains(&self.output.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid output format '{}'. Valid values: {:?}",
                self.output.format, valid_formats
            )));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level '{}'. Valid values: {:?}",
                self.logging.level, valid_levels
            )));
        }

        if let Some(path) = &self.storage.db_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "storage.db_path must not be empty".to_string(),
                ));
            }
            if path.is_dir() {
                return Err(ConfigError::ValidationError(format!(
                    "storage.db_path '{}' is a directory",
                    path.display()
                )));
            }
        }

        Ok(())
    }
}

/// CLI configuration overrides
///
/// This struct captures CLI flags that can override config file values.
/// Command-line arguments take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Output format override
    pub output_format: Option<String>,
    /// Verbose flag override
    pub verbose: Option<bool>,
    /// Debug flag override
    pub debug: Option<bool>,
    /// Database path override
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to configuration
    pub fn with_overrides(mut self, overrides: &CliOverrides) -> Self {
        if let Some(ref format) = overrides.output_format {
            self.output.format = format.clone();
        }
        if let Some(verbose) = overrides.verbose {
            self.output.verbose = verbose;
            if verbose && self.logging.level == "warn" {
                self.logging.level = "info".to_string();
            }
        }
        if let Some(true) = overrides.debug {
            self.logging.level = "debug".to_string();
        }
        if let Some(ref path) = overrides.db_path {
            self.storage.db_path = Some(path.clone());
        }
        self
    }
}
