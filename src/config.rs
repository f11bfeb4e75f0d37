//! Configuration management for the gallery store
//!
//! Built-in defaults, overridden by an optional `config.toml`, overridden by
//! `GALLERY_`-prefixed environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::storage::root::DEFAULT_LOCATION;
use crate::storage::scanner::{DEFAULT_EXTENSION, is_valid_extension};

/// Environment variable naming an alternative configuration file
pub const CONFIG_PATH_ENV: &str = "GALLERY_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config";

/// Complete application configuration
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

/// Storage root location and the extensions picked up by `save`
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage root directory
    /// Environment: GALLERY_STORAGE__LOCATION
    pub location: String,

    /// Case-sensitive extensions without the leading dot
    /// Environment: GALLERY_STORAGE__EXTENSIONS (comma separated)
    pub extensions: Vec<String>,
}

/// Line-protocol front end settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub max_clients: usize,
    pub max_command_length: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 2122,
            max_clients: 10,
            max_command_length: 1024,
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.toml` (or `$GALLERY_CONFIG`) with
    /// environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("GALLERY")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("storage.extensions")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.storage.location.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "storage.location cannot be empty".into(),
            ));
        }

        if self.storage.extensions.is_empty() {
            return Err(config::ConfigError::Message(
                "storage.extensions must name at least one extension".into(),
            ));
        }

        if let Some(bad) = self
            .storage
            .extensions
            .iter()
            .find(|ext| !is_valid_extension(ext))
        {
            return Err(config::ConfigError::Message(format!(
                "invalid extension '{bad}' in storage.extensions"
            )));
        }

        if self.server.port == 0 {
            return Err(config::ConfigError::Message(
                "server.port cannot be 0".into(),
            ));
        }

        if self.server.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "server.max_clients must be greater than 0".into(),
            ));
        }

        if self.server.max_command_length == 0 {
            return Err(config::ConfigError::Message(
                "server.max_command_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl ServerConfig {
    /// Get bind address and port as socket address
    pub fn socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
