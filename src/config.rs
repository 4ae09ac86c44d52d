//! Configuration management for RAX File Manager
//!
//! Everything is read once at startup; changing a value requires a restart.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Default values, overridden by `config.toml` and then by `RAX_FILES_*`
/// environment variables.
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SERVER_ROOT: &str = "uploads";
const DEFAULT_MAX_UPLOAD_SIZE_MB: u64 = 1024;
const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    // ═══ NETWORK ═══
    /// IP address to bind the HTTP listener
    pub bind_address: String,

    /// Port for the HTTP listener
    pub port: u16,

    // ═══ STORAGE ═══
    /// Directory every request is confined to; created if absent
    pub server_root: String,

    /// Where upload bodies are written before being moved into place.
    /// Defaults to the system temp directory.
    #[serde(default)]
    pub staging_dir: Option<String>,

    // ═══ LIMITS ═══
    /// Maximum size of a single upload in MB
    pub max_upload_size_mb: u64,

    /// Read buffer size when streaming downloads
    pub chunk_size: usize,
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        // Packaged layout first, then the working directory
        let config_paths = ["rax-file-manager/config", "config"];

        let mut builder = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("server_root", DEFAULT_SERVER_ROOT)?
            .set_default("max_upload_size_mb", DEFAULT_MAX_UPLOAD_SIZE_MB as i64)?
            .set_default("chunk_size", DEFAULT_CHUNK_SIZE as i64)?;

        for config_path in config_paths {
            builder = builder.add_source(File::with_name(config_path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("RAX_FILES").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration rooted at `server_root` with every other value defaulted
    pub fn with_root(server_root: impl Into<String>) -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            server_root: server_root.into(),
            staging_dir: None,
            max_upload_size_mb: DEFAULT_MAX_UPLOAD_SIZE_MB,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.server_root.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "server_root cannot be empty".into(),
            ));
        }

        if self.max_upload_size_mb == 0 {
            return Err(config::ConfigError::Message(
                "max_upload_size_mb must be greater than 0".into(),
            ));
        }

        if self.chunk_size == 0 {
            return Err(config::ConfigError::Message(
                "chunk_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get server root as PathBuf
    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    /// Get the staging directory, falling back to the system temp directory
    pub fn staging_path(&self) -> PathBuf {
        match &self.staging_dir {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => std::env::temp_dir(),
        }
    }

    /// Get maximum upload size in bytes
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}
