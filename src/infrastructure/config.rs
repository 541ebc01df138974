//! Configuration management
//!
//! Loads configuration from config.toml at startup.
//! Values are fixed for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::identity::{self, IdentityParams};
use crate::quotes::client::DEFAULT_BASE_URL;

/// Service configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Identity derivation parameters
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Database settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Quote proxy settings
    #[serde(default)]
    pub quotes: QuoteConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Take the caller address from X-Forwarded-For (behind a reverse proxy)
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

/// Identity derivation configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    #[serde(default = "default_salt")]
    pub salt: String,

    /// PBKDF2 rounds
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Derived key length in bytes
    #[serde(default = "default_key_length")]
    pub key_length: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite file, or ":memory:"
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

/// Quote proxy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// EnvFilter directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            trust_forwarded_for: false,
        }
    }
}

impl ServerConfig {
    /// Socket address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            salt: default_salt(),
            iterations: default_iterations(),
            key_length: default_key_length(),
        }
    }
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("salt", &"<redacted>")
            .field("iterations", &self.iterations)
            .field("key_length", &self.key_length)
            .finish()
    }
}

impl IdentityConfig {
    pub fn params(&self) -> IdentityParams {
        IdentityParams {
            salt: self.salt.as_bytes().to_vec(),
            iterations: self.iterations,
            key_length: self.key_length,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_salt() -> String {
    identity::DEFAULT_SALT.to_string()
}

fn default_iterations() -> u32 {
    identity::DEFAULT_ITERATIONS
}

fn default_key_length() -> usize {
    identity::DEFAULT_KEY_LENGTH
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("stocks.db")
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from config.toml file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// # Errors
    /// Returns error if file exists but cannot be parsed or fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        let config = match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::from_toml(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(ConfigError::IoError(e)),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Reject values that would break identity derivation or quoting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.salt.is_empty() {
            return Err(ConfigError::Invalid("identity.salt must not be empty"));
        }
        if self.identity.iterations == 0 {
            return Err(ConfigError::Invalid("identity.iterations must be > 0"));
        }
        if self.identity.key_length == 0 {
            return Err(ConfigError::Invalid("identity.key_length must be > 0"));
        }
        if self.quotes.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("quotes.base_url must not be empty"));
        }
        Ok(())
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading file
    IoError(std::io::Error),
    /// Parse error (invalid TOML)
    ParseError(String),
    /// Parsed but unusable value
    Invalid(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::ParseError(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::ParseError(_) | ConfigError::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert!(!config.server.trust_forwarded_for);
        assert_eq!(config.identity.iterations, 2048);
        assert_eq!(config.identity.key_length, 32);
        assert_eq!(config.storage.path, PathBuf::from("stocks.db"));
        assert_eq!(config.quotes.timeout_secs, 10);
        assert_eq!(config.server.bind_address(), "0.0.0.0:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8080
            trust_forwarded_for = true

            [storage]
            path = ":memory:"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.server.trust_forwarded_for);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.path, PathBuf::from(":memory:"));
        assert_eq!(config.identity.salt, identity::DEFAULT_SALT);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Config::from_toml("[server]\nport = \"not a port\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.identity.iterations = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.identity.salt.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.quotes.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_identity_params() {
        let params = IdentityConfig::default().params();
        assert_eq!(params, IdentityParams::default());
    }

    #[test]
    fn test_debug_redacts_salt() {
        let rendered = format!("{:?}", Config::default());
        assert!(!rendered.contains(identity::DEFAULT_SALT));
    }
}
