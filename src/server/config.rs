//! Server configuration parsing.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Server configuration loaded from a TOML file.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Root directory of the databases. The user store lives in `users/`.
    #[serde(default)]
    pub db_dir: String,
    /// Address to listen on, as `host:port`.
    #[serde(default)]
    pub bind_address: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"users_service=debug"`.
    pub level: String,
    pub format: LogFormat,
    /// `"stdout"`, `"stderr"` or a file path.
    pub output: String,
    pub color: bool,
    pub target: bool,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            output: "stdout".to_string(),
            color: true,
            target: true,
            timestamps: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Cross-origin settings. Disabled means cross-origin requests are denied.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub allow_credentials: bool,
    /// Preflight cache duration in seconds.
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allow_origins: Vec::new(),
            allow_methods: ["GET", "POST", "PATCH", "DELETE"]
                .into_iter()
                .map(String::from)
                .collect(),
            allow_headers: vec!["content-type".to_string()],
            allow_credentials: false,
            max_age: 3600,
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e))?;
        Self::from_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject missing or empty required fields and malformed addresses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_dir.trim().is_empty() {
            return Err(ConfigError::Missing("db_dir"));
        }
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Missing("bind_address"));
        }
        // Host names are resolved at bind time; only the shape is checked here
        match self.bind_address.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(()),
            _ => Err(ConfigError::InvalidAddress(self.bind_address.clone())),
        }
    }

    /// Location of the user database file.
    pub fn users_db_path(&self) -> PathBuf {
        Path::new(&self.db_dir).join("users").join("users.db")
    }
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(String, std::io::Error),
    /// TOML parse error.
    Parse(toml::de::Error),
    /// A required field is missing or empty.
    Missing(&'static str),
    /// `bind_address` is not of the form `host:port`.
    InvalidAddress(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Failed to read config file '{}': {}", path, e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Missing(field) => {
                write!(f, "Missing required config field '{}'", field)
            }
            ConfigError::InvalidAddress(addr) => {
                write!(f, "Invalid bind_address '{}', expected host:port", addr)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
