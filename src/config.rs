//! Configuration module for imgdrop.

use serde::Deserialize;
use std::path::Path;

use crate::{ImgdropError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL (e.g. `sqlite://data/imgdrop.db`).
    #[serde(default = "default_db_url")]
    pub url: String,
}

fn default_db_url() -> String {
    "sqlite://data/imgdrop.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
        }
    }
}

/// Upload intake configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Directory where uploaded blobs are written.
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    /// URL prefix under which the upload directory is served.
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_size")]
    pub max_size_bytes: u64,
    /// Accepted file type tokens, matched against extension and MIME subtype.
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_public_prefix() -> String {
    "/uploads".to_string()
}

fn default_max_size() -> u64 {
    crate::upload::DEFAULT_MAX_UPLOAD_SIZE
}

fn default_allowed_types() -> Vec<String> {
    crate::upload::DEFAULT_ALLOWED_TYPES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            public_prefix: default_public_prefix(),
            max_size_bytes: default_max_size(),
            allowed_types: default_allowed_types(),
        }
    }
}

/// Web front-end configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Whether to serve the static assets directory.
    #[serde(default = "default_serve_static")]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_serve_static() -> bool {
    true
}

fn default_static_path() -> String {
    "public".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            serve_static: default_serve_static(),
            static_path: default_static_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/imgdrop.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upload configuration.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Web front-end configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// An environment override that was set but not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOverride {
    /// Environment variable name.
    pub key: &'static str,
    /// The value that was rejected.
    pub value: String,
}

impl std::fmt::Display for RejectedOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ignoring invalid {} value: {:?}", self.key, self.value)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ImgdropError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file, or use defaults when it is missing.
    ///
    /// Environment overrides are not applied here; see [`Config::apply_env_overrides`].
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ImgdropError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: HTTP listen port
    /// - `DATABASE_URL`: database connection string
    ///
    /// Returns the overrides that were present but could not be applied.
    pub fn apply_env_overrides(&mut self) -> Vec<RejectedOverride> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using the given variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Vec<RejectedOverride>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rejected = Vec::new();

        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => rejected.push(RejectedOverride {
                    key: "PORT",
                    value: port,
                }),
            }
        }

        if let Some(url) = lookup("DATABASE_URL") {
            if url.trim().is_empty() {
                rejected.push(RejectedOverride {
                    key: "DATABASE_URL",
                    value: url,
                });
            } else {
                self.database.url = url;
            }
        }

        rejected
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(ImgdropError::Validation(
                "database url is not set. Set it in config.toml or via DATABASE_URL.".to_string(),
            ));
        }
        if self.upload.max_size_bytes == 0 {
            return Err(ImgdropError::Validation(
                "upload.max_size_bytes must be greater than zero".to_string(),
            ));
        }
        if self.upload.allowed_types.is_empty() {
            return Err(ImgdropError::Validation(
                "upload.allowed_types must not be empty".to_string(),
            ));
        }
        if !self.upload.public_prefix.starts_with('/')
            || self.upload.public_prefix.trim_end_matches('/').is_empty()
        {
            return Err(ImgdropError::Validation(format!(
                "upload.public_prefix must be a path below '/': {}",
                self.upload.public_prefix
            )));
        }
        Ok(())
    }
}
