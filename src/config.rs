//! Server configuration
//!
//! Values come from the process environment (after `.env` is loaded by
//! `dotenvy` in `main`). The upload limit is fixed in code.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Maximum accepted PDF size: 50MB
pub const MAX_UPLOAD_SIZE: u64 = 50 * 1024 * 1024;

/// Error raised while reading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Overrides scheme and host when building share links
    pub public_base_url: Option<String>,
}

/// On-disk locations and limits
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding uploaded PDFs
    pub upload_dir: PathBuf,
    /// Directory holding the static frontend (including `share.html`)
    pub static_dir: PathBuf,
    pub max_upload_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                port: 3000,
                public_base_url: None,
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from("uploads"),
                static_dir: PathBuf::from("public"),
                max_upload_size: MAX_UPLOAD_SIZE,
            },
        }
    }
}

impl Config {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("HOST") {
            config.server.host = value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { var: "HOST", value })?;
        }

        if let Some(value) = lookup("PORT") {
            config.server.port = value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { var: "PORT", value })?;
        }

        if let Some(value) = lookup("UPLOAD_DIR") {
            config.storage.upload_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup("STATIC_DIR") {
            config.storage.static_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup("PUBLIC_BASE_URL") {
            let trimmed = value.trim().trim_end_matches('/');
            if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    var: "PUBLIC_BASE_URL",
                    value,
                });
            }
            config.server.public_base_url = Some(trimmed.to_string());
        }

        Ok(config)
    }

    /// Socket address the server binds to
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}
