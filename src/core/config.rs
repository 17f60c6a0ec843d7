//! Configuration management for lmsync
//!
//! Supports environment variables, config files, and runtime overrides.
//! CLI flags win over everything else.
//!
//! Config file location: ~/.config/lmsync/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{LmSyncError, Result};

/// Default base URL written into generated configs and used for discovery
pub const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";

/// Main configuration for lmsync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LM Studio server configuration
    pub server: ServerConfig,
}

/// LM Studio server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL clients will connect to (default: http://localhost:1234/v1)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("LMSYNC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout_secs: env::var("LMSYNC_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lmsync")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(LmSyncError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| LmSyncError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| LmSyncError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }
}
