// SPDX-License-Identifier: Apache-2.0

//! Configuration management for Wasp.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `WASP_`)
//! 2. Config file: `~/.config/wasp/config.toml`
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```bash
//! # Override the database path via environment variable
//! WASP_STORAGE__DATABASE_PATH=/tmp/wasp.db cargo run
//! ```

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::WaspError;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Execution ledger settings.
    pub storage: StorageConfig,
    /// Scan execution settings.
    pub scan: ScanConfig,
}

/// Execution ledger settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: data_dir().join("wasp.db"),
        }
    }
}

/// Scan execution settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Per-scanner timeout in seconds. 0 disables the timeout.
    pub timeout_seconds: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { timeout_seconds: 0 }
    }
}

/// Returns the Wasp configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/wasp`.
#[must_use]
pub fn config_dir() -> PathBuf {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg_config) if !xdg_config.is_empty() => PathBuf::from(xdg_config).join("wasp"),
        _ => dirs::home_dir()
            .expect("Could not determine home directory - is HOME set?")
            .join(".config")
            .join("wasp"),
    }
}

/// Returns the Wasp data directory.
///
/// Respects the `XDG_DATA_HOME` environment variable if set,
/// otherwise defaults to `~/.local/share/wasp`.
#[must_use]
pub fn data_dir() -> PathBuf {
    match std::env::var("XDG_DATA_HOME") {
        Ok(xdg_data) if !xdg_data.is_empty() => PathBuf::from(xdg_data).join("wasp"),
        _ => dirs::home_dir()
            .expect("Could not determine home directory - is HOME set?")
            .join(".local")
            .join("share")
            .join("wasp"),
    }
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration.
///
/// Loads from config file (if exists) and environment variables.
/// Environment variables use the prefix `WASP_` and double underscore
/// for nested keys (e.g., `WASP_STORAGE__DATABASE_PATH`).
///
/// # Errors
///
/// Returns `WaspError::Validation` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, WaspError> {
    let config_path = config_file_path();

    let config = Config::builder()
        // Load from config file (optional - may not exist)
        .add_source(File::with_name(config_path.to_string_lossy().as_ref()).required(false))
        // Override with environment variables
        .add_source(
            Environment::with_prefix("WASP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    Ok(app_config)
}
