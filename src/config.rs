// src/config.rs
//! Runtime settings.
//!
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. `did-wizard.toml` in the working directory (optional), or the file given
//!    on the command line (required)
//! 3. Environment variables prefixed `DID_WIZARD_`, nested keys joined with
//!    `__`, e.g. `DID_WIZARD_LEDGER__API_URL`
//!
//! `.env` files are loaded into the environment by the binary before this runs.

use crate::error::ConfigError;
use crate::utils::crypto::DEFAULT_PBKDF2_ITERATIONS;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LEDGER_API_URL: &str = "http://localhost:8080/api/v1/entries";

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSettings {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl LedgerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VaultSettings {
    pub path: PathBuf,
    pub pbkdf2_iterations: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiSettings {
    /// Forces the compact (mobile) layout on or off
    #[serde(default)]
    pub mobile: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub ledger: LedgerSettings,
    pub vault: VaultSettings,
    #[serde(default)]
    pub ui: UiSettings,
    pub log_level: String,
}

impl Settings {
    /// Loads settings from defaults, an optional file and the environment.
    ///
    /// # Arguments
    /// * `config_file` - Explicit settings file; when absent `did-wizard.toml`
    ///   is used if present
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("did-wizard").required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("ledger.api_url", DEFAULT_LEDGER_API_URL)?
            .set_default("ledger.timeout_secs", 30_i64)?
            .set_default("vault.path", default_vault_path().to_string_lossy().to_string())?
            .set_default("vault.pbkdf2_iterations", i64::from(DEFAULT_PBKDF2_ITERATIONS))?
            .set_default("log_level", "info")?
            .add_source(file)
            .add_source(
                Environment::with_prefix("DID_WIZARD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.ledger.api_url)
            .map_err(|e| ConfigError::Invalid(format!("ledger.api_url: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "ledger.api_url must be http(s), got {}",
                url.scheme()
            )));
        }
        if self.ledger.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "ledger.timeout_secs must be positive".to_string(),
            ));
        }
        if self.vault.pbkdf2_iterations == 0 {
            return Err(ConfigError::Invalid(
                "vault.pbkdf2_iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// `$HOME/.did-wizard/vault.json`, or `vault.json` when there is no home.
pub fn default_vault_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".did-wizard").join("vault.json"),
        None => PathBuf::from("vault.json"),
    }
}
