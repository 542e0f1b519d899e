// src/error.rs
//! Error types for the wizard's collaborators.
//!
//! The `Display` text of [`VaultError`] and [`LedgerError`] is shown to the user
//! as-is by the summary step, so it is written as a user-facing message.

use thiserror::Error;

/// Generic message used when the ledger API gives no usable explanation.
pub const LEDGER_GENERIC_ERROR: &str =
    "Sorry, something went wrong on our end. Please try again later.";

/// Failures of the encrypted vault.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Vault not found. Please create a vault first.")]
    NotFound,

    #[error("A vault already exists at this location.")]
    AlreadyExists,

    #[error("Invalid vault password")]
    InvalidPassword,

    #[error("Vault file is corrupted: {0}")]
    Corrupted(String),

    #[error("Vault I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Vault serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Vault cryptography failed")]
    Crypto,

    #[error("Vault task failed: {0}")]
    Task(String),
}

/// Failures reported while recording an entry on the ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The API answered with an error; the message comes from the server.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a usable answer.
    #[error("{}", LEDGER_GENERIC_ERROR)]
    Transport(String),
}

/// Message shown when the DID reached the ledger but could not be saved locally.
pub const UNEXPECTED_SAVE_ERROR: &str = "A problem occurred! Please, try to create a new DID.";

/// Why recording a DID on-chain stopped.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The vault password was rejected; nothing was submitted.
    #[error(transparent)]
    VaultLocked(VaultError),

    /// The ledger refused the entry; the vault was not touched.
    #[error(transparent)]
    Ledger(LedgerError),

    /// The entry is on-chain but the vault write failed.
    #[error("{}", UNEXPECTED_SAVE_ERROR)]
    Persistence(VaultError),
}

/// Failures loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
