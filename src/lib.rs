// src/lib.rs

//! # DID creation wizard
//!
//! Summary step of a wizard that creates a Decentralized Identifier (DID),
//! records it on a ledger and keeps its keys in a local encrypted vault.
//!
//! ## Architecture Overview
//! 1. **Components**: `SummaryComponent`, the screen logic
//! 2. **Services**: identity context, vault facade, workflow navigation
//! 3. **Blockchain Layer**: `LedgerClient` for the ledger recording API
//! 4. **Wallet Layer**: the password-encrypted vault file
//! 5. **Store**: application state shared by the wizard steps
//! 6. **UI seams**: dialogs, notifications, busy indicator, device detection

pub mod blockchain;  // Ledger recording API
pub mod components;  // Wizard screens
pub mod config;      // Runtime settings
pub mod error;       // Error taxonomy
pub mod models;      // Data structures
pub mod services;    // Business logic
pub mod store;       // Application state
pub mod ui;          // Feedback seams and terminal implementations
pub mod utils;       // Helper functions
pub mod wallet;      // Encrypted vault
