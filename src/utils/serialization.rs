// src/utils/serialization.rs
//! Serialization utilities for the DID wizard.
//!
//! Provides JSON serialization helpers for:
//! - Compact payloads sent to the ledger and written to the vault
//! - The human-readable preview shown on the summary step

use serde::{Deserialize, Serialize};

/// Serializes a value to a compact JSON string.
///
/// # Returns
/// - `Ok(String)` with JSON representation on success
/// - `Err(serde_json::Error)` if serialization fails
pub fn serialize<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(data)
}

/// Serializes a value to JSON indented with two spaces per level.
///
/// This is the preview format of the summary step.
pub fn serialize_pretty<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Deserializes a value from a JSON string.
///
/// # Note
/// The lifetime parameter lets the deserialized value borrow from the input.
pub fn deserialize<'a, T: Deserialize<'a>>(data: &'a str) -> Result<T, serde_json::Error> {
    serde_json::from_str(data)
}
