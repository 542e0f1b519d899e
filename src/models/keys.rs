// src/models/keys.rs
//! Key material collected by the earlier steps of the create-DID wizard.
//!
//! Management keys authorize updates to the DID document itself, while DID keys
//! are published for use by the DID subject (signing, authentication). Both are
//! owned by the application state store; the summary step only reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Signature suite of a key, serialized with the names used on the ledger.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    #[serde(rename = "Ed25519VerificationKey")]
    Ed25519,
    #[serde(rename = "ECDSASecp256k1VerificationKey")]
    EcdsaSecp256k1,
    #[serde(rename = "RSAVerificationKey")]
    Rsa,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyType::Ed25519 => "Ed25519VerificationKey",
            KeyType::EcdsaSecp256k1 => "ECDSASecp256k1VerificationKey",
            KeyType::Rsa => "RSAVerificationKey",
        };
        f.write_str(name)
    }
}

/// What a DID key may be used for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DidKeyPurpose {
    PublicKey,
    Authentication,
}

/// A management key added in the "management keys" step.
///
/// # Fields
/// - `alias`: Fragment used to build the key id (`<did>#<alias>`)
/// - `key_type`: Signature suite of the key pair
/// - `controller`: DID that controls this key
/// - `public_key`: Base58-encoded public key
/// - `private_key`: Base58-encoded private key, only ever persisted inside the vault
/// - `priority`: Lower value means higher authority (0 is the root key)
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManagementKey {
    pub alias: String,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub controller: String,
    pub public_key: String,
    pub private_key: String,
    pub priority: u32,
}

/// A DID key added in the "DID keys" step.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DidKey {
    pub alias: String,
    pub purpose: Vec<DidKeyPurpose>,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub controller: String,
    pub public_key: String,
    pub private_key: String,
    /// Management key priority required to revoke this key, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_requirement: Option<u32>,
}

const REDACTED: &str = "<redacted>";

// Debug output ends up in logs; private keys never do.
impl fmt::Debug for ManagementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementKey")
            .field("alias", &self.alias)
            .field("key_type", &self.key_type)
            .field("controller", &self.controller)
            .field("public_key", &self.public_key)
            .field("private_key", &REDACTED)
            .field("priority", &self.priority)
            .finish()
    }
}

impl fmt::Debug for DidKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DidKey")
            .field("alias", &self.alias)
            .field("purpose", &self.purpose)
            .field("key_type", &self.key_type)
            .field("controller", &self.controller)
            .field("public_key", &self.public_key)
            .field("private_key", &REDACTED)
            .field("priority_requirement", &self.priority_requirement)
            .finish()
    }
}

/// A service endpoint added in the "services" step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub alias: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_requirement: Option<u32>,
}
