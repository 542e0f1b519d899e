// src/models/did.rs
//! DID document entry data model.
//!
//! Defines the create-entry payload that is recorded on the ledger, following the
//! layout of the Factom DID method (`didMethodVersion`, `managementKey`, `didKey`,
//! `service`). Private key material never appears in this document.

use crate::models::keys::{DidKey, DidKeyPurpose, KeyType, ManagementKey, Service};
use serde::{Deserialize, Serialize};
use std::fmt;

/// DID method version written into every generated entry.
pub const DID_METHOD_VERSION: &str = "0.2.0";

/// Kind of ledger entry the identity context can generate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    #[serde(rename = "CreateDIDEntry")]
    CreateDIDEntry,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::CreateDIDEntry => f.write_str("CreateDIDEntry"),
        }
    }
}

/// Management key as published in the DID document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentManagementKey {
    pub id: String,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub controller: String,
    pub public_key_base58: String,
    pub priority: u32,
}

/// DID key as published in the DID document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDidKey {
    pub id: String,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub controller: String,
    pub public_key_base58: String,
    pub purpose: Vec<DidKeyPurpose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_requirement: Option<u32>,
}

/// Service endpoint as published in the DID document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentService {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub service_endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_requirement: Option<u32>,
}

/// A DID Document draft, submitted to the ledger as a `CreateDIDEntry`.
///
/// # Fields
/// - `did_method_version`: Version of the DID method the entry conforms to
/// - `management_key`: Keys authorized to update or deactivate the DID
/// - `did_key`: Keys published for the DID subject
/// - `service`: Optional service endpoints
///
/// # Key ids
/// Every key and service id is the DID followed by `#` and the alias chosen in
/// the wizard, e.g. `did:factom:5d0dd58757119d3f024e0f4cb2b1d8ab3c1a1a...#management-0`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DIDDocument {
    pub did_method_version: String,
    pub management_key: Vec<DocumentManagementKey>,
    pub did_key: Vec<DocumentDidKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<DocumentService>,
}

impl DIDDocument {
    /// Builds a create-entry document for `did_id` from the wizard's key material.
    ///
    /// # Arguments
    /// * `did_id` - The DID the keys belong to
    /// * `management_keys` - Keys from the management keys step
    /// * `did_keys` - Keys from the DID keys step
    /// * `services` - Services from the services step
    pub fn from_keys(
        did_id: &str,
        management_keys: &[ManagementKey],
        did_keys: &[DidKey],
        services: &[Service],
    ) -> Self {
        let management_key = management_keys
            .iter()
            .map(|k| DocumentManagementKey {
                id: key_id(did_id, &k.alias),
                key_type: k.key_type,
                controller: k.controller.clone(),
                public_key_base58: k.public_key.clone(),
                priority: k.priority,
            })
            .collect();

        let did_key = did_keys
            .iter()
            .map(|k| DocumentDidKey {
                id: key_id(did_id, &k.alias),
                key_type: k.key_type,
                controller: k.controller.clone(),
                public_key_base58: k.public_key.clone(),
                purpose: k.purpose.clone(),
                priority_requirement: k.priority_requirement,
            })
            .collect();

        let service = services
            .iter()
            .map(|s| DocumentService {
                id: key_id(did_id, &s.alias),
                service_type: s.service_type.clone(),
                service_endpoint: s.endpoint.clone(),
                priority_requirement: s.priority_requirement,
            })
            .collect();

        DIDDocument {
            did_method_version: DID_METHOD_VERSION.to_string(),
            management_key,
            did_key,
            service,
        }
    }

    /// Returns true if the document publishes exactly the public keys of the given
    /// key lists, in order.
    pub fn carries_keys(&self, management_keys: &[ManagementKey], did_keys: &[DidKey]) -> bool {
        self.management_key.len() == management_keys.len()
            && self.did_key.len() == did_keys.len()
            && self
                .management_key
                .iter()
                .zip(management_keys)
                .all(|(doc, key)| doc.public_key_base58 == key.public_key)
            && self
                .did_key
                .iter()
                .zip(did_keys)
                .all(|(doc, key)| doc.public_key_base58 == key.public_key)
    }
}

fn key_id(did_id: &str, alias: &str) -> String {
    format!("{}#{}", did_id, alias)
}
