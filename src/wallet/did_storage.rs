// src/wallet/did_storage.rs
//! Decrypted contents of the vault.
//!
//! Holds one record per DID created through the wizard: the document recorded on
//! the ledger plus the full key material (private keys included) needed to
//! manage it later. This structure only ever exists in memory; on disk it is
//! always encrypted by [`crate::wallet::vault::Vault`].

use crate::models::did::DIDDocument;
use crate::models::keys::{DidKey, ManagementKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the vault keeps for a single DID.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaultDidRecord {
    pub document: DIDDocument,
    pub management_keys: Vec<ManagementKey>,
    pub did_keys: Vec<DidKey>,
    pub created_at: DateTime<Utc>,
}

/// In-memory view of the decrypted vault, keyed by DID.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DidStorage {
    dids: BTreeMap<String, VaultDidRecord>,
}

impl DidStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the record for `did_id`.
    ///
    /// # Behavior
    /// - Overwrites an existing record with the same DID
    pub fn store_did(&mut self, did_id: String, record: VaultDidRecord) {
        self.dids.insert(did_id, record);
    }

    /// Retrieves the record for `did_id`, if any.
    pub fn get_did(&self, did_id: &str) -> Option<&VaultDidRecord> {
        self.dids.get(did_id)
    }

    pub fn count_dids(&self) -> usize {
        self.dids.len()
    }

}
