// src/services/did_service.rs
//! Identity context of the create-DID wizard.
//!
//! Owns the identifier of the DID being created, turns the key material held in
//! the [`Store`] into ledger entries, and submits them through the
//! [`LedgerClient`].

use crate::blockchain::ledger_client::{EntryReceipt, LedgerClient};
use crate::error::LedgerError;
use crate::models::did::{DIDDocument, EntryType};
use crate::store::{Action, Store};
use crate::utils::crypto::{hash_data, random_bytes};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// Method prefix of every identifier the wizard creates.
pub const DID_PREFIX: &str = "did:factom:";

/// What the summary step needs from the identity context.
#[async_trait]
pub trait IdentityContext: Send + Sync {
    /// Identifier of the DID currently being created.
    fn get_id(&self) -> String;

    /// Builds a ledger entry of the given kind from the current wizard state.
    fn generate_entry(&self, kind: EntryType) -> DIDDocument;

    /// Submits a create entry to the ledger.
    async fn record_create_entry_on_chain(
        &self,
        document: &DIDDocument,
    ) -> Result<EntryReceipt, LedgerError>;

    /// Forgets everything collected for the current DID.
    fn clear_data(&self);
}

/// Generates a fresh identifier: the method prefix followed by the hex SHA-256
/// of a random 32-byte nonce.
pub fn generate_did_id() -> String {
    let nonce = random_bytes::<32>();
    format!("{}{}", DID_PREFIX, hex::encode(hash_data(&nonce)))
}

/// [`IdentityContext`] backed by the application store and the ledger API.
pub struct DidService {
    store: Store,
    ledger: LedgerClient,
    id: Mutex<String>,
}

impl DidService {
    /// Creates the service with a freshly generated DID.
    pub fn new(store: Store, ledger: LedgerClient) -> Self {
        Self {
            store,
            ledger,
            id: Mutex::new(generate_did_id()),
        }
    }
}

#[async_trait]
impl IdentityContext for DidService {
    fn get_id(&self) -> String {
        self.id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn generate_entry(&self, kind: EntryType) -> DIDDocument {
        let state = self.store.snapshot();
        let draft = &state.create_did;
        match kind {
            EntryType::CreateDIDEntry => DIDDocument::from_keys(
                &self.get_id(),
                &draft.management_keys,
                &draft.did_keys,
                &draft.services,
            ),
        }
    }

    async fn record_create_entry_on_chain(
        &self,
        document: &DIDDocument,
    ) -> Result<EntryReceipt, LedgerError> {
        self.ledger
            .record_entry(EntryType::CreateDIDEntry, document)
            .await
    }

    fn clear_data(&self) {
        self.store.dispatch(Action::ClearCreateDid);
        *self.id.lock().unwrap_or_else(PoisonError::into_inner) = generate_did_id();
    }
}
