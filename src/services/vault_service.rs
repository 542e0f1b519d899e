// src/services/vault_service.rs
//! Async facade over the encrypted vault.

use crate::error::VaultError;
use crate::models::did::DIDDocument;
use crate::models::keys::{DidKey, ManagementKey};
use crate::wallet::did_storage::VaultDidRecord;
use crate::wallet::vault::Vault;
use async_trait::async_trait;
use chrono::Utc;
use tokio::task;
use zeroize::Zeroizing;

/// Vault operations used by the summary step.
#[async_trait]
pub trait VaultService: Send + Sync {
    /// Checks that `password` opens the existing vault.
    async fn can_decrypt_vault(&self, password: &str) -> Result<(), VaultError>;

    /// Stores a freshly recorded DID together with its keys.
    async fn save_did_to_vault(
        &self,
        did_id: &str,
        document: &DIDDocument,
        management_keys: &[ManagementKey],
        did_keys: &[DidKey],
        password: &str,
    ) -> Result<(), VaultError>;
}

/// [`VaultService`] over a vault file on the local disk.
///
/// Key derivation and file I/O run on the blocking thread pool so the caller's
/// runtime is never stalled.
#[derive(Clone)]
pub struct LocalVaultService {
    vault: Vault,
}

impl LocalVaultService {
    pub fn new(vault: Vault) -> Self {
        Self { vault }
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Creates an empty vault protected by `password`.
    pub async fn create_vault(&self, password: &str) -> Result<(), VaultError> {
        let vault = self.vault.clone();
        let password = Zeroizing::new(password.to_string());
        run_blocking(move || vault.create(&password)).await
    }
}

#[async_trait]
impl VaultService for LocalVaultService {
    async fn can_decrypt_vault(&self, password: &str) -> Result<(), VaultError> {
        let vault = self.vault.clone();
        let password = Zeroizing::new(password.to_string());
        run_blocking(move || vault.unlock(&password).map(|_| ())).await
    }

    async fn save_did_to_vault(
        &self,
        did_id: &str,
        document: &DIDDocument,
        management_keys: &[ManagementKey],
        did_keys: &[DidKey],
        password: &str,
    ) -> Result<(), VaultError> {
        let vault = self.vault.clone();
        let password = Zeroizing::new(password.to_string());
        let did_id = did_id.to_string();
        let record = VaultDidRecord {
            document: document.clone(),
            management_keys: management_keys.to_vec(),
            did_keys: did_keys.to_vec(),
            created_at: Utc::now(),
        };
        run_blocking(move || vault.save_did(&password, &did_id, record)).await
    }
}

async fn run_blocking<F>(f: F) -> Result<(), VaultError>
where
    F: FnOnce() -> Result<(), VaultError> + Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| VaultError::Task(e.to_string()))?
}
