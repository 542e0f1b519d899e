// src/wallet/vault.rs
//! Password-encrypted vault file.
//!
//! The vault is a single JSON envelope on disk:
//!
//! ```text
//! { "version": 1, "salt": "<b64>", "nonce": "<b64>", "ciphertext": "<b64>" }
//! ```
//!
//! The ciphertext is the serialized [`DidStorage`], encrypted with AES-256-GCM
//! under a key derived from the vault password with PBKDF2. Every write uses a
//! fresh salt and nonce. The new envelope goes to a temporary sibling file that
//! is synced to disk before it is renamed over the vault, so a crash mid-write
//! leaves the previous vault intact.
//!
//! All operations here are blocking (file I/O plus key derivation); async
//! callers go through [`crate::services::vault_service::LocalVaultService`].

use crate::error::VaultError;
use crate::utils::crypto::{self, NONCE_LEN, SALT_LEN};
use crate::utils::serialization::{deserialize, serialize};
use crate::wallet::did_storage::{DidStorage, VaultDidRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const VAULT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct VaultEnvelope {
    version: u32,
    salt: String,
    nonce: String,
    ciphertext: String,
}

/// Handle to a vault file. Holds no secrets between calls.
#[derive(Debug, Clone)]
pub struct Vault {
    path: PathBuf,
    iterations: NonZeroU32,
}

impl Vault {
    /// Creates a handle for the vault at `path`.
    ///
    /// # Arguments
    /// * `path` - Location of the vault file (need not exist yet)
    /// * `iterations` - PBKDF2 iteration count; zero is raised to one
    pub fn new(path: impl Into<PathBuf>, iterations: u32) -> Self {
        Self {
            path: path.into(),
            iterations: NonZeroU32::new(iterations).unwrap_or(NonZeroU32::MIN),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Creates an empty vault protected by `password`.
    ///
    /// # Errors
    /// [`VaultError::AlreadyExists`] if a vault file is already present.
    pub fn create(&self, password: &str) -> Result<(), VaultError> {
        if self.exists() {
            return Err(VaultError::AlreadyExists);
        }
        self.write(&DidStorage::new(), password)?;
        log::info!("Created vault at {}", self.path.display());
        Ok(())
    }

    /// Decrypts the vault.
    ///
    /// # Errors
    /// - [`VaultError::NotFound`] if there is no vault file
    /// - [`VaultError::InvalidPassword`] if the password does not open it
    /// - [`VaultError::Corrupted`] if the envelope cannot be decoded
    pub fn unlock(&self, password: &str) -> Result<DidStorage, VaultError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VaultError::NotFound)
            }
            Err(e) => return Err(e.into()),
        };

        let envelope: VaultEnvelope =
            deserialize(&raw).map_err(|e| VaultError::Corrupted(e.to_string()))?;
        if envelope.version != VAULT_VERSION {
            return Err(VaultError::Corrupted(format!(
                "unsupported version {}",
                envelope.version
            )));
        }

        let salt = decode_field(&envelope.salt, "salt")?;
        let nonce: [u8; NONCE_LEN] = decode_field(&envelope.nonce, "nonce")?
            .try_into()
            .map_err(|_| VaultError::Corrupted("nonce has wrong length".to_string()))?;
        let ciphertext = decode_field(&envelope.ciphertext, "ciphertext")?;

        let key = crypto::derive_key(password.as_bytes(), &salt, self.iterations);
        let plaintext = crypto::open(&key, nonce, &ciphertext)?;
        let json = std::str::from_utf8(&plaintext)
            .map_err(|e| VaultError::Corrupted(e.to_string()))?;
        Ok(deserialize(json)?)
    }

    /// Adds (or replaces) the record for `did_id` and re-encrypts the vault.
    pub fn save_did(
        &self,
        password: &str,
        did_id: &str,
        record: VaultDidRecord,
    ) -> Result<(), VaultError> {
        let mut storage = self.unlock(password)?;
        storage.store_did(did_id.to_string(), record);
        self.write(&storage, password)?;
        log::debug!("Vault now holds {} DID(s)", storage.count_dids());
        Ok(())
    }

    fn write(&self, storage: &DidStorage, password: &str) -> Result<(), VaultError> {
        let salt = crypto::random_bytes::<SALT_LEN>();
        let nonce = crypto::random_bytes::<NONCE_LEN>();
        let key = crypto::derive_key(password.as_bytes(), &salt, self.iterations);

        let plaintext = zeroize::Zeroizing::new(serialize(storage)?);
        let ciphertext = crypto::seal(&key, nonce, plaintext.as_bytes())?;

        let envelope = VaultEnvelope {
            version: VAULT_VERSION,
            salt: base64::encode(salt),
            nonce: base64::encode(nonce),
            ciphertext: base64::encode(ciphertext),
        };

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Dropped (and removed) on any error before the rename.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(serialize(&envelope)?.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| VaultError::Io(e.error))?;
        Ok(())
    }
}

fn decode_field(value: &str, field: &str) -> Result<Vec<u8>, VaultError> {
    base64::decode(value).map_err(|e| VaultError::Corrupted(format!("{}: {}", field, e)))
}
