// src/utils/crypto.rs
//! Cryptographic utilities backing the vault and DID identifiers.
//!
//! # Algorithms
//! - Hashing: SHA-256 (`ring::digest`)
//! - Key derivation: PBKDF2-HMAC-SHA256 (`ring::pbkdf2`)
//! - Encryption: AES-256-GCM (`ring::aead`)

use crate::error::VaultError;
use rand::rngs::OsRng;
use rand::RngCore;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::{digest, pbkdf2};
use std::num::NonZeroU32;
use zeroize::Zeroizing;

/// Salt length for key derivation (16 bytes)
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length (12 bytes)
pub const NONCE_LEN: usize = ring::aead::NONCE_LEN;

/// Derived key length for AES-256 (32 bytes)
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

/// Computes a SHA-256 hash of the input data.
///
/// # Returns
/// Fixed-size 32-byte array containing the hash.
pub fn hash_data(data: &[u8]) -> [u8; 32] {
    let hash = digest::digest(&digest::SHA256, data);
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_ref());
    out
}

/// Generates cryptographically secure random bytes from the OS RNG.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Derives a 256-bit encryption key from a password.
///
/// # Arguments
/// * `password` - User's vault password (UTF-8 bytes)
/// * `salt` - Random salt stored next to the ciphertext
/// * `iterations` - PBKDF2 iteration count
///
/// # Returns
/// A key buffer that is wiped when dropped.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: NonZeroU32,
) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password,
        &mut key[..],
    );
    key
}

/// Encrypts `plaintext` with AES-256-GCM, appending the authentication tag.
pub fn seal(
    key: &[u8; KEY_LEN],
    nonce: [u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, VaultError> {
    let key = aead_key(key)?;
    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(Nonce::assume_unique_for_key(nonce), Aad::empty(), &mut in_out)
        .map_err(|_| VaultError::Crypto)?;
    Ok(in_out)
}

/// Decrypts and authenticates `ciphertext`.
///
/// # Errors
/// Returns [`VaultError::InvalidPassword`] when authentication fails, which is
/// what a key derived from the wrong password produces.
pub fn open(
    key: &[u8; KEY_LEN],
    nonce: [u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, VaultError> {
    let key = aead_key(key)?;
    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext_len = key
        .open_in_place(Nonce::assume_unique_for_key(nonce), Aad::empty(), in_out.as_mut_slice())
        .map_err(|_| VaultError::InvalidPassword)?
        .len();
    in_out.truncate(plaintext_len);
    Ok(in_out)
}

fn aead_key(key: &[u8; KEY_LEN]) -> Result<LessSafeKey, VaultError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key).map_err(|_| VaultError::Crypto)?;
    Ok(LessSafeKey::new(unbound))
}
