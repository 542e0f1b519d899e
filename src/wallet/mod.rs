// src/wallet/mod.rs
//! Local encrypted key storage.

pub mod did_storage;
pub mod vault;
