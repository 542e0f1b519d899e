// src/blockchain/mod.rs
//! Ledger interactions.

pub mod ledger_client;
