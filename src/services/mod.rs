// src/services/mod.rs
//! Business logic behind the wizard screens.

pub mod did_service;
pub mod vault_service;
pub mod workflow;
