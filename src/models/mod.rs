// src/models/mod.rs
//! Data structures shared across the wizard.

pub mod did;
pub mod keys;
