// src/components/mod.rs
//! Wizard screens.

pub mod summary;
