//! Value types shared by every overlay component.
//!
//! # Responsibility
//! - Define the notebook descriptor consumed by the walker and registry.
//! - Define the loaded entry record handed back to callers.
//!
//! # Invariants
//! - Both types are plain values; no entry holds a handle to its notebook.
//! - An entry's `notebook` field is a back-reference by name only.

pub mod entry;
pub mod notebook;
