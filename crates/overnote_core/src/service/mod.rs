//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate loading, overlay resolution and write-target selection
//!   into command-level APIs.
//! - Keep the CLI decoupled from walker and registry details.

pub mod entry_service;
