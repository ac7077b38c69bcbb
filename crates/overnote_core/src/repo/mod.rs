//! Filesystem-backed notebook loading.
//!
//! # Responsibility
//! - Walk notebook roots and turn every file into an [`Entry`].
//! - Report file-level failures with the offending notebook, name and path.
//!
//! # Invariants
//! - A failed file aborts the walk of its notebook; partial maps are dropped.
//! - Notebooks are loaded in registry order and the first error wins.
//!
//! [`Entry`]: crate::model::entry::Entry

pub mod notebook_repo;
