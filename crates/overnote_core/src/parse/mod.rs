//! Raw entry file parsing.
//!
//! # Responsibility
//! - Split raw file content into a front-matter header and a body.
//! - Keep the delimiter contract in one place.

pub mod front_matter;
