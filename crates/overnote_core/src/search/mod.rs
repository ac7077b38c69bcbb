//! Full-text search over loaded entries.
//!
//! # Responsibility
//! - Compile user phrases into regex patterns.
//! - Reduce an entry body to its matching paragraphs.

pub mod pattern;
