//! Notebook overlay and resolution engine for overnote.
//! This crate owns loading, overlay precedence and write-target rules.

pub mod config;
pub mod logging;
pub mod model;
pub mod overlay;
pub mod parse;
pub mod registry;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{Config, ConfigError, ConfigResult, LoadOptions};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{Entry, EntryCopyError, EntryMap};
pub use model::notebook::{Notebook, NotebookValidationError};
pub use overlay::{consolidate, filter_by_tags, flatten, lookup_all, sort, tags, ConsolidatedView};
pub use parse::front_matter::{parse_entry, EntryHeader, ParseError, ParsedEntry};
pub use registry::{filter_by_name, writable, NotebookRegistry, RegistryError, RegistryResult};
pub use repo::notebook_repo::{load_notebook, load_notebooks, LoadError, LoadResult};
pub use search::pattern::{matching_paragraphs, SearchError, SearchPattern, SearchResult};
pub use service::entry_service::{
    resolve_edit_target, EditOrigin, EditTarget, EntryService, SearchHit, ServiceError,
    ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
