//! Notebook descriptor.
//!
//! # Responsibility
//! - Describe one ordered, named, root-pathed directory tree of entries.
//! - Validate descriptor-level fields before the registry accepts it.
//!
//! # Invariants
//! - `name` and `path` are non-empty after validation.
//! - Descriptors are immutable once handed to a registry.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// One configured notebook.
///
/// Field names match the on-disk configuration keys, so the same type is
/// deserialized straight out of the YAML config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notebook {
    /// Unique identifier within a registry.
    pub name: String,
    /// Absolute root directory (`~` and symlinks resolved by config loading).
    pub path: PathBuf,
    /// Read-only notebooks never receive new or copied entries.
    #[serde(default, rename = "readonly")]
    pub read_only: bool,
    /// Tags applied to every entry loaded from this notebook.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Notebook {
    /// Creates a descriptor with no default tags.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, read_only: bool) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            read_only,
            tags: Vec::new(),
        }
    }

    /// Builder-style helper for default tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn root(&self) -> &Path {
        self.path.as_path()
    }

    /// Validates descriptor-level invariants.
    pub fn validate(&self) -> Result<(), NotebookValidationError> {
        if self.name.trim().is_empty() {
            return Err(NotebookValidationError::EmptyName);
        }
        if self.path.as_os_str().is_empty() {
            return Err(NotebookValidationError::EmptyPath(self.name.clone()));
        }
        Ok(())
    }
}

/// Descriptor validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotebookValidationError {
    EmptyName,
    EmptyPath(String),
}

impl Display for NotebookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "invalid notebook: name must be specified"),
            Self::EmptyPath(name) => {
                write!(f, "invalid notebook `{name}`: path must be specified")
            }
        }
    }
}

impl Error for NotebookValidationError {}

#[cfg(test)]
mod tests {
    use super::{Notebook, NotebookValidationError};

    #[test]
    fn validates_complete_descriptor() {
        let notebook = Notebook::new("personal", "/notes/personal", false);
        assert!(notebook.validate().is_ok());
    }

    #[test]
    fn rejects_blank_name() {
        let notebook = Notebook::new("  ", "/notes/personal", false);
        assert_eq!(
            notebook.validate().unwrap_err(),
            NotebookValidationError::EmptyName
        );
    }

    #[test]
    fn rejects_missing_path() {
        let notebook = Notebook::new("personal", "", false);
        assert_eq!(
            notebook.validate().unwrap_err(),
            NotebookValidationError::EmptyPath("personal".to_string())
        );
    }

    #[test]
    fn deserializes_config_keys() {
        let yaml = "name: community\npath: /notes/community\nreadonly: true\ntags: [c]\n";
        let notebook: Notebook = serde_yaml::from_str(yaml).unwrap();
        assert!(notebook.read_only);
        assert_eq!(notebook.tags, vec!["c".to_string()]);
    }

    #[test]
    fn read_only_and_tags_default_when_omitted() {
        let notebook: Notebook = serde_yaml::from_str("name: a\npath: /a\n").unwrap();
        assert!(!notebook.read_only);
        assert!(notebook.tags.is_empty());
    }
}
