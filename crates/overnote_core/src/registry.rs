//! Ordered notebook registry and write-target selection.
//!
//! # Responsibility
//! - Hold the precedence-ordered notebook list that drives loading.
//! - Pick the notebook receiving new or copy-on-write entries.
//! - Scope operations to one named notebook.
//!
//! # Invariants
//! - Order is "most global first, most local last".
//! - Names and root paths are unique within a registry.
//! - Write-target selection scans in reverse, so the most local writable
//!   notebook wins.

use crate::model::notebook::{Notebook, NotebookValidationError};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Registry was built from an empty list.
    Empty,
    InvalidNotebook(NotebookValidationError),
    DuplicateName(String),
    DuplicatePath(PathBuf),
    /// Name filter matched nothing.
    NotebookNotFound(String),
    /// Every notebook is read-only.
    NoWritableNotebook,
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "no notebooks configured"),
            Self::InvalidNotebook(err) => write!(f, "{err}"),
            Self::DuplicateName(name) => write!(f, "notebook name is not unique: {name}"),
            Self::DuplicatePath(path) => {
                write!(f, "notebook path is not unique: {}", path.display())
            }
            Self::NotebookNotFound(name) => write!(f, "notebook does not exist: {name}"),
            Self::NoWritableNotebook => write!(f, "no writable notebook found"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidNotebook(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NotebookValidationError> for RegistryError {
    fn from(value: NotebookValidationError) -> Self {
        Self::InvalidNotebook(value)
    }
}

/// Validated, ordered notebook list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookRegistry {
    notebooks: Vec<Notebook>,
}

impl NotebookRegistry {
    /// Builds a registry after validating every descriptor.
    ///
    /// # Errors
    /// - [`RegistryError::Empty`] for an empty list.
    /// - [`RegistryError::InvalidNotebook`] for a blank name or path.
    /// - [`RegistryError::DuplicateName`] / [`RegistryError::DuplicatePath`].
    pub fn new(notebooks: Vec<Notebook>) -> RegistryResult<Self> {
        if notebooks.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut names = BTreeSet::new();
        let mut paths = BTreeSet::new();
        for notebook in &notebooks {
            notebook.validate()?;
            if !names.insert(notebook.name.as_str()) {
                return Err(RegistryError::DuplicateName(notebook.name.clone()));
            }
            if !paths.insert(notebook.path.as_path()) {
                return Err(RegistryError::DuplicatePath(notebook.path.clone()));
            }
        }

        Ok(Self { notebooks })
    }

    pub fn notebooks(&self) -> &[Notebook] {
        &self.notebooks
    }

    pub fn len(&self) -> usize {
        self.notebooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notebooks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notebook> {
        self.notebooks.iter()
    }

    /// Most local writable notebook.
    pub fn writable(&self) -> RegistryResult<&Notebook> {
        writable(&self.notebooks)
    }

    /// Registry scoped to the single notebook called `name`.
    pub fn scoped_to(&self, name: &str) -> RegistryResult<Self> {
        Ok(Self {
            notebooks: filter_by_name(&self.notebooks, name)?,
        })
    }
}

impl<'a> IntoIterator for &'a NotebookRegistry {
    type Item = &'a Notebook;
    type IntoIter = std::slice::Iter<'a, Notebook>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Returns the last notebook in `notebooks` that is not read-only.
///
/// # Errors
/// - [`RegistryError::NoWritableNotebook`] when every notebook is read-only
///   or the list is empty.
pub fn writable(notebooks: &[Notebook]) -> RegistryResult<&Notebook> {
    notebooks
        .iter()
        .rev()
        .find(|notebook| !notebook.read_only)
        .ok_or(RegistryError::NoWritableNotebook)
}

/// Returns a one-element list holding the notebook called `name`.
///
/// # Errors
/// - [`RegistryError::NotebookNotFound`] when no notebook has that name.
pub fn filter_by_name(notebooks: &[Notebook], name: &str) -> RegistryResult<Vec<Notebook>> {
    notebooks
        .iter()
        .find(|notebook| notebook.name == name)
        .map(|notebook| vec![notebook.clone()])
        .ok_or_else(|| RegistryError::NotebookNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{filter_by_name, writable, NotebookRegistry, RegistryError};
    use crate::model::notebook::Notebook;

    fn notebooks(flags: &[(&str, bool)]) -> Vec<Notebook> {
        flags
            .iter()
            .map(|(name, read_only)| Notebook::new(*name, format!("/notes/{name}"), *read_only))
            .collect()
    }

    #[test]
    fn writable_prefers_most_local() {
        let list = notebooks(&[("a", true), ("b", false), ("c", true)]);
        assert_eq!(writable(&list).unwrap().name, "b");

        let list = notebooks(&[("a", false), ("b", false)]);
        assert_eq!(writable(&list).unwrap().name, "b");
    }

    #[test]
    fn writable_fails_when_all_read_only() {
        let list = notebooks(&[("a", true), ("b", true), ("c", true)]);
        assert_eq!(writable(&list).unwrap_err(), RegistryError::NoWritableNotebook);
        assert_eq!(writable(&[]).unwrap_err(), RegistryError::NoWritableNotebook);
    }

    #[test]
    fn filter_by_name_returns_single_match() {
        let list = notebooks(&[("foo", false), ("bar", false), ("baz", false)]);
        let filtered = filter_by_name(&list, "bar").unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "bar");
    }

    #[test]
    fn filter_by_name_reports_missing() {
        let list = notebooks(&[("foo", false)]);
        assert_eq!(
            filter_by_name(&list, "qux").unwrap_err(),
            RegistryError::NotebookNotFound("qux".to_string())
        );
    }

    #[test]
    fn registry_rejects_duplicates_and_empty() {
        assert_eq!(NotebookRegistry::new(Vec::new()).unwrap_err(), RegistryError::Empty);

        let mut list = notebooks(&[("a", false)]);
        list.push(Notebook::new("a", "/elsewhere", false));
        assert!(matches!(
            NotebookRegistry::new(list).unwrap_err(),
            RegistryError::DuplicateName(_)
        ));

        let mut list = notebooks(&[("a", false)]);
        list.push(Notebook::new("b", "/notes/a", false));
        assert!(matches!(
            NotebookRegistry::new(list).unwrap_err(),
            RegistryError::DuplicatePath(_)
        ));
    }

    #[test]
    fn scoped_registry_keeps_one_notebook() {
        let registry = NotebookRegistry::new(notebooks(&[("a", true), ("b", false)])).unwrap();
        let scoped = registry.scoped_to("a").unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(
            scoped.writable().unwrap_err(),
            RegistryError::NoWritableNotebook
        );
    }
}
