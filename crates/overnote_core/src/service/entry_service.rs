//! Entry use-case service.
//!
//! # Responsibility
//! - Provide view/list/search/tags over the notebook overlay.
//! - Resolve the file an edit should open, copying read-only entries into
//!   the most local writable notebook first.
//! - Remove writable entries.
//!
//! # Invariants
//! - Every call reloads notebooks; nothing is cached across calls.
//! - Read-only entry files are never modified or deleted.
//! - New and copied entries land in `registry.writable()`.

use crate::model::entry::{Entry, EntryCopyError, EntryMap};
use crate::overlay::{self, ConsolidatedView};
use crate::registry::{NotebookRegistry, RegistryError};
use crate::repo::notebook_repo::{load_notebooks, LoadError};
use crate::search::pattern::{SearchError, SearchPattern};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for entry use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Load(LoadError),
    Registry(RegistryError),
    Search(SearchError),
    /// Consolidated lookup miss.
    EntryNotFound(String),
    /// Removal of an entry owned by a read-only notebook.
    ReadOnlyEntry(String),
    /// Name is absolute or escapes the notebook root.
    InvalidEntryName(String),
    Copy(EntryCopyError),
    Io { path: PathBuf, source: io::Error },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "{err}"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::Search(err) => write!(f, "{err}"),
            Self::EntryNotFound(name) => write!(f, "no entry found for `{name}`"),
            Self::ReadOnlyEntry(name) => write!(f, "entry `{name}` is read-only"),
            Self::InvalidEntryName(name) => write!(f, "invalid entry name: `{name}`"),
            Self::Copy(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "`{}`: {source}", path.display()),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::Registry(err) => Some(err),
            Self::Search(err) => Some(err),
            Self::Copy(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::EntryNotFound(_) | Self::ReadOnlyEntry(_) | Self::InvalidEntryName(_) => None,
        }
    }
}

impl From<LoadError> for ServiceError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<RegistryError> for ServiceError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<SearchError> for ServiceError {
    fn from(value: SearchError) -> Self {
        Self::Search(value)
    }
}

impl From<EntryCopyError> for ServiceError {
    fn from(value: EntryCopyError) -> Self {
        Self::Copy(value)
    }
}

/// One entry with its matching paragraphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub entry: Entry,
    /// Matching paragraphs; never empty.
    pub excerpt: String,
}

/// How the edit target came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOrigin {
    /// Writable entry edited in place.
    Existing,
    /// No entry existed; a new file will be created.
    New,
    /// Read-only entry duplicated from `source` before editing.
    CopiedFrom(PathBuf),
}

/// File an editor should open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub path: PathBuf,
    pub origin: EditOrigin,
}

/// Entry service facade over one registry.
pub struct EntryService {
    registry: NotebookRegistry,
}

impl EntryService {
    pub fn new(registry: NotebookRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &NotebookRegistry {
        &self.registry
    }

    /// Loads all notebooks, filtered by `tags` when any are given.
    pub fn load<S: AsRef<str>>(&self, tags: &[S]) -> ServiceResult<Vec<EntryMap>> {
        let maps = load_notebooks(self.registry.notebooks())?;
        if tags.is_empty() {
            return Ok(maps);
        }
        Ok(overlay::filter_by_tags(&maps, tags))
    }

    /// Returns the winning entry called `name`.
    pub fn view<S: AsRef<str>>(&self, name: &str, tags: &[S]) -> ServiceResult<Entry> {
        let consolidated = overlay::consolidate(&self.load(tags)?);
        consolidated
            .get(name)
            .cloned()
            .ok_or_else(|| ServiceError::EntryNotFound(name.to_string()))
    }

    /// Returns every notebook's copy of `name`, in notebook order.
    pub fn view_all<S: AsRef<str>>(&self, name: &str, tags: &[S]) -> ServiceResult<Vec<Entry>> {
        let copies = overlay::lookup_all(&self.load(tags)?, name);
        if copies.is_empty() {
            return Err(ServiceError::EntryNotFound(name.to_string()));
        }
        Ok(copies)
    }

    /// Lists every entry of every notebook sorted by name.
    ///
    /// `filter` is matched case-insensitively against entry names.
    pub fn list<S: AsRef<str>>(
        &self,
        filter: Option<&str>,
        tags: &[S],
    ) -> ServiceResult<Vec<Entry>> {
        let entries = overlay::flatten(&self.load(tags)?);
        let Some(filter) = filter else {
            return Ok(entries);
        };

        let pattern = SearchPattern::compile(filter, false)?;
        Ok(entries
            .into_iter()
            .filter(|entry| pattern.is_match(&entry.name))
            .collect())
    }

    /// Searches every notebook, in notebook order then name order.
    ///
    /// When `only_entry` is set, only entries with exactly that name are
    /// searched. Entries without a matching paragraph are skipped.
    pub fn search<S: AsRef<str>>(
        &self,
        pattern: &SearchPattern,
        only_entry: Option<&str>,
        tags: &[S],
    ) -> ServiceResult<Vec<SearchHit>> {
        let maps = self.load(tags)?;
        let mut hits = Vec::new();
        for map in &maps {
            for entry in overlay::sort(map) {
                if only_entry.is_some_and(|name| name != entry.name) {
                    continue;
                }
                let excerpt = entry.search(pattern.regex());
                if excerpt.is_empty() {
                    continue;
                }
                hits.push(SearchHit { entry, excerpt });
            }
        }

        info!(
            "event=entry_search module=service status=ok notebooks={} hits={}",
            maps.len(),
            hits.len()
        );
        Ok(hits)
    }

    /// All tags in use across every notebook.
    pub fn tags(&self) -> ServiceResult<Vec<String>> {
        let empty: [&str; 0] = [];
        Ok(overlay::tags(&self.load(&empty)?))
    }

    /// Resolves which file an edit of `name` should open.
    ///
    /// # Side effects
    /// - Creates intermediate directories for new and copied entries.
    /// - Copies read-only entries into the writable notebook.
    pub fn resolve_edit<S: AsRef<str>>(&self, name: &str, tags: &[S]) -> ServiceResult<EditTarget> {
        let consolidated = overlay::consolidate(&self.load(tags)?);
        resolve_edit_target(&self.registry, &consolidated, name)
    }

    /// Deletes the winning entry called `name`.
    ///
    /// # Errors
    /// - [`ServiceError::EntryNotFound`] when no notebook holds `name`.
    /// - [`ServiceError::ReadOnlyEntry`] when the winning copy is read-only.
    pub fn remove<S: AsRef<str>>(&self, name: &str, tags: &[S]) -> ServiceResult<Entry> {
        let entry = self.view(name, tags)?;
        if entry.read_only {
            return Err(ServiceError::ReadOnlyEntry(name.to_string()));
        }

        fs::remove_file(&entry.path).map_err(|source| ServiceError::Io {
            path: entry.path.clone(),
            source,
        })?;
        info!(
            "event=entry_remove module=service status=ok notebook={}",
            entry.notebook
        );
        Ok(entry)
    }
}

/// Copy-on-write edit resolution over an already consolidated view.
///
/// - Missing entry: new file under the writable notebook.
/// - Writable entry: its own file.
/// - Read-only entry: raw bytes copied under the writable notebook, keeping
///   the original name. When that file already exists (it lost the tag
///   filter, say) it is opened as is and never overwritten.
pub fn resolve_edit_target(
    registry: &NotebookRegistry,
    consolidated: &ConsolidatedView,
    name: &str,
) -> ServiceResult<EditTarget> {
    match consolidated.get(name) {
        Some(entry) if !entry.read_only => {
            info!("event=edit_resolve module=service status=ok origin=existing");
            Ok(EditTarget {
                path: entry.path.clone(),
                origin: EditOrigin::Existing,
            })
        }
        Some(entry) => {
            let writable = registry.writable()?;
            let dest = join_entry_path(&writable.path, &entry.name)?;
            if dest.exists() {
                info!(
                    "event=edit_resolve module=service status=ok origin=existing notebook={}",
                    writable.name
                );
                return Ok(EditTarget {
                    path: dest,
                    origin: EditOrigin::Existing,
                });
            }
            entry.copy_to(&dest)?;
            info!(
                "event=edit_resolve module=service status=ok origin=copy from_notebook={} to_notebook={}",
                entry.notebook, writable.name
            );
            Ok(EditTarget {
                path: dest,
                origin: EditOrigin::CopiedFrom(entry.path.clone()),
            })
        }
        None => {
            let writable = registry.writable()?;
            let dest = join_entry_path(&writable.path, name)?;
            create_parent_dirs(&dest)?;
            info!(
                "event=edit_resolve module=service status=ok origin=new notebook={}",
                writable.name
            );
            Ok(EditTarget {
                path: dest,
                origin: EditOrigin::New,
            })
        }
    }
}

fn join_entry_path(root: &Path, name: &str) -> ServiceResult<PathBuf> {
    let relative = Path::new(name);
    let stays_inside = !name.is_empty()
        && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if !stays_inside {
        return Err(ServiceError::InvalidEntryName(name.to_string()));
    }
    Ok(root.join(relative))
}

fn create_parent_dirs(path: &Path) -> ServiceResult<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    fs::create_dir_all(parent).map_err(|source| ServiceError::Io {
        path: parent.to_path_buf(),
        source,
    })
}
