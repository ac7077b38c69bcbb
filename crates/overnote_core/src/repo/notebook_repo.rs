//! Notebook walker.
//!
//! # Responsibility
//! - Recursively enumerate files under one notebook root.
//! - Skip version-control metadata directories without descending into them.
//! - Build one [`EntryMap`] per notebook, in registry order.
//!
//! # Invariants
//! - Directories are never registered as entries.
//! - Entry names are root-relative paths without a leading separator.
//! - A missing or non-directory root is an error, not an empty map.

use crate::model::entry::{Entry, EntryMap};
use crate::model::notebook::Notebook;
use crate::parse::front_matter::ParseError;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::{DirEntry, WalkDir};

/// Directory name whose subtree is never walked.
const VCS_DIR_NAME: &str = ".git";

pub type LoadResult<T> = Result<T, LoadError>;

/// Failure while loading a notebook.
#[derive(Debug)]
pub enum LoadError {
    /// Root is missing, not a directory, or a subtree could not be listed.
    UnwalkableNotebook {
        notebook: String,
        path: PathBuf,
        source: io::Error,
    },
    /// One entry file could not be read as UTF-8 text.
    UnreadableFile {
        notebook: String,
        name: String,
        path: PathBuf,
        source: io::Error,
    },
    /// One entry file has a malformed front-matter header.
    MalformedEntry {
        notebook: String,
        name: String,
        path: PathBuf,
        source: ParseError,
    },
}

impl LoadError {
    /// Name of the notebook whose walk failed.
    pub fn notebook(&self) -> &str {
        match self {
            Self::UnwalkableNotebook { notebook, .. }
            | Self::UnreadableFile { notebook, .. }
            | Self::MalformedEntry { notebook, .. } => notebook,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::UnwalkableNotebook { .. } => "unwalkable_notebook",
            Self::UnreadableFile { .. } => "unreadable_file",
            Self::MalformedEntry { .. } => "malformed_header",
        }
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnwalkableNotebook {
                notebook,
                path,
                source,
            } => write!(
                f,
                "failed to walk notebook `{notebook}` at `{}`: {source}",
                path.display()
            ),
            Self::UnreadableFile {
                notebook,
                name,
                path,
                source,
            } => write!(
                f,
                "failed to load entry `{name}` from notebook `{notebook}` (path: `{}`): {source}",
                path.display()
            ),
            Self::MalformedEntry {
                notebook,
                name,
                path,
                source,
            } => write!(
                f,
                "failed to load entry `{name}` from notebook `{notebook}` (path: `{}`): {source}",
                path.display()
            ),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnwalkableNotebook { source, .. } => Some(source),
            Self::UnreadableFile { source, .. } => Some(source),
            Self::MalformedEntry { source, .. } => Some(source),
        }
    }
}

/// Loads every notebook in order, one map per notebook.
///
/// # Errors
/// - Returns the first [`LoadError`] encountered; later notebooks are not
///   walked.
pub fn load_notebooks(notebooks: &[Notebook]) -> LoadResult<Vec<EntryMap>> {
    notebooks.iter().map(load_notebook).collect()
}

/// Loads one notebook into a map from entry name to entry.
///
/// # Side effects
/// - Reads every non-skipped file under the notebook root.
/// - Emits `notebook_load` logging events with duration and entry count.
pub fn load_notebook(notebook: &Notebook) -> LoadResult<EntryMap> {
    let started_at = Instant::now();
    info!(
        "event=notebook_load module=repo status=start notebook={}",
        notebook.name
    );

    match walk_notebook(notebook) {
        Ok(entries) => {
            info!(
                "event=notebook_load module=repo status=ok notebook={} entries={} duration_ms={}",
                notebook.name,
                entries.len(),
                started_at.elapsed().as_millis()
            );
            Ok(entries)
        }
        Err(err) => {
            error!(
                "event=notebook_load module=repo status=error notebook={} duration_ms={} error_code={} error={}",
                notebook.name,
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
            Err(err)
        }
    }
}

fn walk_notebook(notebook: &Notebook) -> LoadResult<EntryMap> {
    let root = notebook.root();
    ensure_walkable_root(notebook)?;

    let mut entries = EntryMap::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|item| !is_vcs_dir(item));

    for item in walker {
        let item = item.map_err(|err| LoadError::UnwalkableNotebook {
            notebook: notebook.name.clone(),
            path: err.path().unwrap_or(root).to_path_buf(),
            source: err.into(),
        })?;
        if item.file_type().is_dir() {
            continue;
        }

        let path = item.path();
        let name = entry_name(root, path);
        let raw = read_entry_text(path).map_err(|source| LoadError::UnreadableFile {
            notebook: notebook.name.clone(),
            name: name.clone(),
            path: path.to_path_buf(),
            source,
        })?;
        let entry = Entry::from_raw(name.clone(), notebook, path, &raw).map_err(|source| {
            LoadError::MalformedEntry {
                notebook: notebook.name.clone(),
                name: name.clone(),
                path: path.to_path_buf(),
                source,
            }
        })?;

        entries.insert(name, entry);
    }

    Ok(entries)
}

fn ensure_walkable_root(notebook: &Notebook) -> LoadResult<()> {
    let unwalkable = |source: io::Error| LoadError::UnwalkableNotebook {
        notebook: notebook.name.clone(),
        path: notebook.path.clone(),
        source,
    };

    let metadata = fs::metadata(notebook.root()).map_err(unwalkable)?;
    if !metadata.is_dir() {
        return Err(unwalkable(io::Error::other("notebook root is not a directory")));
    }
    Ok(())
}

fn is_vcs_dir(item: &DirEntry) -> bool {
    item.depth() > 0 && item.file_type().is_dir() && item.file_name() == VCS_DIR_NAME
}

/// Root-relative name of `path`, using the platform separator.
fn entry_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

fn read_entry_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
