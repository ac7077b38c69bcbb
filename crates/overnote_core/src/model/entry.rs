//! Entry domain model.
//!
//! # Responsibility
//! - Hold one parsed document together with its overlay metadata.
//! - Provide the copy-on-write primitive used by edit resolution.
//!
//! # Invariants
//! - `name` is the path relative to the owning notebook root.
//! - `tags` is the notebook defaults plus front-matter tags, sorted; exact
//!   duplicates are kept.
//! - `read_only` mirrors the owning notebook at load time.

use crate::model::notebook::Notebook;
use crate::parse::front_matter::{parse_entry, ParseResult};
use crate::search::pattern::matching_paragraphs;
use regex::Regex;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Entries of one notebook keyed by entry name.
pub type EntryMap = HashMap<String, Entry>;

/// One loaded entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Relative path under the notebook root; what users type.
    pub name: String,
    /// Name of the notebook this entry was loaded from.
    pub notebook: String,
    /// Absolute file path on disk.
    pub path: PathBuf,
    /// Body text with front matter stripped.
    pub body: String,
    pub tags: Vec<String>,
    /// Display syntax hint, empty when unspecified.
    pub syntax: String,
    pub read_only: bool,
}

impl Entry {
    /// Builds an entry from raw file content loaded out of `notebook`.
    ///
    /// # Errors
    /// - Returns a parse error when the front matter is unclosed or invalid.
    pub fn from_raw(
        name: impl Into<String>,
        notebook: &Notebook,
        path: impl Into<PathBuf>,
        raw: &str,
    ) -> ParseResult<Self> {
        let parsed = parse_entry(raw)?;

        let mut tags = notebook.tags.clone();
        tags.extend(parsed.header.tags);
        tags.sort();

        Ok(Self {
            name: name.into(),
            notebook: notebook.name.clone(),
            path: path.into(),
            body: parsed.body,
            tags,
            syntax: parsed.header.syntax.unwrap_or_default(),
            read_only: notebook.read_only,
        })
    }

    /// Returns whether `tag` is one of this entry's tags.
    pub fn is_tagged_with(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    /// Returns the paragraphs of the body matching `pattern`.
    ///
    /// An empty string means no paragraph matched.
    pub fn search(&self, pattern: &Regex) -> String {
        matching_paragraphs(&self.body, pattern)
    }

    /// Copies the raw file (front matter included) to `dest`.
    ///
    /// Intermediate directories are created. Neither the source file nor an
    /// existing file at `dest` is ever modified; the copy fails instead.
    pub fn copy_to(&self, dest: &Path) -> Result<(), EntryCopyError> {
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| EntryCopyError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        // Stream bytes instead of `fs::copy` so the new file gets default
        // permissions rather than the read-only source's mode bits.
        let copy = || -> io::Result<u64> {
            let mut infile = File::open(&self.path)?;
            let mut outfile = File::options().write(true).create_new(true).open(dest)?;
            io::copy(&mut infile, &mut outfile)
        };
        copy().map_err(|source| EntryCopyError::Copy {
            from: self.path.clone(),
            to: dest.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

/// Failure while duplicating an entry file.
#[derive(Debug)]
pub enum EntryCopyError {
    CreateDir {
        path: PathBuf,
        source: io::Error,
    },
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl Display for EntryCopyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(f, "failed to create directory `{}`: {source}", path.display())
            }
            Self::Copy { from, to, source } => write!(
                f,
                "failed to copy `{}` to `{}`: {source}",
                from.display(),
                to.display()
            ),
        }
    }
}

impl Error for EntryCopyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Copy { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Entry, EntryCopyError};
    use crate::model::notebook::Notebook;
    use std::fs;

    fn community() -> Notebook {
        Notebook::new("community", "/notes/community", true).with_tags(["community"])
    }

    #[test]
    fn merges_notebook_and_header_tags_sorted() {
        let raw = "---\ntags: [zip, archive]\n---\nbody";
        let entry = Entry::from_raw("tar", &community(), "/notes/community/tar", raw)
            .expect("entry should parse");
        assert_eq!(entry.tags, vec!["archive", "community", "zip"]);
        assert_eq!(entry.notebook, "community");
        assert!(entry.read_only);
    }

    #[test]
    fn keeps_duplicate_tags_from_both_sources() {
        let raw = "---\ntags: [community]\n---\nbody";
        let entry = Entry::from_raw("tar", &community(), "/notes/community/tar", raw)
            .expect("entry should parse");
        assert_eq!(entry.tags, vec!["community", "community"]);
    }

    #[test]
    fn missing_syntax_is_empty() {
        let entry = Entry::from_raw("tar", &community(), "/x", "plain").expect("entry should parse");
        assert_eq!(entry.syntax, "");
        assert!(entry.is_tagged_with("community"));
        assert!(!entry.is_tagged_with("personal"));
    }

    #[test]
    fn copy_never_overwrites_existing_destination() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let source = temp.path().join("community").join("tar");
        let dest = temp.path().join("personal").join("tar");
        fs::create_dir_all(source.parent().expect("source has a parent"))
            .expect("source dir should be created");
        fs::create_dir_all(dest.parent().expect("dest has a parent"))
            .expect("dest dir should be created");
        fs::write(&source, "community tar").expect("source should be written");
        fs::write(&dest, "my own tar").expect("dest should be written");

        let entry = Entry::from_raw("tar", &community(), &source, "community tar")
            .expect("entry should parse");
        let err = entry.copy_to(&dest).expect_err("existing dest must be refused");
        assert!(matches!(err, EntryCopyError::Copy { .. }));
        assert_eq!(
            fs::read_to_string(&dest).expect("dest should be readable"),
            "my own tar"
        );
    }
}
