//! Overlay resolution across per-notebook entry maps.
//!
//! # Responsibility
//! - Consolidate notebooks into one view where more local overrides more
//!   global.
//! - Filter, sort, flatten and tag-index entries without touching the
//!   input maps.
//!
//! # Invariants
//! - Inputs are ordered like the registry; outputs keep that order.
//! - Consolidation replaces whole entries; fields are never merged.
//! - Tag filtering uses AND semantics and keeps empty per-notebook maps.

use crate::model::entry::{Entry, EntryMap};
use std::collections::BTreeSet;

/// What the user sees when no notebook is selected: name to winning entry.
pub type ConsolidatedView = EntryMap;

/// Folds `maps` in order; later notebooks overwrite earlier ones.
pub fn consolidate(maps: &[EntryMap]) -> ConsolidatedView {
    let mut consolidated = ConsolidatedView::new();
    for map in maps {
        consolidated.extend(map.iter().map(|(name, entry)| (name.clone(), entry.clone())));
    }
    consolidated
}

/// Keeps, per notebook, the entries carrying every requested tag.
///
/// Requested tags are trimmed; tags that are empty after trimming are
/// ignored. An empty request returns copies of the input maps.
pub fn filter_by_tags<S: AsRef<str>>(maps: &[EntryMap], tags: &[S]) -> Vec<EntryMap> {
    let wanted = tags
        .iter()
        .map(|tag| tag.as_ref().trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>();

    maps.iter()
        .map(|map| {
            map.iter()
                .filter(|(_, entry)| wanted.iter().all(|tag| entry.is_tagged_with(tag)))
                .map(|(name, entry)| (name.clone(), entry.clone()))
                .collect::<EntryMap>()
        })
        .collect()
}

/// Entries of one map sorted ascending by name.
pub fn sort(map: &EntryMap) -> Vec<Entry> {
    let mut entries = map.values().cloned().collect::<Vec<_>>();
    entries.sort_by(|left, right| left.name.cmp(&right.name));
    entries
}

/// Every entry from every notebook, sorted by name.
///
/// The sort is stable, so copies sharing a name keep notebook order.
pub fn flatten(maps: &[EntryMap]) -> Vec<Entry> {
    let mut entries = maps.iter().flat_map(sort).collect::<Vec<_>>();
    entries.sort_by(|left, right| left.name.cmp(&right.name));
    entries
}

/// Every notebook's copy of `name`, in notebook order.
pub fn lookup_all(maps: &[EntryMap], name: &str) -> Vec<Entry> {
    maps.iter().filter_map(|map| map.get(name).cloned()).collect()
}

/// Deduplicated, sorted set of all tags in use.
pub fn tags(maps: &[EntryMap]) -> Vec<String> {
    maps.iter()
        .flat_map(|map| map.values())
        .flat_map(|entry| entry.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
