use overnote_core::{
    consolidate, filter_by_tags, load_notebooks, sort, tags, EntryMap, Notebook,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, name: &str, contents: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().expect("entry path has a parent"))
        .expect("entry dir should be created");
    fs::write(path, contents).expect("entry should be written");
}

struct Fixture {
    _community: TempDir,
    _personal: TempDir,
    notebooks: Vec<Notebook>,
}

fn fixture() -> Fixture {
    let community = tempfile::tempdir().expect("tempdir should be created");
    let personal = tempfile::tempdir().expect("tempdir should be created");

    write(community.path(), "tar", "---\ntags: [archive]\n---\ncommunity tar");
    write(community.path(), "zip", "---\ntags: [archive]\n---\ncommunity zip");
    write(community.path(), "ssh/keys", "ssh-keygen -t ed25519");
    write(personal.path(), "tar", "personal tar");
    write(personal.path(), "notes", "---\ntags: [work, archive]\n---\nmeeting notes");

    let notebooks = vec![
        Notebook::new("community", community.path(), true).with_tags(["c"]),
        Notebook::new("personal", personal.path(), false).with_tags(["p"]),
    ];
    Fixture {
        _community: community,
        _personal: personal,
        notebooks,
    }
}

fn names(map: &EntryMap) -> Vec<String> {
    sort(map).into_iter().map(|entry| entry.name).collect()
}

#[test]
fn entry_in_one_notebook_is_unchanged_by_consolidation() {
    let fixture = fixture();
    let maps = load_notebooks(&fixture.notebooks).expect("notebooks should load");
    let view = consolidate(&maps);

    assert_eq!(view["zip"], maps[0]["zip"]);
    assert_eq!(view["notes"], maps[1]["notes"]);
}

#[test]
fn more_local_notebook_overrides_whole_entry() {
    let fixture = fixture();
    let view = consolidate(&load_notebooks(&fixture.notebooks).expect("notebooks should load"));

    let tar = &view["tar"];
    assert_eq!(tar.notebook, "personal");
    assert_eq!(tar.tags, vec!["p"]);
    assert!(!tar.read_only);
    assert_eq!(tar.body, "personal tar");
    assert_eq!(view.len(), 4);
}

#[test]
fn consolidation_does_not_mutate_inputs() {
    let fixture = fixture();
    let maps = load_notebooks(&fixture.notebooks).expect("notebooks should load");
    let before = maps.clone();
    let _ = consolidate(&maps);
    let _ = filter_by_tags(&maps, &["archive"]);
    assert_eq!(maps, before);
}

#[test]
fn tag_filter_is_and_and_monotonic() {
    let fixture = fixture();
    let maps = load_notebooks(&fixture.notebooks).expect("notebooks should load");

    let archive = filter_by_tags(&maps, &["archive"]);
    assert_eq!(names(&archive[0]), vec!["tar", "zip"]);
    assert_eq!(names(&archive[1]), vec!["notes"]);

    let archive_and_work = filter_by_tags(&maps, &["archive", "work"]);
    assert!(archive_and_work[0].is_empty());
    assert_eq!(names(&archive_and_work[1]), vec!["notes"]);

    for (narrow, wide) in archive_and_work.iter().zip(&archive) {
        assert!(narrow.keys().all(|name| wide.contains_key(name)));
    }
}

#[test]
fn notebook_default_tags_participate_in_filtering() {
    let fixture = fixture();
    let maps = load_notebooks(&fixture.notebooks).expect("notebooks should load");

    let community_only = filter_by_tags(&maps, &["c"]);
    assert_eq!(community_only[0].len(), 3);
    assert!(community_only[1].is_empty());

    // Filtering happens before consolidation, so the community `tar` resurfaces.
    let view = consolidate(&filter_by_tags(&maps, &["archive"]));
    assert_eq!(view["tar"].notebook, "community");
}

#[test]
fn tags_lists_every_tag_once() {
    let fixture = fixture();
    let maps = load_notebooks(&fixture.notebooks).expect("notebooks should load");
    assert_eq!(tags(&maps), vec!["archive", "c", "p", "work"]);
}
