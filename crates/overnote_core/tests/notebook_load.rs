use overnote_core::{load_notebook, load_notebooks, LoadError, Notebook, ParseError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, name: &str, contents: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().expect("entry path has a parent"))
        .expect("entry dir should be created");
    fs::write(path, contents).expect("entry should be written");
}

fn notebook(dir: &TempDir, name: &str, read_only: bool) -> Notebook {
    Notebook::new(name, dir.path(), read_only).with_tags([name])
}

#[test]
fn loads_every_file_keyed_by_relative_name() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    write(dir.path(), "tar", "---\nsyntax: sh\ntags: [archive]\n---\ntar -xvf file.tar\n");
    write(dir.path(), "git/log", "git log --oneline\n");

    let entries = load_notebook(&notebook(&dir, "community", true)).expect("notebook should load");
    assert_eq!(entries.len(), 2);

    let tar = &entries["tar"];
    assert_eq!(tar.body, "tar -xvf file.tar\n");
    assert_eq!(tar.syntax, "sh");
    assert_eq!(tar.tags, vec!["archive", "community"]);
    assert_eq!(tar.notebook, "community");
    assert!(tar.read_only);
    assert_eq!(tar.path, dir.path().join("tar"));

    let nested_name = Path::new("git").join("log").to_string_lossy().into_owned();
    let log = &entries[nested_name.as_str()];
    assert_eq!(log.body, "git log --oneline\n");
    assert!(log.syntax.is_empty());
}

#[test]
fn directories_are_not_entries() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    fs::create_dir_all(dir.path().join("empty/nested")).expect("dir should be created");
    write(dir.path(), "only", "body");

    let entries = load_notebook(&notebook(&dir, "personal", false)).expect("notebook should load");
    assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["only"]);
}

#[test]
fn git_directory_is_never_walked() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    write(dir.path(), "tar", "body");
    write(dir.path(), ".git/HEAD", "ref: refs/heads/main\n");
    // Would fail to parse if the walker descended into `.git`.
    write(dir.path(), ".git/hooks/broken", "---\nunclosed\n");

    let entries = load_notebook(&notebook(&dir, "personal", false)).expect("notebook should load");
    assert_eq!(entries.len(), 1);
    assert!(entries.contains_key("tar"));
}

#[test]
fn malformed_header_aborts_the_notebook() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    write(dir.path(), "good", "body");
    write(dir.path(), "bad", "---\ntags: [x]\nno closing delimiter\n");

    let err = load_notebook(&notebook(&dir, "personal", false))
        .expect_err("unclosed header should fail");
    match err {
        LoadError::MalformedEntry {
            notebook,
            name,
            path,
            source,
        } => {
            assert_eq!(notebook, "personal");
            assert_eq!(name, "bad");
            assert_eq!(path, dir.path().join("bad"));
            assert_eq!(source, ParseError::UnclosedHeader);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_utf8_file_is_unreadable() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    fs::write(dir.path().join("binary"), [0xff, 0xfe, 0x00]).expect("file should be written");

    let err = load_notebook(&notebook(&dir, "personal", false))
        .expect_err("non-utf8 body should fail");
    assert!(matches!(err, LoadError::UnreadableFile { ref name, .. } if name == "binary"));
    assert!(err.to_string().contains("binary"));
}

#[test]
fn missing_root_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let missing = Notebook::new("ghost", dir.path().join("missing"), false);

    let err = load_notebook(&missing).expect_err("missing root should fail");
    assert!(matches!(err, LoadError::UnwalkableNotebook { .. }));
    assert_eq!(err.notebook(), "ghost");
}

#[test]
fn file_root_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    write(dir.path(), "plain", "body");
    let file_root = Notebook::new("file", dir.path().join("plain"), false);

    let err = load_notebook(&file_root).expect_err("file root should fail");
    assert!(matches!(err, LoadError::UnwalkableNotebook { .. }));
}

#[test]
fn load_keeps_registry_order_and_first_error_wins() {
    let first = tempfile::tempdir().expect("tempdir should be created");
    let second = tempfile::tempdir().expect("tempdir should be created");
    write(first.path(), "a", "first");
    write(second.path(), "b", "second");

    let maps = load_notebooks(&[
        notebook(&first, "global", true),
        notebook(&second, "local", false),
    ])
    .expect("notebooks should load");
    assert_eq!(maps.len(), 2);
    assert!(maps[0].contains_key("a"));
    assert!(maps[1].contains_key("b"));

    let broken = tempfile::tempdir().expect("tempdir should be created");
    write(broken.path(), "bad", "---\n");
    let err = load_notebooks(&[
        Notebook::new("missing", first.path().join("nope"), false),
        notebook(&broken, "broken", false),
    ])
    .expect_err("first broken notebook wins");
    assert_eq!(err.notebook(), "missing");
}
