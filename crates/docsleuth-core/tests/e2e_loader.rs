use docsleuth_core::loader::progress::LoadProgress;
use docsleuth_core::loader::{start_load, SkipReason};
/// End-to-end loader integration tests.
///
/// These tests run the real discovery walk, file reads, front-matter
/// parsing and tree construction against a temporary directory, so every
/// path from `load_catalog` down to `build_tree` is exercised with no
/// mocking.
use docsleuth_core::{build_tree, load_catalog, LoadError, LoaderConfig, NodeKind};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Create a reproducible documentation tree:
///
/// ```text
/// root/
///   README.md                 (front-matter title "Welcome")
///   getting-started.md        (no front-matter)
///   guide/
///     intro.md                (title "Introduction")
///     advanced/
///       tuning.markdown
///   notes.txt                 (not a document)
///   node_modules/pkg/readme.md (ignored dir)
///   .hidden/secret.md         (hidden dir)
/// ```
fn build_docs_tree(root: &Path) {
    fs::create_dir_all(root.join("guide/advanced")).unwrap();
    fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
    fs::create_dir_all(root.join(".hidden")).unwrap();

    write(root, "README.md", "---\ntitle: Welcome\n---\n# Welcome\n");
    write(root, "getting-started.md", "# Getting started\n\nSteps.\n");
    write(
        root,
        "guide/intro.md",
        "---\ntitle: Introduction\ntags: [basics]\n---\nIntro body\n",
    );
    write(root, "guide/advanced/tuning.markdown", "Tune things.\n");
    write(root, "notes.txt", "not markdown");
    write(root, "node_modules/pkg/readme.md", "# Package\n");
    write(root, ".hidden/secret.md", "# Secret\n");
}

fn write(root: &Path, rel: &str, content: &str) {
    fs::write(root.join(rel), content).unwrap();
}

fn relative_paths(catalog: &docsleuth_core::Catalog) -> Vec<&str> {
    catalog
        .documents
        .iter()
        .map(|d| d.relative_path.as_str())
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Only Markdown files outside ignored and hidden directories are loaded,
/// sorted by relative path.
#[test]
fn load_discovers_documents_in_sorted_order() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_docs_tree(tmp.path());

    let catalog = load_catalog(&LoaderConfig::new(tmp.path())).expect("load failed");

    assert_eq!(
        relative_paths(&catalog),
        [
            "getting-started.md",
            "guide/advanced/tuning.markdown",
            "guide/intro.md",
            "README.md",
        ]
    );
    assert!(catalog.skipped.is_empty(), "{:?}", catalog.skipped);
}

/// Titles come from front-matter first, then from the file name.
#[test]
fn load_extracts_titles_and_metadata() {
    let tmp = TempDir::new().unwrap();
    build_docs_tree(tmp.path());

    let catalog = load_catalog(&LoaderConfig::new(tmp.path())).unwrap();

    let readme = catalog.find("README.md").expect("README indexed");
    assert_eq!(readme.title, "Welcome");
    assert_eq!(readme.content, "# Welcome\n");
    assert_eq!(readme.name, "README");
    assert_eq!(readme.path, tmp.path().join("README.md"));

    let started = catalog.find("getting-started.md").unwrap();
    assert_eq!(started.title, "Getting Started");
    assert!(started.front_matter.is_empty());

    let intro = catalog.find("guide/intro.md").unwrap();
    assert_eq!(intro.front_matter_text("tags").as_deref(), Some("basics"));
    assert_eq!(intro.content, "Intro body\n");

    let tuning = catalog.find("guide/advanced/tuning.markdown").unwrap();
    assert_eq!(tuning.title, "Tuning");
    assert_eq!(tuning.size, "Tune things.\n".len() as u64);
    assert!(tuning.modified.is_some());

    assert!(catalog.find("notes.txt").is_none());
}

/// The hidden and ignored switches widen discovery.
#[test]
fn load_can_include_hidden_and_ignored_dirs() {
    let tmp = TempDir::new().unwrap();
    build_docs_tree(tmp.path());

    let config = LoaderConfig::new(tmp.path())
        .with_show_hidden(true)
        .with_show_ignored(true);
    let catalog = load_catalog(&config).unwrap();

    assert!(catalog.find(".hidden/secret.md").is_some());
    assert!(catalog.find("node_modules/pkg/readme.md").is_some());
    assert_eq!(catalog.len(), 6);
}

/// The loaded catalog feeds straight into the tree builder.
#[test]
fn loaded_catalog_builds_a_tree() {
    let tmp = TempDir::new().unwrap();
    build_docs_tree(tmp.path());

    let catalog = load_catalog(&LoaderConfig::new(tmp.path())).unwrap();
    let forest = catalog.tree().expect("tree builds");

    assert_eq!(forest, build_tree(&catalog.documents).unwrap());
    assert_eq!(forest[0].name, "guide");
    assert_eq!(forest[0].kind, NodeKind::Directory);
    assert_eq!(forest[0].children[0].name, "advanced");
    let files: Vec<&str> = forest[1..].iter().map(|n| n.name.as_str()).collect();
    assert_eq!(files, ["Getting Started", "Welcome"]);
}

/// Broken front-matter skips that file but not the load.
#[test]
fn invalid_front_matter_is_skipped_not_fatal() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "good.md", "# Good\n");
    write(tmp.path(), "bad.md", "---\ntitle: [broken\n---\nBody\n");

    let catalog = load_catalog(&LoaderConfig::new(tmp.path())).unwrap();

    assert_eq!(relative_paths(&catalog), ["good.md"]);
    assert_eq!(catalog.skipped.len(), 1);
    assert_eq!(catalog.skipped[0].path, tmp.path().join("bad.md"));
    assert!(matches!(
        catalog.skipped[0].reason,
        SkipReason::InvalidFrontMatter(_)
    ));
}

/// Files that are not UTF-8 text are skipped with a reason.
#[test]
fn binary_markdown_file_is_skipped() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("blob.md"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

    let catalog = load_catalog(&LoaderConfig::new(tmp.path())).unwrap();

    assert!(catalog.is_empty());
    assert_eq!(catalog.skipped[0].reason, SkipReason::NonUtf8Content);
}

/// A link to a document outside the root is indexed under the link's path.
#[cfg(unix)]
#[test]
fn symlinked_document_is_indexed() {
    let tmp = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    write(tmp.path(), "plain.md", "# Plain\n");
    write(outside.path(), "target.md", "---\ntitle: Linked Page\n---\nBody\n");
    std::os::unix::fs::symlink(outside.path().join("target.md"), tmp.path().join("linked.md"))
        .unwrap();

    let catalog = load_catalog(&LoaderConfig::new(tmp.path())).unwrap();

    assert_eq!(relative_paths(&catalog), ["linked.md", "plain.md"]);
    assert!(catalog.skipped.is_empty(), "{:?}", catalog.skipped);
    let linked = catalog.find("linked.md").unwrap();
    assert_eq!(linked.title, "Linked Page");
    assert_eq!(linked.content, "Body\n");
    assert_eq!(linked.size, 32);
}

/// Broken links are reported; links to directories are not documents.
#[cfg(unix)]
#[test]
fn broken_and_directory_links_are_not_indexed() {
    let tmp = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    write(tmp.path(), "plain.md", "# Plain\n");
    std::os::unix::fs::symlink(tmp.path().join("gone.md"), tmp.path().join("dangling.md"))
        .unwrap();
    std::os::unix::fs::symlink(outside.path(), tmp.path().join("folder.md")).unwrap();

    let catalog = load_catalog(&LoaderConfig::new(tmp.path())).unwrap();

    assert_eq!(relative_paths(&catalog), ["plain.md"]);
    assert_eq!(catalog.skipped.len(), 1);
    assert_eq!(catalog.skipped[0].path, tmp.path().join("dangling.md"));
    assert!(matches!(catalog.skipped[0].reason, SkipReason::Io(_)));
}

#[test]
fn empty_directory_loads_empty_catalog() {
    let tmp = TempDir::new().unwrap();
    let catalog = load_catalog(&LoaderConfig::new(tmp.path())).unwrap();
    assert!(catalog.is_empty());
    assert_eq!(catalog.total_size(), 0);
    assert!(catalog.tree().unwrap().is_empty());
}

#[test]
fn missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = load_catalog(&LoaderConfig::new(tmp.path().join("absent"))).unwrap_err();
    assert!(matches!(err, LoadError::RootNotFound(_)), "got {err:?}");

    write(tmp.path(), "file.md", "x");
    let err = load_catalog(&LoaderConfig::new(tmp.path().join("file.md"))).unwrap_err();
    assert!(matches!(err, LoadError::NotADirectory(_)), "got {err:?}");
}

// ── Background load ───────────────────────────────────────────────────────────

/// Drain progress messages until a terminal one arrives (30 s deadline).
fn drain_to_terminal(handle: docsleuth_core::loader::LoadHandle) -> LoadProgress {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "loader did not finish within 30 seconds"
        );
        match handle.progress_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(LoadProgress::Discovered { .. }) => continue,
            Ok(terminal) => return terminal,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                panic!("loader channel disconnected before a terminal message")
            }
        }
    }
}

#[test]
fn background_load_delivers_the_catalog() {
    let tmp = TempDir::new().unwrap();
    build_docs_tree(tmp.path());

    let handle = start_load(LoaderConfig::new(tmp.path())).expect("spawn loader");
    match drain_to_terminal(handle) {
        LoadProgress::Complete { catalog, .. } => assert_eq!(catalog.len(), 4),
        other => panic!("expected Complete, got {other:?}"),
    }
}

#[test]
fn background_load_reports_missing_root() {
    let tmp = TempDir::new().unwrap();

    let handle = start_load(LoaderConfig::new(tmp.path().join("absent"))).unwrap();
    match drain_to_terminal(handle) {
        LoadProgress::Failed { message } => {
            assert!(message.contains("does not exist"), "{message}")
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}
