use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use treepaste::workflow::{self, Outcome};
use treepaste::{ComposeStats, Config, EntryId, FileTree, MemoryClipboard, compose_selection};

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.py"), "print('x')").unwrap();
    fs::write(dir.path().join("b.bin"), b"ab\0cd").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/inner.rs"), "fn main() {}\n").unwrap();
    dir
}

fn child(tree: &FileTree, parent: EntryId, name: &str) -> EntryId {
    tree.children(parent)
        .iter()
        .copied()
        .find(|&id| tree.entry(id).name == name)
        .unwrap()
}

fn lazy_tree(root: &Path, config: &Config) -> FileTree {
    FileTree::open_root(root, &config.list_options(), true).unwrap()
}

#[test]
fn checked_text_and_binary_files_compose_in_order() {
    let dir = project();
    let config = Config::new(dir.path());
    let mut tree = lazy_tree(dir.path(), &config);
    let root = tree.root().unwrap();

    // sub/ stays unexpanded
    assert!(tree.children(child(&tree, root, "sub")).is_empty());

    tree.set_checked(child(&tree, root, "a.py"), true);
    tree.set_checked(child(&tree, root, "b.bin"), true);

    let document = compose_selection(&tree, &config);
    assert_eq!(
        document.text,
        "# Files for analysis\n\n\n\
         ## a.py\n```python\n1: print('x')\n```\n\n\
         ## b.bin\n*Binary file not included*"
    );
    assert_eq!(
        document.stats,
        ComposeStats {
            files: 1,
            binary: 1,
            truncated: 0,
            errors: 0
        }
    );
    assert!(document.size_warning.is_none());
    assert_eq!(
        document.status_message(),
        "Copied 1 files to clipboard, 1 binary files ignored"
    );
}

#[test]
fn checking_a_directory_contributes_no_sections() {
    let dir = project();
    let config = Config::new(dir.path());
    let mut tree = lazy_tree(dir.path(), &config);
    let root = tree.root().unwrap();
    let sub = child(&tree, root, "sub");

    tree.expand(sub, &config.list_options(), true);
    tree.set_checked(sub, true);

    assert!(tree.checked_files().is_empty());
    let document = compose_selection(&tree, &config);
    assert_eq!(document.text, "# Files for analysis\n");
    assert_eq!(document.stats, ComposeStats::default());
}

#[test]
fn nested_sections_use_paths_relative_to_base_root() {
    let dir = project();
    let config = Config::new(dir.path());
    let mut tree = lazy_tree(dir.path(), &config);
    let root = tree.root().unwrap();
    let sub = child(&tree, root, "sub");
    tree.toggle_open(sub, &config.list_options(), true);
    tree.set_checked(child(&tree, sub, "inner.rs"), true);

    let files = tree.checked_files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].1, dir.path().join("sub").join("inner.rs"));

    let document = compose_selection(&tree, &config);
    let expected_header = format!("## {}\n", PathBuf::from("sub").join("inner.rs").display());
    assert!(document.text.contains(&expected_header));
    assert!(document.text.contains("```\n1: fn main() {}\n```"));
}

#[test]
fn select_all_then_deselect_all() {
    let dir = project();
    let config = Config::new(dir.path());
    let mut tree = FileTree::open_root(dir.path(), &config.list_options(), false).unwrap();

    tree.select_all();
    let checked = tree.checked_entries();
    assert_eq!(checked.len(), tree.len());
    assert_eq!(checked[0], tree.root().unwrap());
    assert_eq!(tree.checked_files().len(), 3);

    tree.deselect_all();
    assert!(tree.checked_entries().is_empty());
}

#[test]
fn expanding_twice_changes_nothing() {
    let dir = project();
    let config = Config::new(dir.path());
    let mut tree = lazy_tree(dir.path(), &config);
    let root = tree.root().unwrap();
    let sub = child(&tree, root, "sub");

    tree.expand(sub, &config.list_options(), true);
    let after_first = tree.len();
    tree.expand(sub, &config.list_options(), true);
    assert_eq!(tree.len(), after_first);
    assert_eq!(tree.children(sub).len(), 1);
}

#[test]
fn oversized_file_is_truncated_in_the_document() {
    let dir = TempDir::new().unwrap();
    let line = "0123456789abcdef\n";
    fs::write(dir.path().join("big.txt"), line.repeat(2048)).unwrap();

    let mut config = Config::new(dir.path());
    config.set_max_file_size(10 * 1024).unwrap();
    let mut tree = lazy_tree(dir.path(), &config);
    tree.select_all();

    let document = compose_selection(&tree, &config);
    assert_eq!(document.stats.truncated, 1);
    assert!(
        document
            .text
            .contains("## big.txt (truncated, showing first 10KB)\n```text\n1: 0123456789abcdef\n")
    );
    // 10240 bytes = 602 full lines plus a 6-byte partial one
    assert!(document.text.ends_with("603: 012345\n```"));
}

#[test]
fn headless_style_yank_reaches_the_sink() {
    let dir = project();
    let config = Config::new(dir.path());
    let mut tree = FileTree::open_root(dir.path(), &config.list_options(), false).unwrap();
    tree.select_all();

    let mut sink = MemoryClipboard::default();
    let outcome = workflow::yank_selection(&tree, &config, false, &mut sink).unwrap();
    let Outcome::Copied(document) = outcome else {
        panic!("expected a copied document");
    };
    assert_eq!(sink.contents.as_deref(), Some(document.text.as_str()));
    assert_eq!(document.stats.files, 2);
    assert_eq!(document.stats.binary, 1);
}

#[test]
fn size_warning_follows_threshold() {
    let dir = project();
    let mut config = Config::new(dir.path());
    config.warn_threshold = 10;
    let mut tree = lazy_tree(dir.path(), &config);
    tree.select_all();

    let document = compose_selection(&tree, &config);
    assert_eq!(document.size_warning, Some(document.char_count()));
    assert!(document.size_warning_message().is_some());
}

#[test]
fn missing_root_is_reported() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    let config = Config::new(&missing);
    assert!(matches!(
        FileTree::open_root(&missing, &config.list_options(), true),
        Err(treepaste::TreePasteError::RootNotFound(_))
    ));
}
