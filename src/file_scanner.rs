use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Knobs applied while listing a single directory.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub hide_hidden: bool,
    pub extension_filter: Option<Regex>,
}

impl ListOptions {
    /// Whether a file (never a directory) passes the extension filter.
    ///
    /// The pattern is searched in the lowercased extension including its dot,
    /// so `\.py$` keeps `main.PY`. Files without an extension are matched
    /// against the empty string.
    pub fn accepts_file(&self, name: &str) -> bool {
        match &self.extension_filter {
            None => true,
            Some(re) => re.is_match(&lowercase_extension(name)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildKind {
    Directory,
    File,
    /// Placeholder for something that could not be listed or inspected
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedChild {
    pub name: String,
    pub kind: ChildKind,
}

impl ListedChild {
    fn error(name: String, err: impl std::fmt::Display) -> Self {
        Self {
            name,
            kind: ChildKind::Error(err.to_string()),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == ChildKind::Directory
    }
}

pub fn lowercase_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// List the immediate children of `dir`: directories first, then files, each
/// group in case-insensitive name order.
///
/// Never fails. If `dir` itself cannot be read the result is a single error
/// child; if one child cannot be inspected it is listed as an error child and
/// the rest of the listing carries on.
pub fn list_children(dir: &Path, options: &ListOptions) -> Vec<ListedChild> {
    let mut children = Vec::new();

    for result in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let dirent = match result {
            Ok(v) => v,
            Err(e) if e.depth() == 0 => {
                warn!("Cannot list {}: {}", dir.display(), e);
                let name = dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| dir.display().to_string());
                return vec![ListedChild::error(name, describe_walk_error(&e))];
            }
            Err(e) => {
                let name = e
                    .path()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "?".to_string());
                if options.hide_hidden && name.starts_with('.') {
                    continue;
                }
                warn!("Cannot inspect {} in {}: {}", name, dir.display(), e);
                children.push(ListedChild::error(name, describe_walk_error(&e)));
                continue;
            }
        };

        let name = dirent.file_name().to_string_lossy().into_owned();
        // Checked before the kind, so hidden directories are skipped too.
        if options.hide_hidden && name.starts_with('.') {
            continue;
        }

        let is_dir = match inspect_is_dir(&dirent) {
            Ok(is_dir) => is_dir,
            Err(e) => {
                warn!("Cannot inspect {}: {}", dirent.path().display(), e);
                children.push(ListedChild::error(name, e));
                continue;
            }
        };

        if !is_dir && !options.accepts_file(&name) {
            continue;
        }

        children.push(ListedChild {
            name,
            kind: if is_dir {
                ChildKind::Directory
            } else {
                ChildKind::File
            },
        });
    }

    children.sort_by(compare_children);
    debug!("Listed {} children of {}", children.len(), dir.display());
    children
}

/// Directories before everything else, then case-insensitive name order with
/// the exact name as tie-breaker.
pub fn compare_children(a: &ListedChild, b: &ListedChild) -> Ordering {
    let rank = |c: &ListedChild| if c.is_dir() { 0 } else { 1 };
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

// Symlinks are resolved so a link to a directory is browsable; a dangling
// link is an inspection error.
fn inspect_is_dir(dirent: &DirEntry) -> io::Result<bool> {
    let file_type = dirent.file_type();
    if file_type.is_symlink() {
        return fs::metadata(dirent.path()).map(|m| m.is_dir());
    }
    Ok(file_type.is_dir())
}

fn describe_walk_error(err: &walkdir::Error) -> String {
    match err.io_error() {
        Some(io_err) if io_err.kind() == io::ErrorKind::PermissionDenied => {
            "Access denied".to_string()
        }
        Some(io_err) => io_err.to_string(),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn names(children: &[ListedChild]) -> Vec<&str> {
        children.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn directories_come_first_in_case_insensitive_order() {
        let dir = tempdir().unwrap();
        for d in ["beta", "Alpha", "gamma"] {
            fs::create_dir(dir.path().join(d)).unwrap();
        }
        for f in ["b.txt", "A.txt", "c.TXT"] {
            File::create(dir.path().join(f)).unwrap();
        }

        let children = list_children(dir.path(), &ListOptions::default());
        assert_eq!(
            names(&children),
            vec!["Alpha", "beta", "gamma", "A.txt", "b.txt", "c.TXT"]
        );
        assert!(children[..3].iter().all(ListedChild::is_dir));
        assert!(children[3..].iter().all(|c| c.kind == ChildKind::File));
    }

    #[test]
    fn hidden_entries_are_skipped_only_when_requested() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        File::create(dir.path().join(".env")).unwrap();
        File::create(dir.path().join("main.rs")).unwrap();

        let hidden = ListOptions {
            hide_hidden: true,
            extension_filter: None,
        };
        assert_eq!(names(&list_children(dir.path(), &hidden)), vec!["main.rs"]);

        let shown = list_children(dir.path(), &ListOptions::default());
        assert_eq!(names(&shown), vec![".git", ".env", "main.rs"]);
    }

    #[test]
    fn extension_filter_never_hides_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        File::create(dir.path().join("app.PY")).unwrap();
        File::create(dir.path().join("notes.md")).unwrap();
        File::create(dir.path().join("Makefile")).unwrap();

        let options = ListOptions {
            hide_hidden: false,
            extension_filter: Some(Regex::new(r"\.py$").unwrap()),
        };
        assert_eq!(
            names(&list_children(dir.path(), &options)),
            vec!["docs", "app.PY"]
        );
    }

    #[test]
    fn missing_directory_yields_single_error_child() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let children = list_children(&missing, &ListOptions::default());
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "nope");
        assert!(matches!(children[0].kind, ChildKind::Error(_)));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_degrades_to_error_entry() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("ok.txt")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("link")).unwrap();

        let children = list_children(dir.path(), &ListOptions::default());
        assert_eq!(names(&children), vec!["link", "ok.txt"]);
        assert!(matches!(children[0].kind, ChildKind::Error(_)));
        assert_eq!(children[1].kind, ChildKind::File);
    }

    #[test]
    fn lowercase_extension_keeps_the_dot() {
        assert_eq!(lowercase_extension("Main.RS"), ".rs");
        assert_eq!(lowercase_extension("archive.tar.GZ"), ".gz");
        assert_eq!(lowercase_extension("Makefile"), "");
        assert_eq!(lowercase_extension(".bashrc"), "");
    }
}
