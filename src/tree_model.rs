//! In-memory hierarchy of the opened directory.
//!
//! Entries live in a flat arena and refer to each other by [`EntryId`]. Each
//! entry owns its children through the id list; the parent id exists only to
//! rebuild full paths. Check state is stored per entry and is never derived
//! from parents or children.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TreePasteError};
use crate::file_scanner::{self, ChildKind, ListOptions};
use crate::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Placeholder left by a listing or inspection failure
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    Unchecked,
    Checked,
}

impl CheckState {
    pub fn from_bool(checked: bool) -> Self {
        if checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }

    pub fn is_checked(self) -> bool {
        self == CheckState::Checked
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub check: CheckState,
    /// Children have been materialized (directories only)
    pub expanded: bool,
    /// Folded open in the tree view; purely presentational
    pub open: bool,
    pub children: Vec<EntryId>,
    pub parent: Option<EntryId>,
}

impl Entry {
    fn new(name: String, kind: EntryKind, parent: Option<EntryId>) -> Self {
        Self {
            name,
            kind,
            check: CheckState::Unchecked,
            expanded: false,
            open: false,
            children: Vec::new(),
            parent,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// One row of the tree view: an entry and its depth below the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: EntryId,
    pub depth: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FileTree {
    entries: Vec<Entry>,
    roots: Vec<EntryId>,
}

impl FileTree {
    /// Build a fresh hierarchy rooted at `path`.
    ///
    /// The root's first level is always populated; with `lazy == false` the
    /// whole subtree is. Fails only when `path` is missing or not a directory.
    pub fn open_root(path: &Path, options: &ListOptions, lazy: bool) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TreePasteError::RootNotFound(path.to_path_buf()),
            _ => TreePasteError::Io(e),
        })?;
        if !metadata.is_dir() {
            return Err(TreePasteError::RootNotDirectory(path.to_path_buf()));
        }

        let mut tree = FileTree::default();
        let root = tree.push(Entry::new(
            path.to_string_lossy().into_owned(),
            EntryKind::Directory,
            None,
        ));
        tree.roots.push(root);
        tree.expand(root, options, lazy);
        tree.entries[root.0].open = true;

        info!(
            "Opened {} ({} entries, lazy={})",
            path.display(),
            tree.len(),
            lazy
        );
        Ok(tree)
    }

    fn push(&mut self, entry: Entry) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(entry);
        id
    }

    pub fn root(&self) -> Option<EntryId> {
        self.roots.first().copied()
    }

    pub fn entry(&self, id: EntryId) -> &Entry {
        &self.entries[id.0]
    }

    pub fn children(&self, id: EntryId) -> &[EntryId] {
        &self.entries[id.0].children
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full filesystem path: the names from the root down to `id`, joined.
    pub fn full_path(&self, id: EntryId) -> PathBuf {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let entry = &self.entries[cur.0];
            segments.push(entry.name.as_str());
            current = entry.parent;
        }
        segments.reverse();
        paths::join_segments(segments)
    }

    pub fn relative_path(&self, id: EntryId, base_root: &Path) -> PathBuf {
        paths::relative_path(&self.full_path(id), base_root)
    }

    /// Materialize the children of a directory.
    ///
    /// No-op for files, placeholders and already-expanded directories. With
    /// `lazy == false`, every directory discovered below `id` is expanded too.
    pub fn expand(&mut self, id: EntryId, options: &ListOptions, lazy: bool) {
        let mut pending = vec![id];
        let mut canonical: HashMap<EntryId, PathBuf> = HashMap::new();

        while let Some(current) = pending.pop() {
            if !lazy && self.revisits_ancestor(current, &mut canonical) {
                debug!("Skipping symlink loop at {}", self.full_path(current).display());
                continue;
            }
            if !self.populate(current, options) {
                continue;
            }
            if !lazy {
                pending.extend(
                    self.entries[current.0]
                        .children
                        .iter()
                        .rev()
                        .copied()
                        .filter(|child| self.entries[child.0].is_dir()),
                );
            }
        }
    }

    fn canonical_path(
        &self,
        id: EntryId,
        cache: &mut HashMap<EntryId, PathBuf>,
    ) -> Option<PathBuf> {
        if let Some(path) = cache.get(&id) {
            return Some(path.clone());
        }
        let path = fs::canonicalize(self.full_path(id)).ok()?;
        cache.insert(id, path.clone());
        Some(path)
    }

    // A directory resolving to the same place as one of its own ancestors is
    // a symlink loop. Siblings that alias each other are not.
    fn revisits_ancestor(&self, id: EntryId, cache: &mut HashMap<EntryId, PathBuf>) -> bool {
        let Some(own) = self.canonical_path(id, cache) else {
            return false;
        };
        let mut ancestor = self.entries[id.0].parent;
        while let Some(current) = ancestor {
            if self.canonical_path(current, cache).as_ref() == Some(&own) {
                return true;
            }
            ancestor = self.entries[current.0].parent;
        }
        false
    }

    fn populate(&mut self, id: EntryId, options: &ListOptions) -> bool {
        let entry = &self.entries[id.0];
        if !entry.is_dir() || entry.expanded {
            return false;
        }

        let path = self.full_path(id);
        let listed = file_scanner::list_children(&path, options);
        let mut child_ids = Vec::with_capacity(listed.len());
        for child in listed {
            let kind = match child.kind {
                ChildKind::Directory => EntryKind::Directory,
                ChildKind::File => EntryKind::File,
                ChildKind::Error(msg) => EntryKind::Error(msg),
            };
            child_ids.push(self.push(Entry::new(child.name, kind, Some(id))));
        }

        debug!("Expanded {} ({} children)", path.display(), child_ids.len());
        let entry = &mut self.entries[id.0];
        entry.children = child_ids;
        entry.expanded = true;
        true
    }

    /// Flip the view's fold state, expanding lazily on first open.
    pub fn toggle_open(&mut self, id: EntryId, options: &ListOptions, lazy: bool) {
        if !self.entries[id.0].is_dir() {
            return;
        }
        if !self.entries[id.0].expanded {
            self.expand(id, options, lazy);
            self.entries[id.0].open = true;
        } else {
            let entry = &mut self.entries[id.0];
            entry.open = !entry.open;
        }
    }

    pub fn set_checked(&mut self, id: EntryId, checked: bool) {
        self.entries[id.0].check = CheckState::from_bool(checked);
    }

    pub fn toggle_checked(&mut self, id: EntryId) {
        let checked = self.entries[id.0].check.is_checked();
        self.set_checked(id, !checked);
    }

    /// Set `id` and every already-known descendant. Children that have not
    /// been discovered yet keep their default state once they appear.
    pub fn set_checked_recursive(&mut self, id: EntryId, checked: bool) {
        let state = CheckState::from_bool(checked);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let entry = &mut self.entries[current.0];
            entry.check = state;
            stack.extend(entry.children.iter().copied());
        }
    }

    pub fn select_all(&mut self) {
        for root in self.roots.clone() {
            self.set_checked_recursive(root, true);
        }
    }

    pub fn deselect_all(&mut self) {
        for root in self.roots.clone() {
            self.set_checked_recursive(root, false);
        }
    }

    /// Every checked entry, depth-first, parents before children, siblings
    /// left to right. Directories and placeholders are included.
    pub fn checked_entries(&self) -> Vec<EntryId> {
        self.preorder()
            .into_iter()
            .filter(|id| self.entries[id.0].check.is_checked())
            .collect()
    }

    /// Full paths of the checked files only, in selection order.
    pub fn checked_files(&self) -> Vec<(EntryId, PathBuf)> {
        self.checked_entries()
            .into_iter()
            .filter(|id| self.entries[id.0].is_file())
            .map(|id| (id, self.full_path(id)))
            .collect()
    }

    pub fn checked_count(&self) -> usize {
        self.entries.iter().filter(|e| e.check.is_checked()).count()
    }

    fn preorder(&self) -> Vec<EntryId> {
        let mut order = Vec::with_capacity(self.entries.len());
        let mut stack: Vec<EntryId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.entries[id.0].children.iter().rev().copied());
        }
        order
    }

    /// Rows shown by the tree view: entries whose ancestors are all open.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<VisibleRow> = self
            .roots
            .iter()
            .rev()
            .map(|&id| VisibleRow { id, depth: 0 })
            .collect();
        while let Some(row) = stack.pop() {
            rows.push(row);
            let entry = &self.entries[row.id.0];
            if entry.open {
                stack.extend(entry.children.iter().rev().map(|&id| VisibleRow {
                    id,
                    depth: row.depth + 1,
                }));
            }
        }
        rows
    }

    pub fn is_last_sibling(&self, id: EntryId) -> bool {
        let siblings = match self.entries[id.0].parent {
            Some(parent) => &self.entries[parent.0].children,
            None => &self.roots,
        };
        siblings.last() == Some(&id)
    }

    /// Display hint for the tree view only: every directory with at least
    /// one checked, already-known descendant. One pass over the arena, each
    /// ancestor chain climbed only until it meets an entry already marked.
    pub fn dirs_with_checked_descendants(&self) -> HashSet<EntryId> {
        let mut marked = HashSet::new();
        for entry in self.entries.iter().filter(|e| e.check.is_checked()) {
            let mut ancestor = entry.parent;
            while let Some(id) = ancestor {
                if !marked.insert(id) {
                    break;
                }
                ancestor = self.entries[id.0].parent;
            }
        }
        marked
    }
}
