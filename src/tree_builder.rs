use crate::tree_model::{EntryKind, FileTree, VisibleRow};

/// Build pretty tree-style labels for the rows of the tree view in **O(n)**.
///
/// * `rows` **must** be in pre-order with correct depths, as produced by
///   [`FileTree::visible_rows`].
/// * Directories get a trailing `/`, placeholders their error message.
pub fn build_tree_labels(tree: &FileTree, rows: &[VisibleRow]) -> Vec<String> {
    let mut labels = Vec::with_capacity(rows.len());
    // last_at_depth[d] is true if the current ancestor at depth d is the last
    // child of *its* parent. It decides between "│  " and "   ".
    let mut last_at_depth: Vec<bool> = Vec::new();

    for row in rows {
        let is_last = tree.is_last_sibling(row.id);
        last_at_depth.truncate(row.depth);

        let mut prefix = String::new();
        if row.depth > 0 {
            // Skip the root's own flag: the root column never draws a rail.
            for &ancestor_is_last in last_at_depth.iter().skip(1) {
                prefix.push_str(if ancestor_is_last { "   " } else { "│  " });
            }
            prefix.push_str(if is_last { "└─ " } else { "├─ " });
        }
        last_at_depth.push(is_last);

        let entry = tree.entry(row.id);
        let label = match &entry.kind {
            EntryKind::Directory => format!("{}{}/", prefix, entry.name),
            EntryKind::File => format!("{}{}", prefix, entry.name),
            EntryKind::Error(msg) => format!("{}{} ({})", prefix, entry.name, msg),
        };
        labels.push(label);
    }
    labels
}
