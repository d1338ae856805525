use std::path::{Path, PathBuf};

/// Join path segments from the hierarchy root down to an entry.
pub fn join_segments<'a, I>(segments: I) -> PathBuf
where
    I: IntoIterator<Item = &'a str>,
{
    segments.into_iter().collect()
}

/// Path of `path` relative to `base_root`.
///
/// Paths outside `base_root` come back unchanged. When `path` *is* the base
/// root, the result is its last segment so a section label is never empty.
/// Comparison is component-wise, so trailing separators make no difference.
pub fn relative_path(path: &Path, base_root: &Path) -> PathBuf {
    if base_root.as_os_str().is_empty() {
        return path.to_path_buf();
    }
    match path.strip_prefix(base_root) {
        Ok(rest) if rest.as_os_str().is_empty() => path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf()),
        Ok(rest) => rest.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}
