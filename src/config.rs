//! Runtime configuration shared by the tree model, the extractor and the
//! composer.

use std::path::PathBuf;

use regex::Regex;

use crate::error::{Result, TreePasteError};
use crate::file_scanner::ListOptions;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;
pub const MIN_MAX_FILE_SIZE: u64 = 10 * 1024;
pub const MAX_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const DEFAULT_WARN_THRESHOLD: usize = 500_000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix stripped from full paths when labelling document sections
    pub base_root: PathBuf,
    /// Skip names starting with `.` while enumerating
    pub hide_hidden: bool,
    /// Populate sub-directories only when they are opened
    pub lazy_mode: bool,
    /// Regex searched in the lowercased extension of files; `None` keeps all
    pub extension_filter: Option<Regex>,
    /// Files larger than this are truncated to exactly this many bytes
    pub max_file_size: u64,
    /// Character count above which the composed document triggers a warning
    pub warn_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_root: PathBuf::from("."),
            hide_hidden: true,
            lazy_mode: true,
            extension_filter: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            warn_threshold: DEFAULT_WARN_THRESHOLD,
        }
    }
}

impl Config {
    pub fn new(base_root: impl Into<PathBuf>) -> Self {
        Self {
            base_root: base_root.into(),
            ..Self::default()
        }
    }

    /// Replace the extension filter. An empty or blank pattern clears it.
    pub fn set_extension_filter(&mut self, pattern: &str) -> Result<()> {
        let pattern = pattern.trim();
        self.extension_filter = if pattern.is_empty() {
            None
        } else {
            Some(Regex::new(pattern)?)
        };
        Ok(())
    }

    pub fn set_max_file_size(&mut self, bytes: u64) -> Result<()> {
        if !(MIN_MAX_FILE_SIZE..=MAX_MAX_FILE_SIZE).contains(&bytes) {
            return Err(TreePasteError::InvalidMaxFileSize {
                value: bytes,
                min: MIN_MAX_FILE_SIZE,
                max: MAX_MAX_FILE_SIZE,
            });
        }
        self.max_file_size = bytes;
        Ok(())
    }

    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            hide_hidden: self.hide_hidden,
            extension_filter: self.extension_filter.clone(),
        }
    }

    pub fn filter_pattern(&self) -> &str {
        self.extension_filter.as_ref().map_or("", |re| re.as_str())
    }
}
