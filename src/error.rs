//! Error type for the treepaste core.
//!
//! Only failures that stop a whole user action live here. Problems with a
//! single directory or file never become a `TreePasteError`; they are turned
//! into placeholder entries in the tree or placeholder sections in the
//! document instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreePasteError {
    /// The path handed to `open_root` does not exist or cannot be resolved
    #[error("Root path not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The path handed to `open_root` exists but is not a directory
    #[error("Root path is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    /// The extension filter is not a valid regular expression
    #[error("Invalid extension filter: {0}")]
    InvalidFilter(#[from] regex::Error),

    /// Maximum file size outside the accepted range
    #[error("Maximum file size must be between {min} and {max} bytes, got {value}")]
    InvalidMaxFileSize { value: u64, min: u64, max: u64 },

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The clipboard sink refused the document
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

pub type Result<T> = std::result::Result<T, TreePasteError>;

impl From<arboard::Error> for TreePasteError {
    fn from(err: arboard::Error) -> Self {
        TreePasteError::Clipboard(err.to_string())
    }
}
