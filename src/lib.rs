/*!
 * Treepaste - tick files in a directory tree and copy them as one
 * annotated Markdown document, ready to paste into a chat window.
 */

pub mod cli;
pub mod clipboard;
pub mod composer;
pub mod config;
pub mod encoding;
pub mod error;
pub mod extractor;
pub mod file_scanner;
pub mod language;
pub mod paths;
pub mod tree_builder;
pub mod tree_model;
pub mod tui;
pub mod utils;
pub mod workflow;

// Re-export main components for easier access
pub use clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
pub use composer::{ComposeStats, Document, compose, compose_selection};
pub use config::Config;
pub use error::{Result, TreePasteError};
pub use extractor::{ExtractedText, Extraction, extract};
pub use file_scanner::ListOptions;
pub use tree_model::{CheckState, Entry, EntryId, EntryKind, FileTree, VisibleRow};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
