//! Assembles extracted files into the pasteable Markdown document.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::extractor::{self, Extraction};
use crate::tree_model::FileTree;

pub const DOCUMENT_HEADER: &str = "# Files for analysis\n";
const SECTION_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposeStats {
    pub files: usize,
    pub binary: usize,
    pub truncated: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub stats: ComposeStats,
    /// Character count, set when it exceeds the configured warning threshold
    pub size_warning: Option<usize>,
}

impl Document {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// One-line summary for the status bar / terminal.
    pub fn status_message(&self) -> String {
        let s = &self.stats;
        let mut msg = format!("Copied {} files to clipboard", s.files);
        if s.binary > 0 {
            msg.push_str(&format!(", {} binary files ignored", s.binary));
        }
        if s.truncated > 0 {
            msg.push_str(&format!(", {} files truncated", s.truncated));
        }
        if s.errors > 0 {
            msg.push_str(&format!(", {} errors", s.errors));
        }
        msg
    }

    pub fn size_warning_message(&self) -> Option<String> {
        self.size_warning.map(|chars| {
            format!(
                "The copied content is very large ({:.1}KB). It may not be pasteable in some applications.",
                chars as f64 / 1000.0
            )
        })
    }
}

/// Format one section; the truncation note quotes the limit in KiB.
pub fn format_section(relative: &Path, extraction: &Extraction, max_file_size: u64) -> String {
    let label = relative.display();
    match extraction {
        Extraction::Text(t) => {
            let mut header = format!("## {}", label);
            if t.truncated {
                header.push_str(&format!(
                    " (truncated, showing first {}KB)",
                    max_file_size / 1024
                ));
            }
            format!(
                "{}\n```{}\n{}\n```",
                header,
                t.language.unwrap_or(""),
                t.numbered
            )
        }
        Extraction::Binary => format!("## {}\n*Binary file not included*", label),
        Extraction::Error(msg) => format!("## {}\n*Error: {}*", label, msg),
    }
}

/// Join already extracted files, in the given order, into one document.
pub fn compose(
    sections: &[(PathBuf, Extraction)],
    max_file_size: u64,
    warn_threshold: usize,
) -> Document {
    let mut parts = Vec::with_capacity(sections.len() + 1);
    let mut stats = ComposeStats::default();
    parts.push(DOCUMENT_HEADER.to_string());

    for (relative, extraction) in sections {
        match extraction {
            Extraction::Text(t) => {
                stats.files += 1;
                if t.truncated {
                    stats.truncated += 1;
                }
            }
            Extraction::Binary => stats.binary += 1,
            Extraction::Error(_) => stats.errors += 1,
        }
        parts.push(format_section(relative, extraction, max_file_size));
    }

    let text = parts.join(SECTION_SEPARATOR);
    let chars = text.chars().count();
    let size_warning = (chars > warn_threshold).then_some(chars);
    if size_warning.is_some() {
        warn!("Composed document is {} characters (threshold {})", chars, warn_threshold);
    }
    info!(
        "Composed {} files ({} binary, {} truncated, {} errors)",
        stats.files, stats.binary, stats.truncated, stats.errors
    );

    Document {
        text,
        stats,
        size_warning,
    }
}

/// Extract every checked file of `tree` in selection order and compose.
pub fn compose_selection(tree: &FileTree, config: &Config) -> Document {
    let sections: Vec<(PathBuf, Extraction)> = tree
        .checked_files()
        .into_iter()
        .map(|(id, full)| {
            let extraction = extractor::extract(&full, config.max_file_size);
            (tree.relative_path(id, &config.base_root), extraction)
        })
        .collect();
    compose(&sections, config.max_file_size, config.warn_threshold)
}
