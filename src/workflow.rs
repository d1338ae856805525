use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::composer::{self, Document};
use crate::config::Config;
use crate::tree_model::FileTree;
use crate::{cli, tui, utils};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// How a run ended; `main` maps this to the exit code.
#[derive(Debug)]
pub enum Outcome {
    /// Document handed to the clipboard sink.
    Copied(Document),
    /// Document printed to stdout (`--dry-run`).
    Printed(Document),
    Cancelled,
    NothingSelected,
}

// Canonical form keeps relative section paths stable whatever DIR looked like.
fn resolve_root(root: &Path) -> PathBuf {
    root.canonicalize().unwrap_or_else(|_| root.to_path_buf())
}

// Handles the --all (headless) mode: whole tree loaded and every entry checked.
fn run_headless_mode(root: &Path, config: &Config) -> Result<FileTree> {
    let mut tree = FileTree::open_root(root, &config.list_options(), false)
        .with_context(|| format!("Cannot open {}", root.display()))?;
    tree.select_all();
    info!("Headless mode selected {} entries", tree.checked_count());
    Ok(tree)
}

// Handles interactive TUI mode. The TUI may change the filter or size limit,
// so the edited config comes back with the tree.
fn run_interactive_mode(root: &Path, config: Config) -> Result<Option<(FileTree, Config)>> {
    let tree = FileTree::open_root(root, &config.list_options(), config.lazy_mode)
        .with_context(|| format!("Cannot open {}", root.display()))?;
    tui::run_tui(tree, config)
}

// Performs the final action: printing for dry-run or copying to the sink.
fn perform_final_action(
    document: &Document,
    is_dry_run: bool,
    sink: &mut dyn ClipboardSink,
) -> Result<()> {
    let tokens = utils::approx_tokens(&document.text);
    if is_dry_run {
        println!("{}", document.text);
        println!(
            "(Dry run: Would copy {} files (≈ {} tokens). Clipboard not affected.)",
            document.stats.files, tokens
        );
    } else {
        sink.copy_text(&document.text)
            .context("Failed to copy to the clipboard")?;
        println!("✅ {} (≈ {} tokens)", document.status_message(), tokens);
    }

    if let Some(message) = document.size_warning_message() {
        warn!("{}", message);
        eprintln!("⚠️ Warning: {}", message);
    }
    Ok(())
}

/// Compose every checked file of `tree` and deliver the document.
pub fn yank_selection(
    tree: &FileTree,
    config: &Config,
    is_dry_run: bool,
    sink: &mut dyn ClipboardSink,
) -> Result<Outcome> {
    if tree.checked_files().is_empty() {
        return Ok(Outcome::NothingSelected);
    }

    let document = composer::compose_selection(tree, config);
    perform_final_action(&document, is_dry_run, sink)?;
    Ok(if is_dry_run {
        Outcome::Printed(document)
    } else {
        Outcome::Copied(document)
    })
}

// Main orchestrator for the treepaste application logic.
pub fn run_treepaste(cli_args: cli::Cli) -> Result<Outcome> {
    let root = resolve_root(&cli_args.root);
    let config = cli_args.to_config(root.clone())?;

    let (tree, config) = if cli_args.all {
        (run_headless_mode(&root, &config)?, config)
    } else {
        match run_interactive_mode(&root, config)? {
            Some(result) => result,
            None => {
                println!("Selection cancelled. Exiting.");
                return Ok(Outcome::Cancelled);
            }
        }
    };

    let outcome = yank_selection(&tree, &config, cli_args.dry_run, &mut SystemClipboard)?;
    if matches!(outcome, Outcome::NothingSelected) {
        println!("No files selected to copy.");
    }
    Ok(outcome)
}
