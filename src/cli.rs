use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{self, Config};
use crate::error::Result;

/// treepaste – tick files in a directory tree and copy them as one annotated document
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder to open (defaults to CWD)
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Show entries whose name starts with a dot
    #[arg(long)]
    pub show_hidden: bool,

    /// Load the whole tree up front instead of when folders are opened
    #[arg(long)]
    pub eager: bool,

    /// Regex matched against each file's lowercased extension (e.g. "\.py$|\.txt$")
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// Files larger than this many KiB are truncated (10-10240)
    #[arg(long, value_name = "KIB", default_value_t = config::DEFAULT_MAX_FILE_SIZE / 1024)]
    pub max_size_kib: u64,

    /// Warn when the document exceeds this many characters
    #[arg(long, value_name = "CHARS", default_value_t = config::DEFAULT_WARN_THRESHOLD)]
    pub warn_chars: usize,

    /// Run without the TUI: select everything under DIR and copy it
    #[arg(long)]
    pub all: bool,

    /// Print the document to stdout instead of copying it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn setup_logging(&self) {
        let default_level = if self.verbose { "debug" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }

    /// Translate the flags into a validated [`Config`] rooted at `base_root`.
    pub fn to_config(&self, base_root: PathBuf) -> Result<Config> {
        let mut config = Config::new(base_root);
        config.hide_hidden = !self.show_hidden;
        config.lazy_mode = !self.eager;
        config.warn_threshold = self.warn_chars;
        if let Some(pattern) = &self.filter {
            config.set_extension_filter(pattern)?;
        }
        config.set_max_file_size(self.max_size_kib.saturating_mul(1024))?;
        Ok(config)
    }
}
