use arboard::Clipboard;
#[cfg(target_os = "linux")]
use arboard::SetExtLinux;

use crate::error::Result;

pub const DAEMON_FLAG: &str = "__clipboard_daemon";

/// Destination for a finished document.
pub trait ClipboardSink {
    fn copy_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard through `arboard`.
///
/// On Linux the selection is owned by a detached copy of this executable so
/// the text stays available after we exit.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        copy_text_to_clipboard(text)
    }
}

/// Keeps the last copied text in memory instead of touching the system clipboard.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl ClipboardSink for MemoryClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[cfg(target_os = "linux")]
fn run_daemon_mode() -> Result<()> {
    let text = std::io::read_to_string(std::io::stdin())?;

    let mut clipboard = Clipboard::new()?;
    // `wait()` blocks until another owner takes the selection over.
    clipboard.set().wait().text(text)?;
    Ok(())
}

/// Checks if the DAEMON_FLAG is present in args. If so, runs in daemon mode.
/// Returns Ok(true) if daemon mode was run, Ok(false) otherwise.
pub fn check_and_run_daemon_if_requested() -> Result<bool> {
    if std::env::args().any(|a| a == DAEMON_FLAG) {
        #[cfg(target_os = "linux")]
        {
            run_daemon_mode()?;
            return Ok(true);
        }
        #[cfg(not(target_os = "linux"))]
        {
            tracing::warn!("{} flag used on non-Linux system. Ignoring.", DAEMON_FLAG);
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn copy_text_to_clipboard(text: &str) -> Result<()> {
    #[cfg(not(target_os = "linux"))]
    {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text.to_owned())?;
    }

    #[cfg(target_os = "linux")]
    {
        use std::io::Write;
        use std::process::{Command, Stdio};

        use crate::error::TreePasteError;

        let mut child = Command::new(std::env::current_exe()?)
            .arg(DAEMON_FLAG)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .current_dir("/")
            .spawn()?;

        let Some(mut stdin) = child.stdin.take() else {
            return Err(TreePasteError::Clipboard(
                "failed to get stdin for clipboard daemon".to_string(),
            ));
        };
        stdin.write_all(text.as_bytes())?;
        stdin.flush()?;
        tracing::debug!("Handed {} bytes to clipboard daemon {}", text.len(), child.id());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_keeps_last_text() {
        let mut sink = MemoryClipboard::default();
        sink.copy_text("first").unwrap();
        sink.copy_text("second").unwrap();
        assert_eq!(sink.contents.as_deref(), Some("second"));
    }
}
