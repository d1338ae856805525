use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::{debug, warn};

use crate::encoding::{self, Encoding};
use crate::language;

/// Bytes inspected for NUL when deciding whether a file is binary.
pub const SNIFF_LEN: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Decoded content as read, before numbering
    pub text: String,
    /// `text` with every line prefixed by `"{n}: "`
    pub numbered: String,
    pub language: Option<&'static str>,
    pub encoding: Encoding,
    pub truncated: bool,
    /// Raw bytes taken from the file; exactly the size limit when truncated,
    /// even if `text` lost a split UTF-8 sequence at the cut
    pub bytes_read: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Text(ExtractedText),
    Binary,
    Error(String),
}

/// Read one file for the document. Never fails: every problem comes back as
/// [`Extraction::Error`].
pub fn extract(path: &Path, max_file_size: u64) -> Extraction {
    match read_and_decode(path, max_file_size) {
        Ok(extraction) => {
            match &extraction {
                Extraction::Text(t) => debug!(
                    "Read {} as {} ({} bytes, truncated={})",
                    path.display(),
                    t.encoding.name(),
                    t.text.len(),
                    t.truncated
                ),
                Extraction::Binary => debug!("Skipping binary {}", path.display()),
                Extraction::Error(msg) => warn!("Cannot decode {}: {}", path.display(), msg),
            }
            extraction
        }
        Err(e) => {
            warn!("Cannot read {}: {}", path.display(), e);
            Extraction::Error(e.to_string())
        }
    }
}

// The file handle is owned by this function and dropped on every return.
fn read_and_decode(path: &Path, max_file_size: u64) -> io::Result<Extraction> {
    let mut file = File::open(path)?;

    let mut bytes = Vec::with_capacity(SNIFF_LEN);
    file.by_ref().take(SNIFF_LEN as u64).read_to_end(&mut bytes)?;
    if bytes.contains(&0) {
        return Ok(Extraction::Binary);
    }

    let truncated = file.metadata()?.len() > max_file_size;
    if truncated {
        let remaining = max_file_size.saturating_sub(bytes.len() as u64);
        file.by_ref().take(remaining).read_to_end(&mut bytes)?;
        bytes.truncate(usize::try_from(max_file_size).unwrap_or(usize::MAX));
    } else {
        file.read_to_end(&mut bytes)?;
    }
    drop(file);

    let Some((encoding, text)) = encoding::decode_first(&bytes, truncated) else {
        let tried: Vec<&str> = encoding::CANDIDATES.iter().map(|e| e.name()).collect();
        return Ok(Extraction::Error(format!(
            "could not decode as {}",
            tried.join(", ")
        )));
    };

    Ok(Extraction::Text(ExtractedText {
        numbered: number_lines(&text),
        language: language::language_for(path),
        encoding,
        truncated,
        bytes_read: bytes.len() as u64,
        text,
    }))
}

/// Split on `\n`, `\r\n` or a lone `\r`. A trailing terminator does not
/// start an extra empty line.
///
/// Other Unicode separators (form feed, vertical tab, `U+0085`, `U+2028`,
/// `U+2029` and friends) stay inside their line, so they never shift the
/// line numbers.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

pub fn number_lines(text: &str) -> String {
    split_lines(text)
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn numbers_lines_from_one() {
        assert_eq!(number_lines("a\nb\n"), "1: a\n2: b");
        assert_eq!(number_lines("a\r\n\r\nb\rc"), "1: a\n2: \n3: b\n4: c");
        assert_eq!(number_lines(""), "");
    }

    #[test]
    fn null_byte_in_first_kilobyte_means_binary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut content = vec![b'a'; 1023];
        content.push(0);
        content.extend_from_slice(&[b'b'; 4096]);
        fs::write(&path, &content).unwrap();
        assert_eq!(extract(&path, 1024 * 1024), Extraction::Binary);
    }

    #[test]
    fn null_byte_after_sniff_window_is_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("late.txt");
        let mut content = vec![b'a'; 1024];
        content.push(0);
        fs::write(&path, &content).unwrap();
        assert!(matches!(extract(&path, 1024 * 1024), Extraction::Text(_)));
    }

    #[test]
    fn oversized_file_is_cut_to_exactly_the_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.py");
        let limit = 10 * 1024;
        let line = "print('x')\n";
        let content: String = line.repeat(limit as usize / line.len() + 2);
        fs::write(&path, &content.as_bytes()[..limit as usize + 1]).unwrap();

        match extract(&path, limit) {
            Extraction::Text(t) => {
                assert!(t.truncated);
                assert_eq!(t.text.len(), limit as usize);
                assert_eq!(t.bytes_read, limit);
                assert_eq!(t.language, Some("python"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn multibyte_cut_still_reads_exactly_the_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("euro.txt");
        let limit: u64 = 10 * 1024;
        // 3-byte chars: 10240 is not a multiple of 3, so the cut splits one
        let content = "€".repeat(limit as usize / 3 + 1);
        fs::write(&path, &content.as_bytes()[..limit as usize + 1]).unwrap();

        match extract(&path, limit) {
            Extraction::Text(t) => {
                assert!(t.truncated);
                assert_eq!(t.encoding, Encoding::Utf8);
                assert_eq!(t.bytes_read, limit);
                assert_eq!(t.text.len(), 10239);
                assert!(t.text.chars().all(|c| c == '€'));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn only_newline_style_separators_split_lines() {
        assert_eq!(split_lines("a\x0cb\u{2028}c\nd"), vec!["a\x0cb\u{2028}c", "d"]);
    }

    #[test]
    fn file_at_the_limit_is_not_truncated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("exact.txt");
        fs::write(&path, vec![b'z'; 10 * 1024]).unwrap();
        match extract(&path, 10 * 1024) {
            Extraction::Text(t) => {
                assert!(!t.truncated);
                assert_eq!(t.text.len(), 10 * 1024);
                assert_eq!(t.bytes_read, 10 * 1024);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn latin1_content_is_decoded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.txt");
        fs::write(&path, [b'n', 0xE4, b'h', b'\n']).unwrap();
        match extract(&path, 1024 * 1024) {
            Extraction::Text(t) => {
                assert_eq!(t.encoding, Encoding::Latin1);
                assert_eq!(t.numbered, "1: näh");
                assert_eq!(t.language, Some("text"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unreadable_path_is_an_error_outcome() {
        let dir = tempdir().unwrap();
        let outcome = extract(&dir.path().join("missing.rs"), 1024);
        assert!(matches!(outcome, Extraction::Error(_)));
        // A directory cannot be read as a file either.
        assert!(matches!(extract(dir.path(), 1024), Extraction::Error(_)));
    }
}
