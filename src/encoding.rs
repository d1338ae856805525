//! Text decoding with an ordered fallback chain.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
    Cp1252,
}

/// Candidates in priority order.
pub const CANDIDATES: [Encoding; 3] = [Encoding::Utf8, Encoding::Latin1, Encoding::Cp1252];

// 0x80..=0x9F in windows-1252; `None` marks the five unassigned bytes.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin-1",
            Encoding::Cp1252 => "cp1252",
        }
    }

    /// Decode `bytes`, or `None` if they are not valid in this encoding.
    ///
    /// With `cut_at_end`, the input is known to stop at an arbitrary byte
    /// offset, so an incomplete UTF-8 sequence at the very end is dropped
    /// instead of failing the whole decode.
    pub fn decode(self, bytes: &[u8], cut_at_end: bool) -> Option<String> {
        match self {
            Encoding::Utf8 => match std::str::from_utf8(bytes) {
                Ok(s) => Some(s.to_owned()),
                Err(e) if cut_at_end && e.error_len().is_none() => {
                    let valid = &bytes[..e.valid_up_to()];
                    std::str::from_utf8(valid).ok().map(str::to_owned)
                }
                Err(_) => None,
            },
            Encoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Encoding::Cp1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[usize::from(b - 0x80)],
                    _ => Some(char::from(b)),
                })
                .collect(),
        }
    }
}

/// Try every candidate in order and return the first that decodes.
pub fn decode_first(bytes: &[u8], cut_at_end: bool) -> Option<(Encoding, String)> {
    CANDIDATES
        .iter()
        .find_map(|&enc| enc.decode(bytes, cut_at_end).map(|text| (enc, text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_wins_when_valid() {
        let (enc, text) = decode_first("héllo".as_bytes(), false).unwrap();
        assert_eq!(enc, Encoding::Utf8);
        assert_eq!(text, "héllo");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        let (enc, text) = decode_first(&[b'c', b'a', b'f', 0xE9], false).unwrap();
        assert_eq!(enc, Encoding::Latin1);
        assert_eq!(text, "café");
    }

    #[test]
    fn cut_multibyte_tail_stays_utf8() {
        let bytes = "aé".as_bytes();
        let cut = &bytes[..2];
        let (enc, text) = decode_first(cut, true).unwrap();
        assert_eq!(enc, Encoding::Utf8);
        assert_eq!(text, "a");
        // Without the hint it is not valid UTF-8.
        assert_eq!(Encoding::Utf8.decode(cut, false), None);
    }

    #[test]
    fn cp1252_maps_high_range_and_rejects_holes() {
        assert_eq!(
            Encoding::Cp1252.decode(&[0x80, b'x', 0x99], false).as_deref(),
            Some("€x™")
        );
        assert_eq!(Encoding::Cp1252.decode(&[0x81], false), None);
    }
}
