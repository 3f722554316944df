//! Character decoding and Windows-1252 repair.
//!
//! EDGAR filings from the 1990s and 2000s are frequently Windows-1252 or
//! Latin-1 rather than UTF-8, and text that went through a Latin-1 decoder
//! ends up with C1 control characters where smart quotes and dashes used to
//! be. This module decodes raw filing lines and maps those "gremlins" back to
//! the characters they were meant to be.

use std::borrow::Cow;

use encoding_rs::WINDOWS_1252;

/// Windows-1252 glyphs for bytes 0x80..=0x9F. Slots undefined in the code
/// page decode to U+FFFD.
const CP1252_C1: [char; 32] = [
    '\u{20AC}', '\u{FFFD}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{FFFD}', '\u{017D}', '\u{FFFD}',
    '\u{FFFD}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{FFFD}', '\u{017E}', '\u{0178}',
];

/// Decode one raw line of a filing.
///
/// Valid UTF-8 passes through; anything else is decoded as Windows-1252,
/// which never fails.
///
/// # Examples
///
/// ```
/// use earnings_corpus::encoding::decode_line;
///
/// assert_eq!(decode_line(b"Caf\xC3\xA9"), "Café");
/// assert_eq!(decode_line(b"Caf\xE9"), "Café");
/// ```
#[must_use]
pub fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (decoded, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
            repair_gremlins(&decoded).into_owned()
        }
    }
}

/// Map C1 control characters (U+0080..=U+009F) to their Windows-1252 glyphs.
///
/// Returns the input borrowed when there is nothing to repair.
///
/// # Examples
///
/// ```
/// use earnings_corpus::encoding::repair_gremlins;
///
/// assert_eq!(repair_gremlins("\u{93}quoted\u{94}"), "\u{201C}quoted\u{201D}");
/// assert_eq!(repair_gremlins("plain"), "plain");
/// ```
#[must_use]
pub fn repair_gremlins(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_gremlin) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.chars()
            .map(|c| {
                if is_gremlin(c) {
                    CP1252_C1[c as usize - 0x80]
                } else {
                    c
                }
            })
            .collect(),
    )
}

fn is_gremlin(c: char) -> bool {
    ('\u{80}'..='\u{9F}').contains(&c)
}
