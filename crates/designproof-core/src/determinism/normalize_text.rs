//! Text normalization for text-based CAD/BIM exchange files.
//!
//! Normalization here is deliberately weak: it removes every whitespace
//! character and nothing else. Two files that differ only in indentation,
//! line endings or spacing normalize to the same bytes; any other difference,
//! including reordered records, does not.
//!
//! Decoding is best-effort UTF-8: invalid byte sequences are dropped rather
//! than rejected. The decode step still returns a `Result` so callers route
//! it through the same fallback as a failed text load.

use crate::errors::DesignProofResult;

/// Decode bytes as UTF-8, dropping invalid sequences.
///
/// A UTF-16 byte order mark is not special: `FF FE` / `FE FF` are invalid
/// UTF-8 and are dropped like any other undecodable byte.
pub fn decode_text(bytes: &[u8]) -> DesignProofResult<String> {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    Ok(out)
}

/// Whitespace as text-mode string splitting sees it: Unicode `White_Space`
/// plus the ASCII information separators U+001C..=U+001F.
pub fn is_separator_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Remove every whitespace character.
pub fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !is_separator_whitespace(*c)).collect()
}

/// Convert CRLF and lone CR to LF.
pub fn translate_newlines(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

/// Decode and strip in one step, returning the UTF-8 bytes that get hashed.
pub fn normalize_cad_text(bytes: &[u8]) -> DesignProofResult<Vec<u8>> {
    let text = decode_text(bytes)?;
    Ok(strip_whitespace(&text).into_bytes())
}
