//! Escape scheme for the 7 raw bytes of a title cell.
//!
//! Printable ASCII except backslash passes through, backslash doubles, every
//! other byte value becomes `\xx` with two hex digits. `unescape` is the
//! exact inverse and rejects malformed input instead of guessing.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TextError {
    #[error("Invalid escape sequence \"\\{0}\"")]
    InvalidEscape(String),

    #[error("Input terminated in the middle of an escape sequence")]
    UnterminatedEscape,

    #[error("Character {0:?} must be written as an escape sequence")]
    InvalidCharacter(char),
}

/// Substitute byte for code points that do not fit in a single byte.
const FALLBACK_BYTE: u8 = b'?';

pub fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{b:02x}")),
        }
    }
    out
}

/// Escapes text that is already held as a string, mapping every code point
/// above 0xFF to a fixed fallback byte.
pub fn escape_text(text: &str) -> String {
    let bytes: Vec<u8> = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(FALLBACK_BYTE))
        .collect();
    escape(&bytes)
}

pub fn unescape(text: &str) -> Result<Vec<u8>, TextError> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            match c {
                '\x20'..='\x7e' => out.push(c as u8),
                other => return Err(TextError::InvalidCharacter(other)),
            }
            continue;
        }

        match chars.next() {
            None => return Err(TextError::UnterminatedEscape),
            Some('\\') => out.push(b'\\'),
            Some(first) => {
                let second = chars.next().ok_or(TextError::UnterminatedEscape)?;
                let seq: String = [first, second].iter().collect();
                let byte = u8::from_str_radix(&seq, 16)
                    .map_err(|_| TextError::InvalidEscape(seq.clone()))?;
                out.push(byte);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_ascii_passes_through() {
        assert_eq!(escape(b"LP: abc"), "LP: abc");
        assert_eq!(unescape("LP: abc").unwrap(), b"LP: abc");
    }

    #[test]
    fn backslash_doubles() {
        assert_eq!(escape(b"a\\b"), "a\\\\b");
        assert_eq!(unescape("a\\\\b").unwrap(), b"a\\b");
    }

    #[test]
    fn non_printable_bytes_become_hex_escapes() {
        assert_eq!(escape(&[0x00, 0x1f, 0xff]), "\\00\\1f\\ff");
        assert_eq!(unescape("\\00\\1f\\ff").unwrap(), vec![0x00, 0x1f, 0xff]);
    }

    #[test]
    fn round_trips_mixed_input() {
        // Backslash, a control byte and a non-ASCII byte in one title.
        let title = [b'A', b'\\', 0x07, 0xc3, b' ', b'z', 0x7f];
        assert_eq!(unescape(&escape(&title)).unwrap(), title);
    }

    #[test]
    fn round_trips_every_byte_value() {
        let all: Vec<u8> = (0..=255).collect();
        assert_eq!(unescape(&escape(&all)).unwrap(), all);
    }

    #[test]
    fn wide_code_points_fall_back() {
        assert_eq!(escape_text("a\u{266b}"), "a?");
    }

    #[test]
    fn rejects_unterminated_escape() {
        assert_eq!(unescape("abc\\"), Err(TextError::UnterminatedEscape));
        assert_eq!(unescape("abc\\f"), Err(TextError::UnterminatedEscape));
    }

    #[test]
    fn rejects_invalid_escape_body() {
        assert_eq!(
            unescape("\\zz"),
            Err(TextError::InvalidEscape("zz".to_string()))
        );
    }

    #[test]
    fn rejects_raw_control_characters() {
        assert_eq!(unescape("a\tb"), Err(TextError::InvalidCharacter('\t')));
    }
}
