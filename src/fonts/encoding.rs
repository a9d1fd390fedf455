//! WinAnsi encoding for the built-in standard font.
//!
//! Helvetica is written as a simple font with `/WinAnsiEncoding`, so text
//! drawn with it must be converted to single WinAnsi bytes. Characters outside
//! the encoding make the line unencodable and trigger the fallback chain.

/// Map a Unicode codepoint to its WinAnsi (Windows-1252) byte.
///
/// 0x00-0x7F and 0xA0-0xFF map directly; the 0x80-0x9F range differs from
/// Latin-1 and is looked up explicitly.
pub fn unicode_to_winansi(codepoint: u32) -> Option<u8> {
    if codepoint < 0x80 || (0xA0..=0xFF).contains(&codepoint) {
        return Some(codepoint as u8);
    }

    match codepoint {
        0x20AC => Some(0x80), // Euro sign
        0x201A => Some(0x82), // Single low-9 quotation mark
        0x0192 => Some(0x83), // Latin small letter f with hook
        0x201E => Some(0x84), // Double low-9 quotation mark
        0x2026 => Some(0x85), // Horizontal ellipsis
        0x2020 => Some(0x86), // Dagger
        0x2021 => Some(0x87), // Double dagger
        0x02C6 => Some(0x88), // Modifier letter circumflex accent
        0x2030 => Some(0x89), // Per mille sign
        0x0160 => Some(0x8A), // Latin capital letter S with caron
        0x2039 => Some(0x8B), // Single left-pointing angle quotation mark
        0x0152 => Some(0x8C), // Latin capital ligature OE
        0x017D => Some(0x8E), // Latin capital letter Z with caron
        0x2018 => Some(0x91), // Left single quotation mark
        0x2019 => Some(0x92), // Right single quotation mark
        0x201C => Some(0x93), // Left double quotation mark
        0x201D => Some(0x94), // Right double quotation mark
        0x2022 => Some(0x95), // Bullet
        0x2013 => Some(0x96), // En dash
        0x2014 => Some(0x97), // Em dash
        0x02DC => Some(0x98), // Small tilde
        0x2122 => Some(0x99), // Trade mark sign
        0x0161 => Some(0x9A), // Latin small letter s with caron
        0x203A => Some(0x9B), // Single right-pointing angle quotation mark
        0x0153 => Some(0x9C), // Latin small ligature oe
        0x017E => Some(0x9E), // Latin small letter z with caron
        0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
        _ => None,
    }
}

/// Whether `ch` can be drawn with the standard font.
///
/// Control characters other than tab have no glyph and count as unencodable.
pub fn is_winansi_char(ch: char) -> bool {
    if ch.is_control() && ch != '\t' {
        return false;
    }
    unicode_to_winansi(ch as u32).is_some()
}

/// Encode `text` as WinAnsi bytes, `None` if any character has no mapping.
pub fn encode_winansi(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|ch| {
            if is_winansi_char(ch) {
                unicode_to_winansi(ch as u32)
            } else {
                None
            }
        })
        .collect()
}

/// Replace every non-ASCII character (and ASCII control other than tab) with `?`.
///
/// This is the last resort for lines no available font can encode; the
/// result is always encodable with the standard font.
pub fn sanitize_to_ascii(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c == '\t' || (c.is_ascii() && !c.is_ascii_control()) {
                c
            } else {
                '?'
            }
        })
        .collect()
}

/// Escape a byte for a PDF literal string.
fn escape_byte_for_literal(b: u8, out: &mut String) {
    match b {
        b'(' => out.push_str("\\("),
        b')' => out.push_str("\\)"),
        b'\\' => out.push_str("\\\\"),
        0x0A => out.push_str("\\n"),
        0x0D => out.push_str("\\r"),
        0x09 => out.push_str("\\t"),
        0x08 => out.push_str("\\b"),
        0x0C => out.push_str("\\f"),
        b if (0x20..0x7F).contains(&b) => out.push(b as char),
        b => out.push_str(&format!("\\{:03o}", b)),
    }
}

/// Encode bytes as PDF literal string with proper escaping.
pub fn encode_bytes_as_literal(bytes: &[u8]) -> String {
    let mut result = String::with_capacity(bytes.len() * 2 + 2);
    result.push('(');
    for &b in bytes {
        escape_byte_for_literal(b, &mut result);
    }
    result.push(')');
    result
}
