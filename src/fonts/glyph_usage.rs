//! Glyph usage tracking for embedded fonts.
//!
//! The full font program is embedded, but the `W` array and ToUnicode CMap
//! only need to cover glyphs that were actually drawn.

use std::collections::{BTreeSet, HashMap};

/// Tracks which Unicode characters and glyphs a document uses from one font.
#[derive(Debug, Default, Clone)]
pub struct GlyphUsage {
    /// Used Unicode codepoints mapped to their glyph IDs
    used_chars: HashMap<u32, u16>,
    /// Set of used glyph IDs (for width array generation)
    used_glyphs: BTreeSet<u16>,
}

impl GlyphUsage {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a character as used.
    pub fn use_char(&mut self, codepoint: u32, glyph_id: u16) {
        self.used_chars.insert(codepoint, glyph_id);
        self.used_glyphs.insert(glyph_id);
    }

    /// Record every mappable character of `text` as used.
    pub fn use_string(&mut self, text: &str, glyph_lookup: impl Fn(u32) -> Option<u16>) {
        for ch in text.chars() {
            let codepoint = ch as u32;
            if let Some(glyph_id) = glyph_lookup(codepoint) {
                self.use_char(codepoint, glyph_id);
            }
        }
    }

    /// Get the set of used glyph IDs.
    pub fn used_glyphs(&self) -> &BTreeSet<u16> {
        &self.used_glyphs
    }

    /// Get the used character to glyph mapping.
    pub fn used_chars(&self) -> &HashMap<u32, u16> {
        &self.used_chars
    }

    /// Check if any characters have been used.
    pub fn is_empty(&self) -> bool {
        self.used_chars.is_empty()
    }

    /// Used glyphs as `(gid, codepoint)` pairs sorted by glyph id.
    ///
    /// When several codepoints share a glyph the smallest codepoint wins so the
    /// output does not depend on hash order.
    pub fn glyph_to_unicode(&self) -> Vec<(u16, u32)> {
        let mut by_glyph: HashMap<u16, u32> = HashMap::new();
        for (&codepoint, &gid) in &self.used_chars {
            by_glyph
                .entry(gid)
                .and_modify(|cp| *cp = (*cp).min(codepoint))
                .or_insert(codepoint);
        }
        let mut pairs: Vec<(u16, u32)> = by_glyph.into_iter().collect();
        pairs.sort_by_key(|&(gid, _)| gid);
        pairs
    }
}
