//! Embedded TrueType/OpenType font for PDF generation.
//!
//! Holds the parsed lookup tables, metrics and glyph usage needed to write a
//! Type0 font with an Identity-H encoding, where each character code in the
//! content stream is a big-endian glyph id.

use std::collections::HashMap;
use std::sync::Arc;

use super::glyph_usage::GlyphUsage;
use super::truetype_parser::{FontMetrics, TrueTypeFont};
use crate::error::Result;
use crate::model::DescriptorFlags;

/// A font program ready to be embedded.
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    /// Font name (PostScript name or user-provided)
    pub name: String,
    /// Raw font data (for embedding)
    font_data: Arc<Vec<u8>>,
    /// Glyphs drawn so far
    usage: GlyphUsage,
    /// Cached glyph lookup (Unicode -> GID)
    glyph_lookup: HashMap<u32, u16>,
    /// Cached glyph widths (GID -> width in 1/1000 em)
    glyph_widths: HashMap<u16, u16>,
    /// Font ascender value
    pub ascender: i32,
    /// Font descender value
    pub descender: i32,
    /// Cap height (height of capital letters)
    pub cap_height: i32,
    /// Font bounding box (llx, lly, urx, ury)
    pub bbox: (i32, i32, i32, i32),
    /// Font flags for PDF
    pub flags: DescriptorFlags,
    /// Stem vertical width
    pub stem_v: i16,
    /// Italic angle in degrees
    pub italic_angle: f32,
    /// Outlines are CFF rather than `glyf`
    pub cff_outlines: bool,
    /// The program is itself a bold face
    pub is_bold: bool,
}

impl EmbeddedFont {
    /// Create an embedded font from raw TTF/OTF data.
    ///
    /// `name` overrides the PostScript name found in the font.
    pub fn from_data(name: Option<String>, data: Arc<Vec<u8>>) -> Result<Self> {
        let font = TrueTypeFont::parse(&data)?;
        let metrics = FontMetrics::from_font(&font);

        let glyph_lookup = font.unicode_map().clone();
        let glyph_widths = glyph_lookup
            .values()
            .map(|&gid| (gid, font.glyph_width(gid)))
            .collect();
        let cff_outlines = font.has_cff_outlines();
        let is_bold = font.is_bold();

        let font_name = name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| metrics.name.clone());

        Ok(Self {
            name: font_name,
            font_data: Arc::clone(&data),
            usage: GlyphUsage::new(),
            glyph_lookup,
            glyph_widths,
            ascender: metrics.pdf_ascender(),
            descender: metrics.pdf_descender(),
            cap_height: metrics.pdf_cap_height(),
            bbox: metrics.pdf_bbox(),
            flags: metrics.flags,
            stem_v: metrics.stem_v,
            italic_angle: metrics.italic_angle,
            cff_outlines,
            is_bold,
        })
    }

    /// Get the glyph ID for a Unicode codepoint.
    pub fn glyph_id(&self, codepoint: u32) -> Option<u16> {
        self.glyph_lookup.get(&codepoint).copied()
    }

    /// Get the width of a glyph in 1/1000 em units.
    pub fn glyph_width(&self, gid: u16) -> u16 {
        self.glyph_widths.get(&gid).copied().unwrap_or(500)
    }

    /// Whether every character of `text` has a glyph in this font.
    pub fn can_encode(&self, text: &str) -> bool {
        text.chars().all(|ch| self.glyph_id(ch as u32).is_some())
    }

    /// Encode a string as Identity-H character codes (two bytes per glyph).
    ///
    /// Characters without a glyph map to `.notdef` (GID 0); callers check
    /// [`can_encode`](Self::can_encode) first.
    pub fn encode_string(&mut self, text: &str) -> Vec<u8> {
        let lookup = &self.glyph_lookup;
        self.usage.use_string(text, |cp| lookup.get(&cp).copied());
        let mut bytes = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let glyph_id = self.glyph_id(ch as u32).unwrap_or(0);
            bytes.extend_from_slice(&glyph_id.to_be_bytes());
        }
        bytes
    }

    /// Get the raw font data for embedding.
    pub fn font_data(&self) -> &[u8] {
        &self.font_data
    }

    /// Check if any text has been drawn with this font.
    pub fn is_used(&self) -> bool {
        !self.usage.is_empty()
    }

    /// CID widths for the `W` entry as `(start_cid, widths)` runs.
    pub fn width_runs(&self) -> Vec<(u16, Vec<u16>)> {
        let glyphs: Vec<u16> = self.usage.used_glyphs().iter().copied().collect();
        let mut runs: Vec<(u16, Vec<u16>)> = Vec::new();

        let mut i = 0;
        while i < glyphs.len() {
            let start = glyphs[i];
            let mut widths = vec![self.glyph_width(start)];

            // Find consecutive glyphs
            while i + 1 < glyphs.len() && glyphs[i + 1] == glyphs[i] + 1 {
                i += 1;
                widths.push(self.glyph_width(glyphs[i]));
            }

            runs.push((start, widths));
            i += 1;
        }

        runs
    }

    /// Generate the ToUnicode CMap for text extraction.
    pub fn generate_tounicode_cmap(&self) -> String {
        let mut cmap = String::new();

        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo <<\n");
        cmap.push_str("  /Registry (Adobe)\n");
        cmap.push_str("  /Ordering (UCS)\n");
        cmap.push_str("  /Supplement 0\n");
        cmap.push_str(">> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        // Write bfchar entries (max 100 per section)
        let mappings = self.usage.glyph_to_unicode();
        for chunk in mappings.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for &(gid, unicode) in chunk {
                if unicode <= 0xFFFF {
                    cmap.push_str(&format!("<{:04X}> <{:04X}>\n", gid, unicode));
                } else {
                    // Supplementary plane - encode as UTF-16 surrogate pair
                    let high = ((unicode - 0x10000) >> 10) + 0xD800;
                    let low = ((unicode - 0x10000) & 0x3FF) + 0xDC00;
                    cmap.push_str(&format!("<{:04X}> <{:04X}{:04X}>\n", gid, high, low));
                }
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");

        cmap
    }
}
