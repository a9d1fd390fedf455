//! TrueType/OpenType font parser for PDF embedding.
//!
//! This module wraps the `ttf-parser` crate to extract what a Type0
//! (Identity-H) font needs: the Unicode to glyph mapping, advance widths,
//! descriptor metrics and glyph outlines for the vector text fallback.

use std::collections::HashMap;

use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::model::DescriptorFlags;

/// Error types for TrueType font parsing.
#[derive(Debug, thiserror::Error)]
pub enum TrueTypeError {
    /// Failed to parse font file
    #[error("Failed to parse font file: {0}")]
    ParseError(String),

    /// Font file is empty or invalid
    #[error("Font file is empty or invalid")]
    EmptyFont,

    /// Font has no Unicode cmap subtable
    #[error("Font has no Unicode character map")]
    NoUnicodeCmap,
}

/// Result type for TrueType operations.
pub type TrueTypeResult<T> = Result<T, TrueTypeError>;

/// Parsed TrueType font data for PDF embedding.
#[derive(Debug)]
pub struct TrueTypeFont<'a> {
    /// The parsed font face
    face: Face<'a>,
    /// Original font data (needed for embedding)
    data: &'a [u8],
    /// Cached Unicode to glyph ID mapping
    unicode_to_glyph: HashMap<u32, u16>,
}

impl<'a> TrueTypeFont<'a> {
    /// Parse a TrueType/OpenType font from raw data.
    pub fn parse(data: &'a [u8]) -> TrueTypeResult<Self> {
        if data.is_empty() {
            return Err(TrueTypeError::EmptyFont);
        }

        let face = Face::parse(data, 0).map_err(|e| TrueTypeError::ParseError(e.to_string()))?;

        let mut font = Self {
            face,
            data,
            unicode_to_glyph: HashMap::new(),
        };

        font.build_unicode_map()?;

        Ok(font)
    }

    /// Build Unicode to glyph ID mapping from the Unicode cmap subtables.
    fn build_unicode_map(&mut self) -> TrueTypeResult<()> {
        let cmap = self.face.tables().cmap.ok_or(TrueTypeError::NoUnicodeCmap)?;
        let mut map = HashMap::new();
        for subtable in cmap.subtables.into_iter().filter(|s| s.is_unicode()) {
            subtable.codepoints(|codepoint| {
                if let Some(glyph) = subtable.glyph_index(codepoint) {
                    if glyph.0 != 0 {
                        map.entry(codepoint).or_insert(glyph.0);
                    }
                }
            });
        }
        if map.is_empty() {
            return Err(TrueTypeError::NoUnicodeCmap);
        }
        self.unicode_to_glyph = map;
        Ok(())
    }

    /// Get the font's PostScript name.
    pub fn postscript_name(&self) -> Option<String> {
        self.face
            .names()
            .into_iter()
            .find(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .and_then(|name| name.to_string())
    }

    /// Get units per em for this font.
    pub fn units_per_em(&self) -> u16 {
        self.face.units_per_em()
    }

    /// Check if the font is bold.
    pub fn is_bold(&self) -> bool {
        self.face.is_bold()
    }

    /// Check if the font is italic.
    pub fn is_italic(&self) -> bool {
        self.face.is_italic()
    }

    /// Whether the outlines are CFF (OpenType `CFF ` table) rather than `glyf`.
    pub fn has_cff_outlines(&self) -> bool {
        self.face.tables().cff.is_some()
    }

    /// Get glyph ID for a Unicode codepoint.
    pub fn glyph_id(&self, codepoint: u32) -> Option<u16> {
        self.unicode_to_glyph.get(&codepoint).copied()
    }

    /// Get glyph width in 1/1000 em units.
    pub fn glyph_width(&self, glyph_id: u16) -> u16 {
        let units_per_em = self.units_per_em().max(1) as u32;
        self.face
            .glyph_hor_advance(GlyphId(glyph_id))
            .map(|advance| (advance as u32 * 1000 / units_per_em) as u16)
            .unwrap_or(500)
    }

    /// Unicode to glyph mapping.
    pub fn unicode_map(&self) -> &HashMap<u32, u16> {
        &self.unicode_to_glyph
    }

    /// Get the raw font data for embedding.
    pub fn raw_data(&self) -> &[u8] {
        self.data
    }

    /// Calculate StemV (vertical stem width) - estimated from font weight.
    ///
    /// This is a heuristic since TrueType doesn't store StemV directly.
    pub fn stem_v(&self) -> i16 {
        if self.is_bold() {
            140
        } else {
            80
        }
    }

    /// Get font flags for PDF FontDescriptor.
    pub fn font_flags(&self) -> DescriptorFlags {
        let mut flags = DescriptorFlags::NONSYMBOLIC;
        if self.face.is_monospaced() {
            flags |= DescriptorFlags::FIXED_PITCH;
        }
        if self.is_italic() {
            flags |= DescriptorFlags::ITALIC;
        }
        flags
    }

    /// Emit the outline of `glyph_id` into `builder`; `false` when the glyph has none.
    pub fn outline_glyph(&self, glyph_id: u16, builder: &mut dyn OutlineBuilder) -> bool {
        self.face.outline_glyph(GlyphId(glyph_id), builder).is_some()
    }

    /// Horizontal advance in font units.
    pub fn advance(&self, glyph_id: u16) -> u16 {
        self.face.glyph_hor_advance(GlyphId(glyph_id)).unwrap_or(0)
    }
}

/// Font metrics extracted for PDF FontDescriptor.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// PostScript name
    pub name: String,
    /// Units per em
    pub units_per_em: u16,
    /// Ascender (positive)
    pub ascender: i16,
    /// Descender (negative)
    pub descender: i16,
    /// Cap height
    pub cap_height: i16,
    /// Italic angle
    pub italic_angle: f32,
    /// Bounding box (llx, lly, urx, ury)
    pub bbox: (i16, i16, i16, i16),
    /// Stem V (vertical stem width)
    pub stem_v: i16,
    /// Font flags
    pub flags: DescriptorFlags,
}

impl FontMetrics {
    /// Extract metrics from a parsed TrueType font.
    pub fn from_font(font: &TrueTypeFont) -> Self {
        let bbox = font.face.global_bounding_box();
        Self {
            name: font
                .postscript_name()
                .unwrap_or_else(|| "Unknown".to_string()),
            units_per_em: font.units_per_em(),
            ascender: font.face.ascender(),
            descender: font.face.descender(),
            cap_height: font.face.capital_height().unwrap_or(font.face.ascender()),
            italic_angle: font.face.italic_angle().unwrap_or(0.0),
            bbox: (bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max),
            stem_v: font.stem_v(),
            flags: font.font_flags(),
        }
    }

    /// Convert a value from font units to PDF units (1/1000 em).
    pub fn to_pdf_units(&self, value: i16) -> i32 {
        (value as i32 * 1000) / self.units_per_em.max(1) as i32
    }

    /// Get ascender in PDF units.
    pub fn pdf_ascender(&self) -> i32 {
        self.to_pdf_units(self.ascender)
    }

    /// Get descender in PDF units.
    pub fn pdf_descender(&self) -> i32 {
        self.to_pdf_units(self.descender)
    }

    /// Get cap height in PDF units.
    pub fn pdf_cap_height(&self) -> i32 {
        self.to_pdf_units(self.cap_height)
    }

    /// Get bounding box in PDF units.
    pub fn pdf_bbox(&self) -> (i32, i32, i32, i32) {
        (
            self.to_pdf_units(self.bbox.0),
            self.to_pdf_units(self.bbox.1),
            self.to_pdf_units(self.bbox.2),
            self.to_pdf_units(self.bbox.3),
        )
    }
}
