//! Helpers over structural font descriptors.
//!
//! Name normalization, payload selection, CSS family naming and the
//! weight/style heuristics used by both the layout builder and the editor.

use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{DescriptorFlags, FontDescriptor, FontWeight};

lazy_static! {
    /// Subset tag: six uppercase letters and a plus sign
    static ref RE_SUBSET_PREFIX: Regex = Regex::new(r"^[A-Z]{6}\+(.+)$").unwrap();

    static ref RE_WEIGHT_BLACK: Regex =
        Regex::new(r"black|heavy|ultra|extra\s*bold|extrabold").unwrap();

    static ref RE_WEIGHT_BOLD: Regex = Regex::new(r"bold|demi|semi[-\s]?bold|medium").unwrap();

    static ref RE_WEIGHT_LIGHT: Regex = Regex::new(r"light|thin|hairline").unwrap();

    static ref RE_ITALIC_NAME: Regex = Regex::new(r"(?i)italic|oblique").unwrap();

    /// Characters not allowed in a generated family name
    static ref RE_FAMILY_STRIP: Regex = Regex::new(r"[^A-Za-z0-9_-]").unwrap();
}

/// Generic serif stack.
pub const SERIF_STACK: &str = "\"Times New Roman\", Times, serif";
/// Generic sans-serif stack.
pub const SANS_STACK: &str = "Arial, Helvetica, sans-serif";
/// Generic monospace stack.
pub const MONO_STACK: &str = "\"Courier New\", Courier, monospace";
/// Inherit the family from the surrounding context.
pub const INHERIT: &str = "inherit";

/// Remove a `ABCDEF+` subset tag from a PostScript name.
///
/// # Examples
///
/// ```
/// use pdf_overlay::fonts::strip_subset_prefix;
///
/// assert_eq!(strip_subset_prefix("ABCDEF+Arial-Bold"), "Arial-Bold");
/// assert_eq!(strip_subset_prefix("abcdef+Arial"), "abcdef+Arial");
/// assert_eq!(strip_subset_prefix("Helvetica"), "Helvetica");
/// ```
pub fn strip_subset_prefix(name: &str) -> &str {
    match RE_SUBSET_PREFIX.captures(name).and_then(|c| c.get(1)) {
        Some(m) => m.as_str(),
        None => name,
    }
}

fn stripped_lower(base_name: Option<&str>) -> Option<String> {
    base_name
        .map(strip_subset_prefix)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// Font program formats understood by the display environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFormat {
    /// WOFF 2.0
    Woff2,
    /// WOFF 1.0
    Woff,
    /// OpenType (CFF outlines)
    OpenType,
    /// TrueType (glyf outlines)
    TrueType,
}

impl FontFormat {
    /// CSS `format()` hint.
    pub fn css_name(&self) -> &'static str {
        match self {
            FontFormat::Woff2 => "woff2",
            FontFormat::Woff => "woff",
            FontFormat::OpenType => "opentype",
            FontFormat::TrueType => "truetype",
        }
    }
}

/// Infer a [`FontFormat`] from a free-form hint by substring.
pub fn normalize_font_format(format: Option<&str>) -> Option<FontFormat> {
    let lower = format?.to_lowercase();
    if lower.contains("woff2") {
        Some(FontFormat::Woff2)
    } else if lower.contains("woff") {
        Some(FontFormat::Woff)
    } else if lower.contains("otf") || lower.contains("opentype") {
        Some(FontFormat::OpenType)
    } else if lower.contains("ttf") || lower.contains("truetype") {
        Some(FontFormat::TrueType)
    } else {
        None
    }
}

/// One embedded font program: base64 data plus a format hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontPayload<'a> {
    /// Base64-encoded program
    pub data: &'a str,
    /// Raw format hint
    pub format: Option<&'a str>,
}

impl FontPayload<'_> {
    /// Normalized format.
    pub fn format(&self) -> Option<FontFormat> {
        normalize_font_format(self.format)
    }

    /// Decode the base64 program.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.trim())
            .map_err(|e| Error::Font(format!("invalid base64 font program: {}", e)))
    }
}

/// Pick the first non-empty payload: web-optimized, PDF-native, then generic.
pub fn pick_font_payload(font: &FontDescriptor) -> Option<FontPayload<'_>> {
    [
        (&font.web_program, &font.web_program_format),
        (&font.pdf_program, &font.pdf_program_format),
        (&font.program, &font.program_format),
    ]
    .into_iter()
    .find_map(|(data, format)| {
        let data = data.as_deref().filter(|d| !d.is_empty())?;
        Some(FontPayload {
            data,
            format: format.as_deref(),
        })
    })
}

/// Deterministic CSS family name for a registered font.
///
/// # Examples
///
/// ```
/// use pdf_overlay::fonts::build_font_family_name;
/// use pdf_overlay::model::FontDescriptor;
///
/// let font = FontDescriptor {
///     base_name: Some("ABCDEF+Open Sans,Bold".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(build_font_family_name(&font), "pdf-font-OpenSansBold");
/// ```
pub fn build_font_family_name(font: &FontDescriptor) -> String {
    let seed = font
        .base_name
        .as_deref()
        .map(strip_subset_prefix)
        .filter(|s| !s.is_empty())
        .or_else(|| font.uid.as_deref().filter(|s| !s.is_empty()))
        .or_else(|| font.id.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or("pdf-font");
    format!("pdf-font-{}", RE_FAMILY_STRIP.replace_all(seed, ""))
}

/// Guess a generic CSS stack from a base font name.
pub fn guess_font_stack(base_name: Option<&str>) -> &'static str {
    let Some(name) = stripped_lower(base_name) else {
        return INHERIT;
    };
    if name.contains("times") {
        SERIF_STACK
    } else if name.contains("helvetica") || name.contains("arial") {
        SANS_STACK
    } else if name.contains("courier") || name.contains("mono") {
        MONO_STACK
    } else if name.contains("serif") {
        SERIF_STACK
    } else if name.contains("sans") {
        SANS_STACK
    } else {
        INHERIT
    }
}

/// Guess a numeric weight from a base font name.
///
/// # Examples
///
/// ```
/// use pdf_overlay::fonts::guess_font_weight;
/// use pdf_overlay::model::FontWeight;
///
/// assert_eq!(guess_font_weight(Some("Roboto-Black")), Some(FontWeight::Numeric(900)));
/// assert_eq!(guess_font_weight(Some("XYZABC+Inter-SemiBold")), Some(FontWeight::Numeric(700)));
/// assert_eq!(guess_font_weight(Some("Lato-Hairline")), Some(FontWeight::Numeric(300)));
/// assert_eq!(guess_font_weight(Some("Georgia")), None);
/// ```
pub fn guess_font_weight(base_name: Option<&str>) -> Option<FontWeight> {
    let name = stripped_lower(base_name)?;
    if RE_WEIGHT_BLACK.is_match(&name) {
        Some(FontWeight::Numeric(900))
    } else if RE_WEIGHT_BOLD.is_match(&name) {
        Some(FontWeight::Numeric(700))
    } else if RE_WEIGHT_LIGHT.is_match(&name) {
        Some(FontWeight::Numeric(300))
    } else {
        None
    }
}

/// Whether an optional weight renders as bold.
pub fn is_bold_weight(weight: Option<&FontWeight>) -> bool {
    weight.map(FontWeight::is_bold).unwrap_or(false)
}

/// Whether a font has an italic face available.
///
/// True when the stripped name mentions italic/oblique, the italic angle is
/// non-zero, or the italic descriptor flag is set.
pub fn font_supports_italic(font: Option<&FontDescriptor>) -> bool {
    let Some(font) = font else {
        return false;
    };
    let name = font.base_name.as_deref().map(strip_subset_prefix).unwrap_or("");
    if RE_ITALIC_NAME.is_match(name) {
        return true;
    }
    if font.italic_angle.map(|a| a.abs() > 0.01).unwrap_or(false) {
        return true;
    }
    font.flags().contains(DescriptorFlags::ITALIC)
}

/// Find the descriptor for a text box's font reference.
///
/// Matches `id`, `uid` or `page:id` against `font_id` first, then the stripped
/// base name against the stripped `base_font`.
pub fn find_font_meta<'a>(
    fonts: &'a [FontDescriptor],
    font_id: Option<&str>,
    base_font: Option<&str>,
) -> Option<&'a FontDescriptor> {
    let by_id = font_id.and_then(|target| {
        fonts.iter().find(|f| {
            f.id.as_deref() == Some(target)
                || f.uid.as_deref() == Some(target)
                || f.scoped_key().as_deref() == Some(target)
        })
    });
    by_id.or_else(|| {
        let target = strip_subset_prefix(base_font?);
        fonts
            .iter()
            .find(|f| f.base_name.as_deref().map(strip_subset_prefix) == Some(target))
    })
}
