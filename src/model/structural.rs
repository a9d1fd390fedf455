//! Structural document model produced by the extraction backend.
//!
//! The backend parses an uploaded PDF into pages of positioned text runs and
//! image runs plus a font table. Field names follow the backend's camelCase
//! JSON; unknown fields are ignored and `null` list entries are skipped.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a list that may contain `null` entries, dropping them.
fn skip_nulls<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

/// Immutable snapshot of the backend's extraction of one PDF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralDocument {
    /// Pages in document order
    #[serde(default, deserialize_with = "skip_nulls")]
    pub pages: Vec<StructuralPage>,
    /// Fonts referenced by text elements
    #[serde(default, deserialize_with = "skip_nulls")]
    pub fonts: Vec<FontDescriptor>,
}

impl StructuralDocument {
    /// Parse a structural document from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the document has nothing to edit.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// One page of the structural document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralPage {
    /// 1-based page number, when the backend reports it
    #[serde(default)]
    pub page_number: Option<i64>,
    /// Page width in points
    #[serde(default)]
    pub width: Option<f32>,
    /// Page height in points
    #[serde(default)]
    pub height: Option<f32>,
    /// Text runs
    #[serde(default, deserialize_with = "skip_nulls")]
    pub text_elements: Vec<StructuralTextElement>,
    /// Image runs
    #[serde(default, deserialize_with = "skip_nulls")]
    pub image_elements: Vec<StructuralImageElement>,
}

/// A color as reported by the PDF: a color space name and raw components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfColor {
    /// Color space name, e.g. `DeviceRGB`, `DeviceGray`, `DeviceCMYK`
    #[serde(default)]
    pub color_space: Option<String>,
    /// Components, either unit range or 0-255
    #[serde(default)]
    pub components: Option<Vec<f32>>,
}

impl PdfColor {
    /// Create a color from a space name and components.
    pub fn new(color_space: &str, components: Vec<f32>) -> Self {
        Self {
            color_space: Some(color_space.to_string()),
            components: Some(components),
        }
    }
}

/// A CSS-style font weight: a number (`700`) or a keyword (`"bold"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    /// Numeric weight, 100-900
    Numeric(u16),
    /// Keyword weight such as `normal` or `bold`
    Keyword(String),
}

impl FontWeight {
    /// The `normal` keyword.
    pub fn normal() -> Self {
        FontWeight::Keyword("normal".to_string())
    }

    /// Whether this weight renders as bold: numeric ≥ 600 or a keyword containing "bold".
    pub fn is_bold(&self) -> bool {
        match self {
            FontWeight::Numeric(w) => *w >= 600,
            FontWeight::Keyword(k) => k.to_lowercase().contains("bold"),
        }
    }
}

impl From<u16> for FontWeight {
    fn from(value: u16) -> Self {
        FontWeight::Numeric(value)
    }
}

/// A positioned text run. `x`/`y` are in PDF space (bottom-left origin).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralTextElement {
    /// Stable id, generated by the layout builder when absent
    #[serde(default)]
    pub id: Option<String>,
    /// Text content
    #[serde(default)]
    pub text: Option<String>,
    /// Left edge in PDF space
    #[serde(default)]
    pub x: Option<f32>,
    /// Baseline/top y in PDF space
    #[serde(default)]
    pub y: Option<f32>,
    /// Run width
    #[serde(default)]
    pub width: Option<f32>,
    /// Run height
    #[serde(default)]
    pub height: Option<f32>,
    /// Font size in points
    #[serde(default)]
    pub font_size: Option<f32>,
    /// Reference into the font table (id, uid or `page:id`)
    #[serde(default)]
    pub font_id: Option<String>,
    /// Fill color
    #[serde(default)]
    pub fill_color: Option<PdfColor>,
    /// Stroke color
    #[serde(default)]
    pub stroke_color: Option<PdfColor>,
    /// Explicit weight
    #[serde(default)]
    pub font_weight: Option<FontWeight>,
    /// Explicit style, `italic` or `normal`
    #[serde(default)]
    pub font_style: Option<String>,
}

/// A positioned image run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralImageElement {
    /// Stable id
    #[serde(default)]
    pub id: Option<String>,
    /// Left edge in PDF space
    #[serde(default)]
    pub x: Option<f32>,
    /// Bottom edge in PDF space
    #[serde(default)]
    pub y: Option<f32>,
    /// Left edge in display space
    #[serde(default)]
    pub left: Option<f32>,
    /// Top edge in display space
    #[serde(default)]
    pub top: Option<f32>,
    /// Width
    #[serde(default)]
    pub width: Option<f32>,
    /// Height
    #[serde(default)]
    pub height: Option<f32>,
    /// Image as a data URL, absent when the backend could not render it
    #[serde(default)]
    pub image_data: Option<String>,
}

/// Font table entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontDescriptor {
    /// Resource id, unique within its page
    #[serde(default)]
    pub id: Option<String>,
    /// Document-wide unique id
    #[serde(default)]
    pub uid: Option<String>,
    /// Page the `id` is scoped to
    #[serde(default)]
    pub page_number: Option<i64>,
    /// Raw PostScript name, possibly subset-prefixed (`ABCDEF+Name`)
    #[serde(default)]
    pub base_name: Option<String>,
    /// FontDescriptor flags bitmask
    #[serde(default, alias = "descriptorFlags")]
    pub font_descriptor_flags: Option<u32>,
    /// Italic angle in degrees
    #[serde(default)]
    pub italic_angle: Option<f32>,
    /// Font's own declared color
    #[serde(default)]
    pub color: Option<String>,
    /// Generic font program (base64)
    #[serde(default)]
    pub program: Option<String>,
    /// Format hint for `program`
    #[serde(default)]
    pub program_format: Option<String>,
    /// Web-optimized font program (base64)
    #[serde(default)]
    pub web_program: Option<String>,
    /// Format hint for `web_program`
    #[serde(default)]
    pub web_program_format: Option<String>,
    /// PDF-native font program (base64)
    #[serde(default)]
    pub pdf_program: Option<String>,
    /// Format hint for `pdf_program`
    #[serde(default)]
    pub pdf_program_format: Option<String>,
}

impl FontDescriptor {
    /// Descriptor flags, empty when absent.
    pub fn flags(&self) -> super::DescriptorFlags {
        super::DescriptorFlags::from_bits_retain(self.font_descriptor_flags.unwrap_or(0))
    }

    /// Page-scoped lookup key `"{pageNumber}:{id}"`, when both are present.
    pub fn scoped_key(&self) -> Option<String> {
        match (self.page_number, self.id.as_deref()) {
            (Some(page), Some(id)) => Some(format!("{}:{}", page, id)),
            _ => None,
        }
    }
}
