//! Color conversion between PDF color spaces and CSS color strings.
//!
//! The overlay stores colors as CSS strings (`rgb(r, g, b)` or `#rrggbb`);
//! the writer needs unit-range RGB triples.

use lazy_static::lazy_static;
use regex::Regex;

use crate::geometry::clamp;
use crate::model::PdfColor;

lazy_static! {
    /// `#rrggbb` with optional hash
    static ref RE_HEX6: Regex = Regex::new(r"(?i)^#?([0-9a-f]{6})$").unwrap();

    /// `#rgb` with optional hash
    static ref RE_HEX3: Regex = Regex::new(r"(?i)^#?([0-9a-f]{3})$").unwrap();

    /// `rgb(r, g, b)` with integer channels
    static ref RE_RGB: Regex =
        Regex::new(r"(?i)^rgb\s*\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)\s*$").unwrap();
}

/// An RGB color with unit-range channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    /// Red (0.0-1.0)
    pub r: f32,
    /// Green (0.0-1.0)
    pub g: f32,
    /// Blue (0.0-1.0)
    pub b: f32,
}

impl RgbColor {
    /// Create a new color; channels are clamped to 0.0-1.0.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: unit(r),
            g: unit(g),
            b: unit(b),
        }
    }

    /// Black.
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// White.
    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Channels scaled to 0-255 and rounded.
    pub fn to_bytes(&self) -> [u8; 3] {
        [to_255(self.r), to_255(self.g), to_255(self.b)]
    }

    /// Format as `rgb(r, g, b)`.
    pub fn to_css(&self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("rgb({}, {}, {})", r, g, b)
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

fn unit(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

fn to_255(value: f32) -> u8 {
    (unit(value) * 255.0).round() as u8
}

/// Normalize raw components to unit range.
///
/// Components whose largest magnitude is at most 1.0001 are taken as unit
/// range already; otherwise they are assumed to be 0-255 and divided by 255.
/// Either way each result is clamped to 0.0-1.0.
pub fn normalize_components(components: &[f32]) -> Vec<f32> {
    if components.is_empty() {
        return Vec::new();
    }
    let max_abs = components.iter().fold(0.0f32, |acc, v| acc.max(v.abs()));
    if max_abs <= 1.0001 {
        components.iter().map(|v| unit(*v)).collect()
    } else {
        components.iter().map(|v| unit(*v / 255.0)).collect()
    }
}

/// Convert a PDF color to a CSS `rgb(r, g, b)` string.
///
/// The color space name is matched by substring, case-insensitively: `rgb`
/// needs 3 components, `gray`/`grey` 1, `cmyk` 4. Anything else is `None`.
///
/// # Examples
///
/// ```
/// use pdf_overlay::color::pdf_color_to_css;
/// use pdf_overlay::model::PdfColor;
///
/// let red = PdfColor::new("DeviceRGB", vec![1.0, 0.0, 0.0]);
/// assert_eq!(pdf_color_to_css(&red).as_deref(), Some("rgb(255, 0, 0)"));
///
/// let cmyk_black = PdfColor::new("DeviceCMYK", vec![0.0, 0.0, 0.0, 1.0]);
/// assert_eq!(pdf_color_to_css(&cmyk_black).as_deref(), Some("rgb(0, 0, 0)"));
/// ```
pub fn pdf_color_to_css(color: &PdfColor) -> Option<String> {
    let raw = color.components.as_deref().filter(|c| !c.is_empty())?;
    let comps = normalize_components(raw);
    let space = color.color_space.as_deref().unwrap_or("").to_lowercase();

    if space.contains("rgb") && comps.len() >= 3 {
        return Some(RgbColor::new(comps[0], comps[1], comps[2]).to_css());
    }

    if (space.contains("gray") || space.contains("grey")) && !comps.is_empty() {
        let v = comps[0];
        return Some(RgbColor::new(v, v, v).to_css());
    }

    if space.contains("cmyk") && comps.len() >= 4 {
        let k = comps[3];
        let channel = |v: f32| 1.0 - (v * (1.0 - k) + k).min(1.0);
        return Some(RgbColor::new(channel(comps[0]), channel(comps[1]), channel(comps[2])).to_css());
    }

    None
}

fn parse_rgb_channels(caps: &regex::Captures<'_>) -> Option<[u8; 3]> {
    let mut out = [0u8; 3];
    for (i, slot) in out.iter_mut().enumerate() {
        let value: u32 = caps.get(i + 1)?.as_str().parse().ok()?;
        *slot = value.min(255) as u8;
    }
    Some(out)
}

fn parse_hex_channels(hex: &str) -> Option<[u8; 3]> {
    let expanded: String = if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex.to_string()
    };
    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Normalize a font's declared color string.
///
/// Hex forms (`#rrggbb`, `rrggbb`, `#rgb`, `rgb`) become lowercase `#rrggbb`;
/// `rgb(r, g, b)` keeps its form with channels clamped to 0-255. Anything else
/// is `None`.
pub fn normalize_font_color(color: Option<&str>) -> Option<String> {
    let trimmed = color?.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(caps) = RE_HEX6.captures(trimmed) {
        return Some(format!("#{}", caps[1].to_lowercase()));
    }
    if let Some(caps) = RE_HEX3.captures(trimmed) {
        let [r, g, b] = parse_hex_channels(&caps[1])?;
        return Some(format!("#{:02x}{:02x}{:02x}", r, g, b));
    }
    if let Some(caps) = RE_RGB.captures(trimmed) {
        let [r, g, b] = parse_rgb_channels(&caps)?;
        return Some(format!("rgb({}, {}, {})", r, g, b));
    }
    None
}

fn parse_css(color: &str) -> Option<[u8; 3]> {
    let trimmed = color.trim();
    if let Some(caps) = RE_RGB.captures(trimmed) {
        return parse_rgb_channels(&caps);
    }
    if !trimmed.starts_with('#') {
        return None;
    }
    if let Some(caps) = RE_HEX6.captures(trimmed).or_else(|| RE_HEX3.captures(trimmed)) {
        return parse_hex_channels(&caps[1]);
    }
    None
}

/// Convert a CSS color to a unit-range RGB triple for PDF output.
///
/// Accepts `rgb(r, g, b)`, `#rrggbb` and `#rgb`; anything else is black.
///
/// # Examples
///
/// ```
/// use pdf_overlay::color::{css_to_pdf_rgb, RgbColor};
///
/// assert_eq!(css_to_pdf_rgb(Some("#ff0000")), RgbColor::new(1.0, 0.0, 0.0));
/// assert_eq!(css_to_pdf_rgb(Some("papayawhip")), RgbColor::black());
/// assert_eq!(css_to_pdf_rgb(None), RgbColor::black());
/// ```
pub fn css_to_pdf_rgb(color: Option<&str>) -> RgbColor {
    match color.and_then(parse_css) {
        Some([r, g, b]) => RgbColor::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0),
        None => RgbColor::black(),
    }
}

/// Convert a CSS color to lowercase `#rrggbb`, defaulting to `#000000`.
pub fn css_to_hex(color: Option<&str>) -> String {
    match color.and_then(parse_css) {
        Some([r, g, b]) => format!("#{:02x}{:02x}{:02x}", r, g, b),
        None => "#000000".to_string(),
    }
}
