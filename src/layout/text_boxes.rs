//! Text box construction from structural text runs.

use std::collections::HashMap;

use crate::color::{normalize_font_color, pdf_color_to_css};
use crate::fonts::guess_font_weight;
use crate::geometry::{clamp, flip_y};
use crate::model::{DescriptorFlags, FontDescriptor, FontStyle, FontWeight, StructuralTextElement, TextBox};

/// Font table indexed by `id`, `uid` and `"{pageNumber}:{id}"`.
pub type FontLookup<'a> = HashMap<String, &'a FontDescriptor>;

/// Index the document's fonts by every key a text element may reference.
///
/// Later fonts overwrite earlier ones on key collisions.
pub fn build_font_lookup(fonts: &[FontDescriptor]) -> FontLookup<'_> {
    let mut lookup = HashMap::new();
    for font in fonts {
        if let Some(id) = &font.id {
            lookup.insert(id.clone(), font);
        }
        if let Some(uid) = &font.uid {
            lookup.insert(uid.clone(), font);
        }
        if let Some(key) = font.scoped_key() {
            lookup.insert(key, font);
        }
    }
    lookup
}

/// Replace non-breaking spaces with plain spaces.
pub fn sanitize_text(text: Option<&str>) -> String {
    text.unwrap_or("").replace('\u{00a0}', " ")
}

fn infer_font_weight(
    element: &StructuralTextElement,
    font: Option<&FontDescriptor>,
    base_font: Option<&str>,
) -> Option<FontWeight> {
    if let Some(explicit) = &element.font_weight {
        return Some(explicit.clone());
    }
    if font.is_some_and(|f| f.flags().contains(DescriptorFlags::FORCE_BOLD)) {
        return Some(FontWeight::Numeric(700));
    }
    guess_font_weight(base_font)
}

/// Build the text box for one element.
///
/// Returns `None` for elements whose text is blank and whose explicit width
/// is zero or negative.
pub fn build_text_box(
    element: &StructuralTextElement,
    index: usize,
    page_width: f32,
    page_height: f32,
    fonts: &FontLookup<'_>,
) -> Option<TextBox> {
    let text = sanitize_text(element.text.as_deref());
    if text.trim().is_empty() && element.width.is_some_and(|w| w <= 0.0) {
        return None;
    }

    let font_size = element.font_size.or(element.height).unwrap_or(12.0);
    let raw_width = element
        .width
        .unwrap_or_else(|| (text.chars().count() as f32 * (font_size * 0.55).max(6.0)).max(12.0));
    let width = clamp(raw_width, 1.0, page_width);
    let height = element.height.unwrap_or(font_size * 1.2).max(12.0).min(page_height);
    let top = match element.y {
        Some(y) => flip_y(page_height, y),
        None => 0.0,
    };
    let top = clamp(top, 0.0, page_height - height);
    let left = clamp(element.x.unwrap_or(0.0), 0.0, page_width - width);

    let font = element.font_id.as_deref().and_then(|id| fonts.get(id).copied());
    let base_font = font.and_then(|f| {
        [&f.base_name, &f.uid, &f.id]
            .into_iter()
            .find_map(|v| v.as_deref().filter(|s| !s.is_empty()))
            .map(str::to_string)
    });

    let color = element
        .fill_color
        .as_ref()
        .and_then(pdf_color_to_css)
        .or_else(|| element.stroke_color.as_ref().and_then(pdf_color_to_css))
        .or_else(|| normalize_font_color(font.and_then(|f| f.color.as_deref())));

    let font_weight = infer_font_weight(element, font, base_font.as_deref());
    let font_style = element.font_style.as_deref().and_then(FontStyle::parse);

    Some(TextBox {
        id: element.id.clone().unwrap_or_else(|| format!("text-{}", index)),
        text,
        left,
        top,
        width,
        height,
        font_size,
        font_weight,
        font_style,
        font_id: element.font_id.clone(),
        base_font,
        color,
        group_id: None,
    })
}

/// Build text boxes for every element of a page, before deduplication.
pub fn build_text_boxes(
    elements: &[StructuralTextElement],
    page_width: f32,
    page_height: f32,
    fonts: &FontLookup<'_>,
) -> Vec<TextBox> {
    elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| build_text_box(element, index, page_width, page_height, fonts))
        .collect()
}
