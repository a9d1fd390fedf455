//! Editor page construction for a whole structural document.

use serde::{Deserialize, Serialize};

use super::dedup::dedup_text_boxes;
use super::image_boxes::build_image_boxes;
use super::text_boxes::{build_font_lookup, build_text_boxes};
use crate::config::EditorConfig;
use crate::model::{EditorPage, StructuralDocument, StructuralPage};

/// A rasterized page preview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBackground {
    /// PNG/JPEG data URL of the preview
    #[serde(default)]
    pub data_url: Option<String>,
    /// Rendered page width in points
    #[serde(default)]
    pub width: Option<f32>,
    /// Rendered page height in points
    #[serde(default)]
    pub height: Option<f32>,
}

fn positive(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Size of a page: the structural page's, else the background's, else the default.
pub fn page_size(page: &StructuralPage, background: Option<&PageBackground>, config: &EditorConfig) -> (f32, f32) {
    let width = positive(page.width)
        .or_else(|| positive(background.and_then(|b| b.width)))
        .unwrap_or(config.default_page_width);
    let height = positive(page.height)
        .or_else(|| positive(background.and_then(|b| b.height)))
        .unwrap_or(config.default_page_height);
    (width, height)
}

/// Build one editor page per structural page.
///
/// `backgrounds[i]` belongs to `document.pages[i]`; missing entries leave the
/// page without a preview.
pub fn build_editor_pages(
    document: &StructuralDocument,
    backgrounds: &[PageBackground],
    config: &EditorConfig,
) -> Vec<EditorPage> {
    let fonts = build_font_lookup(&document.fonts);

    let pages: Vec<EditorPage> = document
        .pages
        .iter()
        .enumerate()
        .map(|(index, page)| {
            let background = backgrounds.get(index);
            let (width, height) = page_size(page, background, config);

            let text_boxes = build_text_boxes(&page.text_elements, width, height, &fonts);
            let built = text_boxes.len();
            let text_boxes = dedup_text_boxes(text_boxes, &config.dedup);
            if text_boxes.len() != built {
                log::debug!("Page {}: merged {} duplicate text boxes", index + 1, built - text_boxes.len());
            }

            EditorPage {
                width,
                height,
                background: background.and_then(|b| b.data_url.clone()),
                text_boxes,
                image_boxes: build_image_boxes(&page.image_elements, width, height, config.cover_ratio),
            }
        })
        .collect();

    log::info!("Built {} editor pages", pages.len());
    pages
}
