//! Re-serialization of the overlay model to PDF.
//!
//! Every editor page becomes one output page, painted in this order:
//!
//! 1. an opaque white rectangle over the whole page (the raster preview is
//!    never embedded),
//! 2. image boxes, each distinct data URL embedded once per document,
//! 3. text boxes, one text run per line at descending baselines.
//!
//! Fonts are resolved per line through [`FontResolver`]; lines no font can
//! encode are drawn as glyph outlines when an outline font covers them, else
//! as `?`-substituted text.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::content_stream::ContentStreamBuilder;
use super::font_embedder::{write_embedded_font, write_standard_font};
use super::image_handler::ImageData;
use super::outline_text::outline_line;
use super::pdf_writer::{PdfWriter, PdfWriterConfig};
use crate::color::{css_to_pdf_rgb, RgbColor};
use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::fonts::{FontRef, FontResolver, TrueTypeFont};
use crate::geometry::flip_y;
use crate::model::{EditorPage, FontDescriptor, ImageBox, TextBox};
use crate::object::{Dict, Object, ObjectRef};

/// Image XObjects embedded so far, keyed by data URL.
///
/// A data URL that failed to decode is remembered as `None` so it is
/// reported once.
#[derive(Debug, Default)]
struct ImageCache {
    entries: HashMap<String, Option<(String, ObjectRef)>>,
    next_index: usize,
}

impl ImageCache {
    fn resolve(&mut self, writer: &mut PdfWriter, data_url: &str) -> Option<(String, ObjectRef)> {
        if let Some(entry) = self.entries.get(data_url) {
            return entry.clone();
        }

        let entry = match ImageData::from_data_url(data_url) {
            Ok(image) => {
                let smask = image.soft_mask_xobject().map(|mask| writer.add_object(mask));
                let image_ref = writer.add_object(image.to_xobject(smask));
                self.next_index += 1;
                Some((format!("Im{}", self.next_index), image_ref))
            },
            Err(e) => {
                log::warn!("Skipping image that failed to decode: {}", e);
                None
            },
        };
        self.entries.insert(data_url.to_string(), entry.clone());
        entry
    }

    fn len(&self) -> usize {
        self.entries.values().filter(|e| e.is_some()).count()
    }
}

/// Per-document drawing state.
struct PageRenderer<'a, 'f> {
    config: &'a ExportConfig,
    resolver: FontResolver<'f>,
    outline_fonts: Vec<TrueTypeFont<'a>>,
    used_fonts: HashSet<FontRef>,
}

impl<'a, 'f> PageRenderer<'a, 'f> {
    fn draw_image(
        &self,
        content: &mut ContentStreamBuilder,
        image: &ImageBox,
        resource: &str,
        page_height: f32,
    ) {
        let y = flip_y(page_height, image.top + image.height);
        content.draw_image(resource, image.left, y, image.width, image.height);
    }

    fn draw_text_box(&mut self, content: &mut ContentStreamBuilder, text_box: &TextBox, page_height: f32) {
        let font_size = if text_box.font_size.is_finite() {
            text_box.font_size.max(self.config.min_font_size)
        } else {
            self.config.min_font_size
        };
        let line_height = font_size * self.config.line_height_factor;
        let bold_offset = font_size * self.config.faux_bold_offset;

        let preferred = self
            .resolver
            .font_for_box(text_box.font_id.as_deref(), text_box.base_font.as_deref());
        content.fill_color(css_to_pdf_rgb(text_box.color.as_deref()));

        for (index, raw_line) in text_box.text.split('\n').enumerate() {
            let line = raw_line.trim_end_matches('\r');
            let line = if line.is_empty() { " " } else { line };
            let x = text_box.left;
            let y = (page_height - text_box.top - font_size - index as f32 * line_height).max(0.0);

            let resolved = self.resolver.resolve_line(preferred, line);
            let faux_bold = text_box.is_bold() && !self.resolver.is_bold_face(resolved.font);

            if resolved.sanitized {
                if let Some(path) = outline_line(&self.outline_fonts, line, x, y, font_size) {
                    log::debug!("Drawing line {:?} of {} as outlines", line, text_box.id);
                    if faux_bold {
                        let shifted = outline_line(&self.outline_fonts, line, x + bold_offset, y, font_size);
                        content.fill_path(path);
                        if let Some(shifted) = shifted {
                            content.fill_path(shifted);
                        }
                    } else {
                        content.fill_path(path);
                    }
                    continue;
                }
            }

            let resource = FontResolver::resource_name(resolved.font);
            let encoded = self.resolver.encode(resolved.font, &resolved.text);
            self.used_fonts.insert(resolved.font);
            content.set_font(&resource, font_size);

            let draws = if faux_bold { vec![x, x + bold_offset] } else { vec![x] };
            for draw_x in draws {
                match resolved.font {
                    FontRef::Standard => content.text(encoded.clone(), draw_x, y),
                    FontRef::Embedded(_) => content.hex_text(encoded.clone(), draw_x, y),
                };
            }
        }
    }
}

/// Parse the configured outline fonts, skipping any that fail.
fn parse_outline_fonts(fonts: &[Arc<Vec<u8>>]) -> Vec<TrueTypeFont<'_>> {
    fonts
        .iter()
        .filter_map(|data| match TrueTypeFont::parse(data.as_slice()) {
            Ok(font) => Some(font),
            Err(e) => {
                log::warn!("Ignoring outline font: {}", e);
                None
            },
        })
        .collect()
}

/// Re-serialize edited pages into a new PDF document.
///
/// `fonts` is the document font table used to embed each text box's
/// original program; `fallback` is the shared fallback font program, if it
/// could be fetched.
///
/// # Examples
///
/// ```
/// use pdf_overlay::model::{EditorPage, TextBox};
/// use pdf_overlay::writer::export_pages;
/// use pdf_overlay::ExportConfig;
///
/// let mut page = EditorPage::new(612.0, 792.0);
/// page.text_boxes.push(TextBox {
///     id: "t1".to_string(),
///     text: "Hello".to_string(),
///     left: 50.0,
///     top: 100.0,
///     width: 200.0,
///     height: 24.0,
///     font_size: 20.0,
///     font_weight: None,
///     font_style: None,
///     font_id: None,
///     base_font: None,
///     color: Some("#ff0000".to_string()),
///     group_id: None,
/// });
///
/// let pdf = export_pages(&[page], &[], None, &ExportConfig::default())?;
/// assert!(pdf.starts_with(b"%PDF-"));
/// # Ok::<(), pdf_overlay::Error>(())
/// ```
pub fn export_pages(
    pages: &[EditorPage],
    fonts: &[FontDescriptor],
    fallback: Option<Arc<Vec<u8>>>,
    config: &ExportConfig,
) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(Error::EmptyDocument);
    }

    let mut writer = PdfWriter::with_config(PdfWriterConfig::from(config));
    let mut images = ImageCache::default();
    let mut renderer = PageRenderer {
        config,
        resolver: FontResolver::new(fonts, fallback),
        outline_fonts: parse_outline_fonts(&config.outline_fonts),
        used_fonts: HashSet::new(),
    };

    let mut drawn: Vec<(f32, f32, ContentStreamBuilder, Dict)> = Vec::with_capacity(pages.len());
    for page in pages {
        let mut content = ContentStreamBuilder::new();
        let mut xobjects = Dict::new();

        content.fill_rect(0.0, 0.0, page.width, page.height, RgbColor::white());

        for image in &page.image_boxes {
            let Some(data_url) = image.data_url.as_deref() else {
                continue;
            };
            if let Some((resource, image_ref)) = images.resolve(&mut writer, data_url) {
                renderer.draw_image(&mut content, image, &resource, page.height);
                xobjects.insert(resource, image_ref.into());
            }
        }

        for text_box in &page.text_boxes {
            renderer.draw_text_box(&mut content, text_box, page.height);
        }
        content.end_text();

        drawn.push((page.width, page.height, content, xobjects));
    }

    // Glyph usage is complete only once every page is drawn
    let mut font_resources = Dict::new();
    if renderer.used_fonts.contains(&FontRef::Standard) {
        let font_ref = write_standard_font(&mut writer);
        font_resources.insert(FontResolver::resource_name(FontRef::Standard), font_ref.into());
    }
    for (index, font) in renderer.resolver.embedded_fonts().iter().enumerate() {
        let font_key = FontRef::Embedded(index);
        if renderer.used_fonts.contains(&font_key) {
            let font_ref = write_embedded_font(&mut writer, font);
            font_resources.insert(FontResolver::resource_name(font_key), font_ref.into());
        }
    }

    for (width, height, content, xobjects) in drawn {
        let mut resources = Dict::new();
        if !font_resources.is_empty() {
            resources.insert("Font".to_string(), Object::Dictionary(font_resources.clone()));
        }
        if !xobjects.is_empty() {
            resources.insert("XObject".to_string(), Object::Dictionary(xobjects));
        }
        writer.add_page(width, height, &content, resources)?;
    }

    let page_count = writer.page_count();
    let bytes = writer.finish()?;
    log::info!(
        "Exported {} pages ({} fonts, {} images, {} bytes)",
        page_count,
        font_resources.len(),
        images.len(),
        bytes.len()
    );
    Ok(bytes)
}
