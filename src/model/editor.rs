//! Editable overlay model.
//!
//! An [`EditorPage`] is a plain value: edits clone the page list, mutate the
//! clone and commit it, which is what makes undo/redo snapshots cheap to reason
//! about.

use serde::{Deserialize, Serialize};

use super::structural::FontWeight;
use crate::geometry::Rect;

/// Text or image, the two kinds of editable box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxKind {
    /// A [`TextBox`]
    Text,
    /// An [`ImageBox`]
    Image,
}

/// Font style of a text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright
    Normal,
    /// Slanted
    Italic,
}

impl FontStyle {
    /// Parse `italic`/`normal` (case-insensitive); anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "italic" => Some(FontStyle::Italic),
            "normal" => Some(FontStyle::Normal),
            _ => None,
        }
    }
}

/// One editable page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorPage {
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Rasterized preview as a data URL; display only, never exported
    #[serde(default)]
    pub background: Option<String>,
    /// Text boxes in paint order
    #[serde(default)]
    pub text_boxes: Vec<TextBox>,
    /// Image boxes in paint order
    #[serde(default)]
    pub image_boxes: Vec<ImageBox>,
}

impl EditorPage {
    /// Create an empty page.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            background: None,
            text_boxes: Vec::new(),
            image_boxes: Vec::new(),
        }
    }

    /// Find a text box by id.
    pub fn text_box(&self, id: &str) -> Option<&TextBox> {
        self.text_boxes.iter().find(|b| b.id == id)
    }

    /// Find a text box by id, mutably.
    pub fn text_box_mut(&mut self, id: &str) -> Option<&mut TextBox> {
        self.text_boxes.iter_mut().find(|b| b.id == id)
    }

    /// Find an image box by id.
    pub fn image_box(&self, id: &str) -> Option<&ImageBox> {
        self.image_boxes.iter().find(|b| b.id == id)
    }

    /// Find an image box by id, mutably.
    pub fn image_box_mut(&mut self, id: &str) -> Option<&mut ImageBox> {
        self.image_boxes.iter_mut().find(|b| b.id == id)
    }

    /// Rectangle of the box with the given kind and id.
    pub fn box_rect(&self, kind: BoxKind, id: &str) -> Option<Rect> {
        match kind {
            BoxKind::Text => self.text_box(id).map(TextBox::rect),
            BoxKind::Image => self.image_box(id).map(ImageBox::rect),
        }
    }

    /// Whether every box lies on the page.
    pub fn boxes_within_bounds(&self) -> bool {
        self.text_boxes
            .iter()
            .map(TextBox::rect)
            .chain(self.image_boxes.iter().map(ImageBox::rect))
            .all(|r| r.is_within(self.width, self.height))
    }
}

/// An editable run of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    /// Stable id
    pub id: String,
    /// Text content; `\n` separates lines
    pub text: String,
    /// Left edge in display space
    pub left: f32,
    /// Top edge in display space
    pub top: f32,
    /// Box width
    pub width: f32,
    /// Box height
    pub height: f32,
    /// Font size in points
    pub font_size: f32,
    /// Weight, unset when unknown
    #[serde(default)]
    pub font_weight: Option<FontWeight>,
    /// Style, unset when the source did not say
    #[serde(default)]
    pub font_style: Option<FontStyle>,
    /// Font table reference
    #[serde(default)]
    pub font_id: Option<String>,
    /// Resolved base font name
    #[serde(default)]
    pub base_font: Option<String>,
    /// CSS color
    #[serde(default)]
    pub color: Option<String>,
    /// Boxes sharing a group id move and select together
    #[serde(default)]
    pub group_id: Option<String>,
}

impl TextBox {
    /// Bounding rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// Replace the geometry with `rect`.
    pub fn set_rect(&mut self, rect: Rect) {
        self.left = rect.x;
        self.top = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Whether the weight renders as bold.
    pub fn is_bold(&self) -> bool {
        self.font_weight.as_ref().map(FontWeight::is_bold).unwrap_or(false)
    }

    /// Whether the style is italic.
    pub fn is_italic(&self) -> bool {
        self.font_style == Some(FontStyle::Italic)
    }
}

/// An editable raster image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBox {
    /// Stable id
    pub id: String,
    /// Image as a data URL
    #[serde(default)]
    pub data_url: Option<String>,
    /// Left edge in display space
    pub left: f32,
    /// Top edge in display space
    pub top: f32,
    /// Box width
    pub width: f32,
    /// Box height
    pub height: f32,
}

impl ImageBox {
    /// Bounding rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// Replace the geometry with `rect`.
    pub fn set_rect(&mut self, rect: Rect) {
        self.left = rect.x;
        self.top = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }
}
