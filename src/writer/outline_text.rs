//! Vector text fallback.
//!
//! Draws a line as filled glyph outlines instead of text. Used for lines no
//! embeddable font can encode: the outlines keep the characters visible even
//! though the result is no longer selectable text.

use ttf_parser::OutlineBuilder;

use super::content_stream::ContentStreamOp;
use crate::fonts::TrueTypeFont;

/// Collects glyph outlines as PDF path operations in page space.
///
/// Font units are scaled by `scale` and offset by the pen position; font
/// y-up matches PDF y-up so no flip is needed.
struct PathSink {
    ops: Vec<ContentStreamOp>,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
    /// Current point in font units, for quadratic to cubic conversion
    last: (f32, f32),
}

impl PathSink {
    fn new(scale: f32) -> Self {
        Self {
            ops: Vec::new(),
            origin_x: 0.0,
            origin_y: 0.0,
            scale,
            last: (0.0, 0.0),
        }
    }

    fn px(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn py(&self, y: f32) -> f32 {
        self.origin_y + y * self.scale
    }
}

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.ops.push(ContentStreamOp::MoveTo(self.px(x), self.py(y)));
        self.last = (x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ops.push(ContentStreamOp::LineTo(self.px(x), self.py(y)));
        self.last = (x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x0, y0) = self.last;
        let c1 = (x0 + 2.0 / 3.0 * (x1 - x0), y0 + 2.0 / 3.0 * (y1 - y0));
        let c2 = (x + 2.0 / 3.0 * (x1 - x), y + 2.0 / 3.0 * (y1 - y));
        self.ops.push(ContentStreamOp::CurveTo(
            self.px(c1.0),
            self.py(c1.1),
            self.px(c2.0),
            self.py(c2.1),
            self.px(x),
            self.py(y),
        ));
        self.last = (x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.ops.push(ContentStreamOp::CurveTo(
            self.px(x1),
            self.py(y1),
            self.px(x2),
            self.py(y2),
            self.px(x),
            self.py(y),
        ));
        self.last = (x, y);
    }

    fn close(&mut self) {
        self.ops.push(ContentStreamOp::ClosePath);
    }
}

/// Path operations drawing `text` with its baseline origin at (`x`, `y`).
///
/// Uses the first font in `fonts` with a glyph for every character. Returns
/// `None` when no font covers the line or the line draws nothing.
pub fn outline_line(fonts: &[TrueTypeFont<'_>], text: &str, x: f32, y: f32, font_size: f32) -> Option<Vec<ContentStreamOp>> {
    let font = fonts
        .iter()
        .find(|f| text.chars().all(|ch| f.glyph_id(ch as u32).is_some()))?;

    let upem = font.units_per_em().max(1) as f32;
    let mut sink = PathSink::new(font_size / upem);
    sink.origin_y = y;
    let mut pen = x;

    for ch in text.chars() {
        let gid = font.glyph_id(ch as u32)?;
        sink.origin_x = pen;
        // Blank glyphs (spaces) have no outline but still advance
        font.outline_glyph(gid, &mut sink);
        pen += font.advance(gid) as f32 * sink.scale;
    }

    if sink.ops.is_empty() {
        None
    } else {
        Some(sink.ops)
    }
}
