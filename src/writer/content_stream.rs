//! PDF content stream builder.
//!
//! Builds PDF content streams containing graphics and text operators
//! according to PDF specification ISO 32000-1:2008 Section 8-9.

use std::io::Write;

use super::object_serializer::format_real;
use crate::color::RgbColor;
use crate::error::Result;
use crate::fonts::encoding::encode_bytes_as_literal;

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font and size (Tf)
    SetFont(String, f32),
    /// Set text matrix (Tm)
    SetTextMatrix(f32, f32, f32, f32, f32, f32),
    /// Show single-byte encoded text (Tj) as a literal string
    ShowText(Vec<u8>),
    /// Show two-byte glyph ids (Tj) as a hex string
    ShowHexText(Vec<u8>),
    /// Set fill color RGB (rg)
    SetFillColorRGB(f32, f32, f32),
    /// Move to (m)
    MoveTo(f32, f32),
    /// Line to (l)
    LineTo(f32, f32),
    /// Cubic Bezier curve (c)
    CurveTo(f32, f32, f32, f32, f32, f32),
    /// Rectangle (re)
    Rectangle(f32, f32, f32, f32),
    /// Close subpath (h)
    ClosePath,
    /// Fill path, nonzero winding (f)
    Fill,
    /// Paint XObject (Do)
    PaintXObject(String),
}

/// Builder for PDF content streams.
#[derive(Debug, Default)]
pub struct ContentStreamBuilder {
    /// Operations in the stream
    operations: Vec<ContentStreamOp>,
    /// Current font name
    current_font: Option<String>,
    /// Current font size
    current_font_size: f32,
    /// Whether we're in a text object
    in_text_object: bool,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Operations added so far.
    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    /// Begin a text object.
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text_object {
            self.op(ContentStreamOp::BeginText);
            self.in_text_object = true;
        }
        self
    }

    /// End a text object.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text_object {
            self.op(ContentStreamOp::EndText);
            self.in_text_object = false;
        }
        self
    }

    /// Set font for text operations.
    pub fn set_font(&mut self, font_name: &str, size: f32) -> &mut Self {
        if self.current_font.as_deref() != Some(font_name) || self.current_font_size != size {
            self.op(ContentStreamOp::SetFont(font_name.to_string(), size));
            self.current_font = Some(font_name.to_string());
            self.current_font_size = size;
        }
        self
    }

    /// Add single-byte text at a position (standard font).
    pub fn text(&mut self, encoded: Vec<u8>, x: f32, y: f32) -> &mut Self {
        self.begin_text();
        self.op(ContentStreamOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, x, y));
        self.op(ContentStreamOp::ShowText(encoded))
    }

    /// Add glyph-id text at a position (Identity-H embedded fonts).
    pub fn hex_text(&mut self, encoded: Vec<u8>, x: f32, y: f32) -> &mut Self {
        self.begin_text();
        self.op(ContentStreamOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, x, y));
        self.op(ContentStreamOp::ShowHexText(encoded))
    }

    /// Set fill color.
    pub fn fill_color(&mut self, color: RgbColor) -> &mut Self {
        self.op(ContentStreamOp::SetFillColorRGB(color.r, color.g, color.b))
    }

    /// Draw an image XObject with its bottom-left corner at (`x`, `y`).
    pub fn draw_image(&mut self, resource_id: &str, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.end_text();
        self.op(ContentStreamOp::SaveState);
        self.op(ContentStreamOp::Transform(width, 0.0, 0.0, height, x, y));
        self.op(ContentStreamOp::PaintXObject(resource_id.to_string()));
        self.op(ContentStreamOp::RestoreState)
    }

    /// Fill a rectangle with `color`.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: RgbColor) -> &mut Self {
        self.end_text();
        self.fill_color(color);
        self.op(ContentStreamOp::Rectangle(x, y, width, height));
        self.op(ContentStreamOp::Fill)
    }

    /// Fill a path given as construction operations with the current fill color.
    pub fn fill_path(&mut self, path: Vec<ContentStreamOp>) -> &mut Self {
        self.end_text();
        self.operations.extend(path);
        self.op(ContentStreamOp::Fill)
    }

    /// Save graphics state.
    pub fn save_state(&mut self) -> &mut Self {
        self.end_text();
        self.op(ContentStreamOp::SaveState)
    }

    /// Restore graphics state.
    pub fn restore_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::RestoreState)
    }

    /// Concatenate a transformation matrix.
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> &mut Self {
        self.op(ContentStreamOp::Transform(a, b, c, d, e, f))
    }

    /// Whether no operation was added.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Build the content stream to bytes.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        for op in &self.operations {
            write_op(&mut buf, op)?;
            writeln!(buf)?;
        }
        Ok(buf)
    }
}

fn num(value: f32) -> String {
    format_real(value as f64)
}

/// Write a single operation.
fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
    match op {
        ContentStreamOp::SaveState => write!(w, "q"),
        ContentStreamOp::RestoreState => write!(w, "Q"),
        ContentStreamOp::Transform(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} cm", num(*a), num(*b), num(*c), num(*d), num(*e), num(*f))
        },
        ContentStreamOp::BeginText => write!(w, "BT"),
        ContentStreamOp::EndText => write!(w, "ET"),
        ContentStreamOp::SetFont(name, size) => write!(w, "/{} {} Tf", name, num(*size)),
        ContentStreamOp::SetTextMatrix(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} Tm", num(*a), num(*b), num(*c), num(*d), num(*e), num(*f))
        },
        ContentStreamOp::ShowText(bytes) => write!(w, "{} Tj", encode_bytes_as_literal(bytes)),
        ContentStreamOp::ShowHexText(bytes) => {
            write!(w, "<")?;
            for b in bytes {
                write!(w, "{:02X}", b)?;
            }
            write!(w, "> Tj")
        },
        ContentStreamOp::SetFillColorRGB(r, g, b) => write!(w, "{} {} {} rg", num(*r), num(*g), num(*b)),
        ContentStreamOp::MoveTo(x, y) => write!(w, "{} {} m", num(*x), num(*y)),
        ContentStreamOp::LineTo(x, y) => write!(w, "{} {} l", num(*x), num(*y)),
        ContentStreamOp::CurveTo(x1, y1, x2, y2, x3, y3) => write!(
            w,
            "{} {} {} {} {} {} c",
            num(*x1),
            num(*y1),
            num(*x2),
            num(*y2),
            num(*x3),
            num(*y3)
        ),
        ContentStreamOp::Rectangle(x, y, width, height) => {
            write!(w, "{} {} {} {} re", num(*x), num(*y), num(*width), num(*height))
        },
        ContentStreamOp::ClosePath => write!(w, "h"),
        ContentStreamOp::Fill => write!(w, "f"),
        ContentStreamOp::PaintXObject(name) => write!(w, "/{} Do", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(builder: &ContentStreamBuilder) -> String {
        String::from_utf8(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_text_object_lifecycle() {
        let mut b = ContentStreamBuilder::new();
        b.set_font("F0", 20.0)
            .fill_color(RgbColor::new(1.0, 0.0, 0.0))
            .text(b"Hello".to_vec(), 50.0, 672.0)
            .text(b"World".to_vec(), 50.0, 648.0)
            .end_text();
        assert_eq!(
            built(&b),
            "/F0 20 Tf\n1 0 0 rg\nBT\n1 0 0 1 50 672 Tm\n(Hello) Tj\n1 0 0 1 50 648 Tm\n(World) Tj\nET\n"
        );
    }

    #[test]
    fn test_set_font_dedup() {
        let mut b = ContentStreamBuilder::new();
        b.set_font("F1", 12.0).set_font("F1", 12.0).set_font("F1", 14.0);
        assert_eq!(b.operations().len(), 2);
    }

    #[test]
    fn test_hex_text() {
        let mut b = ContentStreamBuilder::new();
        b.hex_text(vec![0x00, 0x2A, 0x01, 0xFF], 0.0, 0.0);
        assert!(built(&b).contains("<002A01FF> Tj"));
    }

    #[test]
    fn test_draw_image_closes_text() {
        let mut b = ContentStreamBuilder::new();
        b.text(b"x".to_vec(), 0.0, 0.0).draw_image("Im1", 10.0, 20.0, 100.5, 50.0);
        assert!(built(&b).ends_with("ET\nq\n100.5 0 0 50 10 20 cm\n/Im1 Do\nQ\n"));
    }

    #[test]
    fn test_fill_path() {
        let mut b = ContentStreamBuilder::new();
        b.text(b"x".to_vec(), 0.0, 0.0).fill_path(vec![
            ContentStreamOp::MoveTo(0.0, 0.0),
            ContentStreamOp::LineTo(1.5, 0.0),
            ContentStreamOp::ClosePath,
        ]);
        assert!(built(&b).ends_with("ET\n0 0 m\n1.5 0 l\nh\nf\n"));
    }

    #[test]
    fn test_literal_escaping() {
        let mut b = ContentStreamBuilder::new();
        b.text(vec![b'(', 0x80], 0.0, 0.0);
        assert!(built(&b).contains("(\\(\\200) Tj"));
    }
}
