//! Document and overlay data model.
//!
//! - [`structural`]: read-only backend extraction (pages, runs, fonts)
//! - [`editor`]: mutable overlay pages with text and image boxes

pub mod editor;
pub mod structural;

pub use editor::{BoxKind, EditorPage, FontStyle, ImageBox, TextBox};
pub use structural::{
    FontDescriptor, FontWeight, PdfColor, StructuralDocument, StructuralImageElement,
    StructuralPage, StructuralTextElement,
};

bitflags::bitflags! {
    /// FontDescriptor flag bits (PDF 32000-1:2008, Table 123).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DescriptorFlags: u32 {
        /// All glyphs have the same width
        const FIXED_PITCH = 0x1;
        /// Glyphs have serifs
        const SERIF = 0x2;
        /// Font uses a symbolic character set
        const SYMBOLIC = 0x4;
        /// Glyphs resemble cursive handwriting
        const SCRIPT = 0x8;
        /// Font uses the standard Latin character set
        const NONSYMBOLIC = 0x20;
        /// Glyphs have dominant vertical strokes that are slanted
        const ITALIC = 0x40;
        /// Bold glyphs are painted with extra pixels at small sizes
        const FORCE_BOLD = 0x100;
    }
}
