//! PDF writing: re-serializes the overlay model into a new document.
//!
//! ## Architecture
//!
//! ```text
//! EditorPage[]
//!     ↓
//! [export_pages] (fonts resolved per line, images memoized per data URL)
//!     ↓
//! [ContentStreamBuilder] (boxes → content stream bytes)
//!     ↓
//! [PdfWriter] (assembles complete PDF structure)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Low-Level API (PdfWriter)
//!
//! ```
//! use pdf_overlay::color::RgbColor;
//! use pdf_overlay::object::Dict;
//! use pdf_overlay::writer::{ContentStreamBuilder, PdfWriter};
//!
//! let mut writer = PdfWriter::new();
//! let mut content = ContentStreamBuilder::new();
//! content.fill_rect(72.0, 72.0, 100.0, 50.0, RgbColor::black());
//! writer.add_page(612.0, 792.0, &content, Dict::new())?;
//! let bytes = writer.finish()?;
//! assert!(bytes.ends_with(b"%%EOF"));
//! # Ok::<(), pdf_overlay::Error>(())
//! ```

mod content_stream;
mod exporter;
mod font_embedder;
mod image_handler;
mod object_serializer;
mod outline_text;
mod pdf_writer;

pub use content_stream::{ContentStreamBuilder, ContentStreamOp};
pub use exporter::export_pages;
pub use font_embedder::{pdf_font_name, write_embedded_font, write_standard_font};
pub use image_handler::{ColorSpace, DataUrl, ImageData, ImageError, ImageFormat};
pub use object_serializer::{format_real, ObjectSerializer};
pub use outline_text::outline_line;
pub use pdf_writer::{PdfWriter, PdfWriterConfig};
