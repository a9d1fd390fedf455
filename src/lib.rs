// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Overlay
//!
//! Editable overlay model for the text and images of a PDF, rebuilt from a
//! backend-supplied structural extraction, and re-serialized to a new PDF.
//!
//! ## Pipeline
//!
//! ```text
//! structural JSON + page previews
//!     ↓
//! [layout] text/image boxes, dedup of duplicated fragments
//!     ↓
//! [editor] EditorPage[] with move/resize/join/add/delete and undo/redo
//!     ↓
//! [writer] embedded fonts, images and positioned text with glyph fallback
//!     ↓
//! PDF bytes → [backend] upload
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use pdf_overlay::layout::build_editor_pages;
//! use pdf_overlay::model::StructuralDocument;
//! use pdf_overlay::writer::export_pages;
//! use pdf_overlay::{EditorConfig, ExportConfig};
//!
//! let json = r#"{
//!     "pages": [{
//!         "width": 612, "height": 792,
//!         "textElements": [{"text": "Invoice", "x": 72, "y": 700, "fontSize": 18}]
//!     }]
//! }"#;
//! let document = StructuralDocument::from_json(json)?;
//! let pages = build_editor_pages(&document, &[], &EditorConfig::default());
//! assert_eq!(pages[0].text_boxes[0].text, "Invoice");
//!
//! let pdf = export_pages(&pages, &document.fonts, None, &ExportConfig::default())?;
//! assert!(pdf.starts_with(b"%PDF-"));
//! # Ok::<(), pdf_overlay::Error>(())
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Geometry and color
pub mod color;
pub mod geometry;

// Data model
pub mod model;

// Fonts
pub mod fonts;

// Structural document → overlay pages
pub mod layout;

// Editing
pub mod editor;

// PDF output
pub mod object;
pub mod writer;

// External collaborators
pub mod backend;

pub use config::{BackendConfig, DedupConfig, EditorConfig, ExportConfig};
pub use editor::EditorSession;
pub use error::{Error, Result};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
