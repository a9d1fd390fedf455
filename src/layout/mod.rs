//! Layout building: structural pages to editable pages.
//!
//! This module turns backend extraction output into the overlay model:
//! - Text box geometry, styling and font weight inference
//! - Image box placement, dropping page-covering scans
//! - Duplicate text fragment removal

pub mod dedup;
pub mod image_boxes;
pub mod pages;
pub mod text_boxes;

// Re-export main types
pub use dedup::{collides, dedup_pass, dedup_text_boxes, informativeness, prefers_incoming};
pub use image_boxes::{build_image_box, build_image_boxes, covers_page};
pub use pages::{build_editor_pages, page_size, PageBackground};
pub use text_boxes::{build_font_lookup, build_text_box, build_text_boxes, sanitize_text, FontLookup};
