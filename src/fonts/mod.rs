//! Font handling for display and export.
//!
//! - [`descriptor`]: name normalization and weight/style heuristics
//! - [`registry`]: display font registration per loaded document
//! - [`truetype_parser`], [`embedded`], [`glyph_usage`]: font programs for embedding
//! - [`encoding`]: WinAnsi for the standard font
//! - [`resolver`]: per-document export font resolution with fallback chain

pub mod descriptor;
pub mod embedded;
pub mod encoding;
pub mod glyph_usage;
pub mod registry;
pub mod resolver;
pub mod truetype_parser;

pub use descriptor::{
    build_font_family_name, find_font_meta, font_supports_italic, guess_font_stack,
    guess_font_weight, is_bold_weight, normalize_font_format, pick_font_payload,
    strip_subset_prefix, FontFormat, FontPayload,
};
pub use embedded::EmbeddedFont;
pub use glyph_usage::GlyphUsage;
pub use registry::{FontHandle, FontHost, FontRegistrySession, MemoryFontHost};
pub use resolver::{FontRef, FontResolver, ResolvedLine, STANDARD_FONT};
pub use truetype_parser::{FontMetrics, TrueTypeError, TrueTypeFont};
