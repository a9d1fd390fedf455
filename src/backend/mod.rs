//! Collaborators outside the editing core: the backend service, page
//! rasterization and the shared fallback font.
//!
//! - [`client`]: [`EditorBackend`] trait and its reqwest implementation
//! - [`loader`]: cancellable [`DocumentLoader`]
//! - [`fallback`]: memoized fallback font fetch

pub mod client;
pub mod fallback;
pub mod loader;

pub use client::{parse_document_response, parse_upload_response, EditorBackend, HttpBackend, UPLOAD_FILE_NAME};
pub use fallback::{FallbackFontCache, FallbackFontSource, HttpFallbackFont, StaticFallbackFont};
pub use loader::{DocumentLoader, LoadedDocument, NoPreview, PageRasterizer};
