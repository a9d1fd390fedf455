//! Error types for the overlay editor.
//!
//! This module defines all error types that can surface from loading a
//! structural document, editing it, and re-serializing it to PDF.

/// Result type alias for overlay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, editing or exporting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structural document fetch, PDF fetch or rasterization failed
    #[error("Failed to load document: {0}")]
    Load(String),

    /// A newer load superseded this one
    #[error("Document load was cancelled")]
    Cancelled,

    /// The document has no pages to edit
    #[error("Document has no pages")]
    EmptyDocument,

    /// Font parsing or embedding failed
    #[error("Font error: {0}")]
    Font(String),

    /// Image decoding or embedding failed
    #[error("Image error: {0}")]
    Image(String),

    /// Content stream or object serialization failed
    #[error("Encoding error: {0}")]
    Encode(String),

    /// A data URL could not be parsed
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// The edited PDF could not be uploaded
    #[error("Failed to apply edits: {0}")]
    Upload(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Page index does not exist in the overlay model
    #[error("Page index out of range: {0}")]
    PageOutOfRange(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is an empty-state rather than a failure.
    pub fn is_empty_state(&self) -> bool {
        matches!(self, Error::EmptyDocument)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

impl From<crate::fonts::TrueTypeError> for Error {
    fn from(err: crate::fonts::TrueTypeError) -> Self {
        Error::Font(err.to_string())
    }
}

impl From<crate::writer::ImageError> for Error {
    fn from(err: crate::writer::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}
