//! Configuration for layout building, editing, export and the backend.

use std::sync::Arc;
use std::time::Duration;

/// Default URL of the shared fallback font (Noto Sans Regular).
pub const DEFAULT_FALLBACK_FONT_URL: &str =
    "https://fonts.gstatic.com/s/notosans/v36/o-0IIpQlx3QUlC5A4PNb4j5Ba_2c7A.ttf";

/// Thresholds for the duplicate text fragment pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedupConfig {
    /// Maximum |Δleft| and |Δtop| for two boxes to count as the same position.
    pub position_epsilon: f32,

    /// Intersection-over-union above which two boxes collide.
    pub iou_threshold: f32,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            position_epsilon: 1.5,
            iou_threshold: 0.8,
        }
    }
}

impl DedupConfig {
    /// Set the position epsilon.
    pub fn with_position_epsilon(mut self, epsilon: f32) -> Self {
        self.position_epsilon = epsilon;
        self
    }

    /// Set the IoU threshold.
    pub fn with_iou_threshold(mut self, threshold: f32) -> Self {
        self.iou_threshold = threshold;
        self
    }
}

/// Editor and layout configuration.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Maximum number of undo (and redo) snapshots.
    pub history_limit: usize,

    /// Page width used when neither the page nor its background has one.
    pub default_page_width: f32,

    /// Page height used when neither the page nor its background has one.
    pub default_page_height: f32,

    /// Fraction of both page dimensions above which an image is treated as a page scan.
    pub cover_ratio: f32,

    /// Dedup thresholds.
    pub dedup: DedupConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            history_limit: 50,
            default_page_width: 612.0,
            default_page_height: 792.0,
            cover_ratio: 0.9,
            dedup: DedupConfig::default(),
        }
    }

    /// Set the undo/redo capacity.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Set the fallback page size.
    pub fn with_default_page_size(mut self, width: f32, height: f32) -> Self {
        self.default_page_width = width;
        self.default_page_height = height;
        self
    }

    /// Set the page-cover ratio for dropping background scans.
    pub fn with_cover_ratio(mut self, ratio: f32) -> Self {
        self.cover_ratio = ratio;
        self
    }

    /// Set the dedup thresholds.
    pub fn with_dedup(mut self, dedup: DedupConfig) -> Self {
        self.dedup = dedup;
        self
    }
}

/// Configuration for re-serializing the overlay model to PDF.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// URL of the shared fallback font.
    pub fallback_font_url: String,

    /// Compress content streams with FlateDecode.
    pub compress: bool,

    /// Faux-bold horizontal offset as a fraction of the font size.
    pub faux_bold_offset: f32,

    /// Line height as a multiple of the font size.
    pub line_height_factor: f32,

    /// Smallest font size drawn.
    pub min_font_size: f32,

    /// Font programs whose glyph outlines back the vector text fallback.
    pub outline_fonts: Vec<Arc<Vec<u8>>>,

    /// Document title written to the Info dictionary.
    pub title: Option<String>,

    /// Creator application written to the Info dictionary.
    pub creator: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            fallback_font_url: DEFAULT_FALLBACK_FONT_URL.to_string(),
            compress: false,
            faux_bold_offset: 0.02,
            line_height_factor: 1.2,
            min_font_size: 4.0,
            outline_fonts: Vec::new(),
            title: None,
            creator: Some("pdf_overlay".to_string()),
        }
    }
}

impl ExportConfig {
    /// Set the fallback font URL.
    pub fn with_fallback_font_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_font_url = url.into();
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Add a font program for the vector text fallback.
    pub fn with_outline_font(mut self, data: Vec<u8>) -> Self {
        self.outline_fonts.push(Arc::new(data));
        self
    }

    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Configuration for the HTTP backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL prepended to the endpoint paths (may be empty for same-origin proxies).
    pub base_url: String,

    /// Path of the structural document endpoint.
    pub document_path: String,

    /// Path of the edited PDF upload endpoint.
    pub upload_path: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            document_path: "/api/v1/ai/pdf-editor/document".to_string(),
            upload_path: "/api/v1/ai/pdf-editor/upload".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl BackendConfig {
    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the document endpoint.
    pub fn document_url(&self) -> String {
        format!("{}{}", self.base_url, self.document_path)
    }

    /// Full URL of the upload endpoint.
    pub fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, self.upload_path)
    }
}
