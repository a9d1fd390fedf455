//! Document loading.
//!
//! A load fetches the structural document and the PDF bytes concurrently,
//! rasterizes the PDF into page previews, builds the overlay pages and
//! registers the document fonts for display. Starting a new load aborts the
//! one in flight.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::{AbortHandle, Abortable};

use super::client::EditorBackend;
use crate::config::EditorConfig;
use crate::editor::EditorSession;
use crate::error::{Error, Result};
use crate::fonts::{FontHost, FontRegistrySession};
use crate::layout::{build_editor_pages, PageBackground};
use crate::model::{EditorPage, FontDescriptor};

/// Renders PDF pages into preview images.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    /// One preview per page, in page order.
    async fn rasterize(&self, pdf: &[u8]) -> Result<Vec<PageBackground>>;
}

/// Rasterizer that renders nothing; pages keep their structural size.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreview;

#[async_trait]
impl PageRasterizer for NoPreview {
    async fn rasterize(&self, _pdf: &[u8]) -> Result<Vec<PageBackground>> {
        Ok(Vec::new())
    }
}

/// Everything a load produces.
#[derive(Debug)]
pub struct LoadedDocument {
    /// Overlay pages
    pub pages: Vec<EditorPage>,
    /// Document font table
    pub fonts: Vec<FontDescriptor>,
    /// Display fonts registered for this document
    pub registry: FontRegistrySession,
}

impl LoadedDocument {
    /// Make this the session's document, disposing the previous one's fonts.
    pub fn install(self, session: &mut EditorSession) {
        session.replace_document(self.pages, self.fonts, Some(self.registry));
    }
}

/// Loads documents, keeping at most one load in flight.
pub struct DocumentLoader {
    backend: Arc<dyn EditorBackend>,
    rasterizer: Arc<dyn PageRasterizer>,
    font_host: Arc<dyn FontHost>,
    config: EditorConfig,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl std::fmt::Debug for DocumentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentLoader").field("config", &self.config).finish()
    }
}

impl DocumentLoader {
    /// Create a loader.
    pub fn new(
        backend: Arc<dyn EditorBackend>,
        rasterizer: Arc<dyn PageRasterizer>,
        font_host: Arc<dyn FontHost>,
        config: EditorConfig,
    ) -> Self {
        Self {
            backend,
            rasterizer,
            font_host,
            config,
            in_flight: Mutex::new(None),
        }
    }

    /// Load the document at `pdf_url`.
    ///
    /// Returns [`Error::Cancelled`] when a later `load` (or [`cancel`](Self::cancel))
    /// superseded this one, and [`Error::EmptyDocument`] when there are no pages.
    pub async fn load(&self, pdf_url: &str) -> Result<LoadedDocument> {
        let (handle, registration) = AbortHandle::new_pair();
        if let Some(previous) = self.swap_in_flight(Some(handle)) {
            log::debug!("Superseding in-flight document load");
            previous.abort();
        }

        let result = Abortable::new(self.load_inner(pdf_url), registration).await;
        match result {
            Ok(loaded) => loaded,
            Err(_) => {
                log::debug!("Document load for {} cancelled", pdf_url);
                Err(Error::Cancelled)
            },
        }
    }

    /// Abort the load in flight, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.swap_in_flight(None) {
            previous.abort();
        }
    }

    fn swap_in_flight(&self, next: Option<AbortHandle>) -> Option<AbortHandle> {
        match self.in_flight.lock() {
            Ok(mut guard) => std::mem::replace(&mut *guard, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        }
    }

    async fn load_inner(&self, pdf_url: &str) -> Result<LoadedDocument> {
        let (document, pdf) = futures::try_join!(
            self.backend.fetch_document(pdf_url),
            self.backend.fetch_pdf(pdf_url)
        )?;

        if document.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let backgrounds = self
            .rasterizer
            .rasterize(&pdf)
            .await
            .map_err(|e| match e {
                Error::Load(_) | Error::Cancelled => e,
                other => Error::Load(format!("Failed to render PDF pages: {}", other)),
            })?;

        let pages = build_editor_pages(&document, &backgrounds, &self.config);
        if pages.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let registry = FontRegistrySession::register(Arc::clone(&self.font_host), &document.fonts).await;
        log::info!(
            "Loaded {} pages from {} ({} display fonts)",
            pages.len(),
            pdf_url,
            registry.registered_count()
        );

        Ok(LoadedDocument {
            pages,
            fonts: document.fonts,
            registry,
        })
    }
}
