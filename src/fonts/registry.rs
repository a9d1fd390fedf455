//! Display font registration.
//!
//! Each loaded document gets a [`FontRegistrySession`] that decodes the
//! embedded font programs, hands them to the display environment (a
//! [`FontHost`]) and records which CSS family each font reference resolves
//! to. Disposing the session releases every handle it acquired.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use indexmap::IndexMap;

use super::descriptor::{
    build_font_family_name, guess_font_stack, pick_font_payload, FontFormat, INHERIT,
};
use crate::error::{Error, Result};
use crate::model::FontDescriptor;

/// Opaque handle to a font resource loaded into a [`FontHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(u64);

/// The display environment fonts are registered with.
#[async_trait]
pub trait FontHost: Send + Sync {
    /// Load `data` under `family`, returning a handle to release later.
    async fn load(&self, family: &str, data: Vec<u8>, format: Option<FontFormat>) -> Result<FontHandle>;

    /// Release a previously loaded font and its backing bytes.
    fn release(&self, handle: FontHandle);
}

#[derive(Debug, Clone)]
struct LoadedFace {
    family: String,
    format: Option<FontFormat>,
    size: usize,
}

/// In-process [`FontHost`] that validates programs and keeps them in memory.
///
/// TrueType and OpenType programs must parse with ttf-parser; WOFF and WOFF2
/// containers are accepted by signature.
#[derive(Debug, Default)]
pub struct MemoryFontHost {
    next_id: AtomicU64,
    faces: Mutex<HashMap<FontHandle, LoadedFace>>,
}

impl MemoryFontHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fonts currently loaded.
    pub fn active_count(&self) -> usize {
        self.faces.lock().map(|f| f.len()).unwrap_or(0)
    }

    /// Families currently loaded, sorted.
    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .faces
            .lock()
            .map(|f| f.values().map(|face| face.family.clone()).collect())
            .unwrap_or_default();
        families.sort();
        families
    }

    /// Total bytes held by loaded fonts.
    pub fn loaded_bytes(&self) -> usize {
        self.faces
            .lock()
            .map(|f| f.values().map(|face| face.size).sum())
            .unwrap_or(0)
    }

    fn validate(data: &[u8], format: Option<FontFormat>) -> Result<()> {
        if data.starts_with(b"wOFF") || data.starts_with(b"wOF2") {
            return Ok(());
        }
        if matches!(format, Some(FontFormat::Woff) | Some(FontFormat::Woff2)) {
            return Err(Error::Font("WOFF payload without WOFF signature".to_string()));
        }
        ttf_parser::Face::parse(data, 0)
            .map(|_| ())
            .map_err(|e| Error::Font(format!("font program rejected: {}", e)))
    }
}

#[async_trait]
impl FontHost for MemoryFontHost {
    async fn load(&self, family: &str, data: Vec<u8>, format: Option<FontFormat>) -> Result<FontHandle> {
        Self::validate(&data, format)?;
        let handle = FontHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        let face = LoadedFace {
            family: family.to_string(),
            format,
            size: data.len(),
        };
        log::debug!(
            "Loaded display font {} ({} bytes, {:?})",
            family,
            face.size,
            face.format.map(|f| f.css_name())
        );
        self.faces
            .lock()
            .map_err(|_| Error::Font("font host lock poisoned".to_string()))?
            .insert(handle, face);
        Ok(handle)
    }

    fn release(&self, handle: FontHandle) {
        if let Ok(mut faces) = self.faces.lock() {
            faces.remove(&handle);
        }
    }
}

/// Fonts registered for one loaded document.
pub struct FontRegistrySession {
    host: Arc<dyn FontHost>,
    handles: Vec<FontHandle>,
    /// Font reference (id, uid, `page:id`) -> registered family
    families: IndexMap<String, String>,
    failed: usize,
    disposed: bool,
}

impl std::fmt::Debug for FontRegistrySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRegistrySession")
            .field("handles", &self.handles.len())
            .field("families", &self.families)
            .field("failed", &self.failed)
            .field("disposed", &self.disposed)
            .finish()
    }
}

async fn register_one(host: &dyn FontHost, font: &FontDescriptor) -> Result<(String, FontHandle)> {
    let payload = pick_font_payload(font).ok_or_else(|| Error::Font("no font program".to_string()))?;
    let data = payload.decode()?;
    let family = build_font_family_name(font);
    let handle = host.load(&family, data, payload.format()).await?;
    Ok((family, handle))
}

impl FontRegistrySession {
    /// A session with nothing registered.
    pub fn empty(host: Arc<dyn FontHost>) -> Self {
        Self {
            host,
            handles: Vec::new(),
            families: IndexMap::new(),
            failed: 0,
            disposed: false,
        }
    }

    /// Register every font that carries an embedded program.
    ///
    /// Fonts are loaded concurrently; a font that fails to decode or load is
    /// logged and skipped without affecting the others.
    pub async fn register(host: Arc<dyn FontHost>, fonts: &[FontDescriptor]) -> Self {
        // Handles land in the session as each load completes, so dropping
        // this future mid-registration still releases them.
        let shared = Arc::clone(&host);
        let loader: &dyn FontHost = shared.as_ref();
        let mut session = Self::empty(host);
        let mut pending: FuturesUnordered<_> = fonts
            .iter()
            .filter(|f| pick_font_payload(f).is_some())
            .map(move |font| async move { (font, register_one(loader, font).await) })
            .collect();

        while let Some((font, result)) = pending.next().await {
            match result {
                Ok((family, handle)) => {
                    session.handles.push(handle);
                    let keys = [font.id.clone(), font.uid.clone(), font.scoped_key()];
                    for key in keys.into_iter().flatten() {
                        session.families.insert(key, family.clone());
                    }
                },
                Err(e) => {
                    session.failed += 1;
                    log::warn!(
                        "Failed to register font {} for editor: {}",
                        font.base_name.as_deref().or(font.id.as_deref()).unwrap_or("?"),
                        e
                    );
                },
            }
        }
        log::info!(
            "Registered {} display fonts ({} failed)",
            session.handles.len(),
            session.failed
        );
        session
    }

    /// Registered family for a font reference.
    pub fn family_for(&self, font_ref: &str) -> Option<&str> {
        self.families.get(font_ref).map(String::as_str)
    }

    /// CSS `font-family` value for a text box.
    ///
    /// A registered font yields `'family', <stack>` with the guessed generic
    /// stack (or `sans-serif` when the guess is `inherit`); otherwise the
    /// guessed stack alone.
    pub fn resolve_font_family(&self, font_id: Option<&str>, base_font: Option<&str>) -> String {
        let fallback = guess_font_stack(base_font);
        if let Some(registered) = font_id.and_then(|id| self.family_for(id)) {
            let stack = if fallback != INHERIT { fallback } else { "sans-serif" };
            return format!("'{}', {}", registered, stack);
        }
        fallback.to_string()
    }

    /// Number of fonts successfully registered.
    pub fn registered_count(&self) -> usize {
        self.handles.len()
    }

    /// Number of fonts that failed to register.
    pub fn failed_count(&self) -> usize {
        self.failed
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release every registered font. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for handle in self.handles.drain(..) {
            self.host.release(handle);
        }
        self.families.clear();
        self.disposed = true;
        log::info!("Font registry session disposed");
    }
}

impl Drop for FontRegistrySession {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn woff_font(id: &str, base_name: &str) -> FontDescriptor {
        let mut data = b"wOFF".to_vec();
        data.extend_from_slice(&[0u8; 16]);
        FontDescriptor {
            id: Some(id.to_string()),
            uid: Some(format!("uid-{}", id)),
            page_number: Some(1),
            base_name: Some(base_name.to_string()),
            web_program: Some(base64::engine::general_purpose::STANDARD.encode(data)),
            web_program_format: Some("woff".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_register_records_all_keys() {
        let host = Arc::new(MemoryFontHost::new());
        let fonts = vec![woff_font("F1", "ABCDEF+Arial-Bold")];
        let session = FontRegistrySession::register(host.clone(), &fonts).await;
        assert_eq!(session.registered_count(), 1);
        for key in ["F1", "uid-F1", "1:F1"] {
            assert_eq!(session.family_for(key), Some("pdf-font-Arial-Bold"));
        }
        assert_eq!(host.active_count(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let host = Arc::new(MemoryFontHost::new());
        let mut bad = woff_font("F2", "Broken");
        bad.web_program = Some(base64::engine::general_purpose::STANDARD.encode(b"junk"));
        bad.web_program_format = Some("truetype".to_string());
        let fonts = vec![bad, woff_font("F3", "Times-Roman"), FontDescriptor::default()];
        let session = FontRegistrySession::register(host.clone(), &fonts).await;
        assert_eq!(session.registered_count(), 1);
        assert_eq!(session.failed_count(), 1);
        assert!(session.family_for("F2").is_none());
        assert!(session.family_for("F3").is_some());
    }

    #[tokio::test]
    async fn test_resolve_font_family() {
        let host = Arc::new(MemoryFontHost::new());
        let fonts = vec![woff_font("F1", "TimesNewRoman"), woff_font("F2", "Garamond")];
        let session = FontRegistrySession::register(host, &fonts).await;
        assert_eq!(
            session.resolve_font_family(Some("F1"), Some("TimesNewRoman")),
            "'pdf-font-TimesNewRoman', \"Times New Roman\", Times, serif"
        );
        assert_eq!(
            session.resolve_font_family(Some("F2"), Some("Garamond")),
            "'pdf-font-Garamond', sans-serif"
        );
        assert_eq!(session.resolve_font_family(Some("F9"), Some("Courier")), super::super::descriptor::MONO_STACK);
        assert_eq!(session.resolve_font_family(None, None), "inherit");
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent() {
        let host = Arc::new(MemoryFontHost::new());
        let fonts = vec![woff_font("F1", "A"), woff_font("F2", "B")];
        let mut session = FontRegistrySession::register(host.clone(), &fonts).await;
        assert_eq!(host.active_count(), 2);
        session.dispose();
        assert_eq!(host.active_count(), 0);
        assert!(session.is_disposed());
        session.dispose();
        assert!(session.family_for("F1").is_none());
        drop(session);
        assert_eq!(host.active_count(), 0);
    }

    #[tokio::test]
    async fn test_drop_releases_handles() {
        let host = Arc::new(MemoryFontHost::new());
        {
            let _session = FontRegistrySession::register(host.clone(), &[woff_font("F1", "A")]).await;
            assert_eq!(host.active_count(), 1);
        }
        assert_eq!(host.active_count(), 0);
    }

    /// Loads every family normally except `pdf-font-Slow`, which never finishes in time.
    struct StallingHost {
        inner: Arc<MemoryFontHost>,
    }

    #[async_trait]
    impl FontHost for StallingHost {
        async fn load(&self, family: &str, data: Vec<u8>, format: Option<FontFormat>) -> Result<FontHandle> {
            if family == "pdf-font-Slow" {
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            }
            self.inner.load(family, data, format).await
        }

        fn release(&self, handle: FontHandle) {
            self.inner.release(handle)
        }
    }

    #[tokio::test]
    async fn test_abandoned_registration_releases_loaded_fonts() {
        let inner = Arc::new(MemoryFontHost::new());
        let host = Arc::new(StallingHost { inner: inner.clone() });
        let fonts = vec![woff_font("F1", "A"), woff_font("F2", "Slow"), woff_font("F3", "B")];

        let registering = FontRegistrySession::register(host, &fonts);
        let outcome = tokio::time::timeout(std::time::Duration::from_millis(50), registering).await;
        assert!(outcome.is_err());
        assert_eq!(inner.active_count(), 0);
    }
}
