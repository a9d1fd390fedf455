//! The shared fallback font.
//!
//! Fetched at most once per session; a failed fetch is remembered too, so
//! export falls through to the standard font without retrying.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::config::ExportConfig;
use crate::error::{Error, Result};

/// Where the fallback font program comes from.
#[async_trait]
pub trait FallbackFontSource: Send + Sync {
    /// Fetch the font program.
    async fn fetch(&self) -> Result<Vec<u8>>;
}

/// Fallback font downloaded from a URL.
#[derive(Debug, Clone)]
pub struct HttpFallbackFont {
    client: reqwest::Client,
    url: String,
}

impl HttpFallbackFont {
    /// Fetch from `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl FallbackFontSource for HttpFallbackFont {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Font(format!(
                "fallback font request returned {}",
                response.status()
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Fallback font already in memory.
#[derive(Debug, Clone)]
pub struct StaticFallbackFont(Arc<Vec<u8>>);

impl StaticFallbackFont {
    /// Serve `data`.
    pub fn new(data: Vec<u8>) -> Self {
        Self(Arc::new(data))
    }
}

#[async_trait]
impl FallbackFontSource for StaticFallbackFont {
    async fn fetch(&self) -> Result<Vec<u8>> {
        Ok(self.0.as_ref().clone())
    }
}

/// Memoized fallback font for one session.
pub struct FallbackFontCache {
    source: Option<Arc<dyn FallbackFontSource>>,
    cell: OnceCell<Option<Arc<Vec<u8>>>>,
}

impl std::fmt::Debug for FallbackFontCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackFontCache")
            .field("resolved", &self.cell.initialized())
            .finish()
    }
}

impl FallbackFontCache {
    /// Cache the first result of `source`.
    pub fn new(source: Arc<dyn FallbackFontSource>) -> Self {
        Self {
            source: Some(source),
            cell: OnceCell::new(),
        }
    }

    /// Download from the configured fallback URL.
    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(Arc::new(HttpFallbackFont::new(config.fallback_font_url.clone())))
    }

    /// No fallback font: export goes straight to the standard font.
    pub fn disabled() -> Self {
        Self {
            source: None,
            cell: OnceCell::new_with(Some(None)),
        }
    }

    /// The fallback program, fetching it on first call.
    pub async fn get(&self) -> Option<Arc<Vec<u8>>> {
        self.cell
            .get_or_init(|| async {
                let source = self.source.as_ref()?;
                match source.fetch().await {
                    Ok(data) => {
                        log::info!("Fetched fallback font ({} bytes)", data.len());
                        Some(Arc::new(data))
                    },
                    Err(e) => {
                        log::warn!("Fallback font unavailable, using the standard font: {}", e);
                        None
                    },
                }
            })
            .await
            .clone()
    }

    /// Whether the fetch already happened.
    pub fn is_resolved(&self) -> bool {
        self.cell.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl FallbackFontSource for CountingSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(Error::Http("offline".to_string()))
            } else {
                Ok(vec![1, 2, 3])
            }
        }
    }

    #[tokio::test]
    async fn test_fetches_once() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let cache = FallbackFontCache::new(source.clone());
        assert!(!cache.is_resolved());
        assert_eq!(cache.get().await.as_deref(), Some(&vec![1, 2, 3]));
        assert_eq!(cache.get().await.as_deref(), Some(&vec![1, 2, 3]));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_resolved());
    }

    #[tokio::test]
    async fn test_failure_is_memoized() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let cache = FallbackFontCache::new(source.clone());
        assert!(cache.get().await.is_none());
        assert!(cache.get().await.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_and_static() {
        assert!(FallbackFontCache::disabled().get().await.is_none());
        let cache = FallbackFontCache::new(Arc::new(StaticFallbackFont::new(b"font".to_vec())));
        assert_eq!(cache.get().await.unwrap().as_slice(), b"font");
    }
}
