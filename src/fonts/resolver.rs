//! Export-side font resolution.
//!
//! A [`FontResolver`] lives for one exported document. It embeds each
//! referenced font at most once, falls back to the shared fallback font and
//! then the standard font, and picks, for every line, the first font in that
//! chain that can encode it.

use std::collections::HashMap;
use std::sync::Arc;

use super::descriptor::pick_font_payload;
use super::embedded::EmbeddedFont;
use super::encoding::{encode_winansi, sanitize_to_ascii};
use crate::model::FontDescriptor;

/// Name of the built-in standard font.
pub const STANDARD_FONT: &str = "Helvetica";

/// A font usable in the exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRef {
    /// Index into the resolver's embedded fonts
    Embedded(usize),
    /// Helvetica with WinAnsi encoding
    Standard,
}

/// Font choice for one line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine {
    /// Font to draw with
    pub font: FontRef,
    /// Text to draw; differs from the input when sanitized
    pub text: String,
    /// Non-ASCII characters were replaced with `?`
    pub sanitized: bool,
}

/// Resolves text box fonts to embedded or standard fonts for one document.
#[derive(Debug)]
pub struct FontResolver<'a> {
    descriptors: &'a [FontDescriptor],
    fallback_data: Option<Arc<Vec<u8>>>,
    embedded: Vec<EmbeddedFont>,
    /// Cache key (`fontId`, else `baseFont`, else `default`) -> resolved font
    cache: HashMap<String, FontRef>,
    /// Lazily embedded fallback font
    fallback: Option<FontRef>,
    standard_used: bool,
}

impl<'a> FontResolver<'a> {
    /// Create a resolver over the document's fonts and the shared fallback program.
    pub fn new(descriptors: &'a [FontDescriptor], fallback_data: Option<Arc<Vec<u8>>>) -> Self {
        Self {
            descriptors,
            fallback_data,
            embedded: Vec::new(),
            cache: HashMap::new(),
            fallback: None,
            standard_used: false,
        }
    }

    fn find_descriptor(&self, font_id: Option<&str>, base_font: Option<&str>) -> Option<&'a FontDescriptor> {
        self.descriptors.iter().find(|f| {
            let by_id = font_id.is_some_and(|id| f.id.as_deref() == Some(id) || f.uid.as_deref() == Some(id));
            let by_name = base_font.is_some_and(|name| f.base_name.as_deref() == Some(name));
            by_id || by_name
        })
    }

    fn embed(&mut self, name: Option<String>, data: Arc<Vec<u8>>) -> crate::Result<FontRef> {
        let font = EmbeddedFont::from_data(name, data)?;
        self.embedded.push(font);
        Ok(FontRef::Embedded(self.embedded.len() - 1))
    }

    /// The fallback font, embedding it on first use; the standard font when
    /// no fallback program is available or it fails to parse.
    pub fn fallback_font(&mut self) -> FontRef {
        if let Some(font) = self.fallback {
            return font;
        }
        let font = match self.fallback_data.clone() {
            Some(data) => match self.embed(None, data) {
                Ok(font) => font,
                Err(e) => {
                    log::warn!("Fallback font could not be embedded, using {}: {}", STANDARD_FONT, e);
                    FontRef::Standard
                },
            },
            None => FontRef::Standard,
        };
        self.fallback = Some(font);
        font
    }

    /// Resolve the font for a text box, embedding its program if needed.
    pub fn font_for_box(&mut self, font_id: Option<&str>, base_font: Option<&str>) -> FontRef {
        let key = font_id.or(base_font).unwrap_or("default").to_string();
        if let Some(font) = self.cache.get(&key) {
            return *font;
        }

        let embedded = self.find_descriptor(font_id, base_font).and_then(|meta| {
            let payload = pick_font_payload(meta)?;
            let result = payload
                .decode()
                .and_then(|bytes| self.embed(meta.base_name.clone(), Arc::new(bytes)));
            match result {
                Ok(font) => Some(font),
                Err(e) => {
                    log::warn!("Failed to embed font {}: {}", key, e);
                    None
                },
            }
        });
        let font = match embedded {
            Some(font) => font,
            None => self.fallback_font(),
        };

        log::debug!("Resolved font {} to {:?}", key, font);
        self.cache.insert(key, font);
        font
    }

    /// Whether `font` has a glyph for every character of `text`.
    pub fn can_encode(&self, font: FontRef, text: &str) -> bool {
        match font {
            FontRef::Embedded(i) => self.embedded.get(i).is_some_and(|f| f.can_encode(text)),
            FontRef::Standard => encode_winansi(text).is_some(),
        }
    }

    /// Pick the first of `preferred`, fallback, standard that can encode `line`.
    ///
    /// When none can, non-ASCII characters are replaced with `?` and the line
    /// is drawn with the fallback font (or the standard font if the fallback
    /// cannot draw the substitute either).
    pub fn resolve_line(&mut self, preferred: FontRef, line: &str) -> ResolvedLine {
        let fallback = self.fallback_font();
        for font in [preferred, fallback, FontRef::Standard] {
            if self.can_encode(font, line) {
                return ResolvedLine {
                    font,
                    text: line.to_string(),
                    sanitized: false,
                };
            }
        }

        let text = sanitize_to_ascii(line);
        let font = if self.can_encode(fallback, &text) {
            fallback
        } else {
            FontRef::Standard
        };
        log::warn!("No font can encode line {:?}; drawing sanitized text", line);
        ResolvedLine {
            font,
            text,
            sanitized: true,
        }
    }

    /// Encode `text` for `font`, recording glyph usage.
    pub fn encode(&mut self, font: FontRef, text: &str) -> Vec<u8> {
        match font {
            FontRef::Embedded(i) => match self.embedded.get_mut(i) {
                Some(f) => f.encode_string(text),
                None => Vec::new(),
            },
            FontRef::Standard => {
                self.standard_used = true;
                encode_winansi(text).unwrap_or_else(|| encode_winansi(&sanitize_to_ascii(text)).unwrap_or_default())
            },
        }
    }

    /// Whether `font` already draws bold glyphs, so no faux bold is needed.
    pub fn is_bold_face(&self, font: FontRef) -> bool {
        match font {
            FontRef::Embedded(i) => self.embedded.get(i).is_some_and(|f| f.is_bold),
            FontRef::Standard => false,
        }
    }

    /// Page resource name for `font`.
    pub fn resource_name(font: FontRef) -> String {
        match font {
            FontRef::Embedded(i) => format!("F{}", i + 1),
            FontRef::Standard => "F0".to_string(),
        }
    }

    /// Whether any text was encoded with the standard font.
    pub fn standard_used(&self) -> bool {
        self.standard_used
    }

    /// Embedded fonts, indexed by [`FontRef::Embedded`].
    pub fn embedded_fonts(&self) -> &[EmbeddedFont] {
        &self.embedded
    }

    /// Number of embedded fonts.
    pub fn embedded_count(&self) -> usize {
        self.embedded.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_falls_back_to_standard() {
        let mut resolver = FontResolver::new(&[], None);
        assert_eq!(resolver.font_for_box(Some("F1"), None), FontRef::Standard);
        assert_eq!(resolver.embedded_count(), 0);
    }

    #[test]
    fn test_broken_program_falls_back() {
        use base64::Engine;
        let fonts = vec![FontDescriptor {
            id: Some("F1".to_string()),
            program: Some(base64::engine::general_purpose::STANDARD.encode(b"not a font")),
            ..Default::default()
        }];
        let mut resolver = FontResolver::new(&fonts, Some(Arc::new(b"also not a font".to_vec())));
        assert_eq!(resolver.font_for_box(Some("F1"), None), FontRef::Standard);
        // Cached by key, no second embedding attempt
        assert_eq!(resolver.font_for_box(Some("F1"), Some("Other")), FontRef::Standard);
        assert_eq!(resolver.embedded_count(), 0);
    }

    #[test]
    fn test_resolve_line_standard() {
        let mut resolver = FontResolver::new(&[], None);
        let line = resolver.resolve_line(FontRef::Standard, "Prix: 5 €");
        assert_eq!(line.font, FontRef::Standard);
        assert!(!line.sanitized);
    }

    #[test]
    fn test_resolve_line_sanitizes() {
        let mut resolver = FontResolver::new(&[], None);
        let line = resolver.resolve_line(FontRef::Standard, "日本 ok");
        assert_eq!(line.text, "?? ok");
        assert!(line.sanitized);
        assert_eq!(line.font, FontRef::Standard);
        assert_eq!(resolver.encode(line.font, &line.text), b"?? ok".to_vec());
        assert!(resolver.standard_used());
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(FontResolver::resource_name(FontRef::Standard), "F0");
        assert_eq!(FontResolver::resource_name(FontRef::Embedded(0)), "F1");
    }
}
