//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer.
//!
//! Objects are added with [`PdfWriter::add_object`] (or reserved with
//! [`PdfWriter::alloc_ref`] and filled in later) and written in object
//! number order by [`PdfWriter::finish`].

use std::collections::BTreeMap;
use std::io::Write;

use super::content_stream::ContentStreamBuilder;
use super::object_serializer::ObjectSerializer;
use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::object::{Dict, Object, ObjectRef};

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Whether to compress content streams
    pub compress: bool,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            creator: Some("pdf_overlay".to_string()),
            compress: false,
        }
    }
}

impl PdfWriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable stream compression.
    ///
    /// When enabled, page content streams are compressed using FlateDecode.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

impl From<&ExportConfig> for PdfWriterConfig {
    fn from(config: &ExportConfig) -> Self {
        Self {
            title: config.title.clone(),
            creator: config.creator.clone(),
            compress: config.compress,
            ..Self::default()
        }
    }
}

/// Compress data using Flate/Deflate compression.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// `D:YYYYMMDDHHmmSS+00'00'` for the current time.
fn pdf_date_now() -> String {
    chrono::Utc::now().format("D:%Y%m%d%H%M%S+00'00'").to_string()
}

/// PDF document writer.
///
/// Builds a complete PDF document with pages, fonts, images and content.
#[derive(Debug)]
pub struct PdfWriter {
    config: PdfWriterConfig,
    /// Object ID counter
    next_obj_id: u32,
    /// Objects by number
    objects: BTreeMap<u32, Object>,
    catalog_id: u32,
    pages_id: u32,
    page_refs: Vec<ObjectRef>,
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            next_obj_id: 3,
            objects: BTreeMap::new(),
            catalog_id: 1,
            pages_id: 2,
            page_refs: Vec::new(),
        }
    }

    /// Reserve an object number to be filled in with [`set_object`](Self::set_object).
    pub fn alloc_ref(&mut self) -> ObjectRef {
        let id = self.next_obj_id;
        self.next_obj_id += 1;
        ObjectRef::new(id, 0)
    }

    /// Add an object; returns its reference.
    pub fn add_object(&mut self, obj: Object) -> ObjectRef {
        let r = self.alloc_ref();
        self.objects.insert(r.id, obj);
        r
    }

    /// Fill a reserved object number.
    pub fn set_object(&mut self, r: ObjectRef, obj: Object) {
        self.objects.insert(r.id, obj);
    }

    /// Look up an added object.
    pub fn object(&self, r: ObjectRef) -> Option<&Object> {
        self.objects.get(&r.id)
    }

    /// Add a page of the given size drawing `content` with `resources`.
    pub fn add_page(
        &mut self,
        width: f32,
        height: f32,
        content: &ContentStreamBuilder,
        resources: Dict,
    ) -> Result<ObjectRef> {
        let raw_content = content.build()?;

        let stream = if self.config.compress {
            match compress_data(&raw_content) {
                Ok(compressed) => Object::stream(vec![("Filter", Object::name("FlateDecode"))], compressed),
                Err(e) => {
                    log::warn!("Content stream compression failed, writing uncompressed: {}", e);
                    Object::stream(vec![], raw_content)
                },
            }
        } else {
            Object::stream(vec![], raw_content)
        };
        let content_ref = self.add_object(stream);

        let page = Object::dict(vec![
            ("Type", Object::name("Page")),
            ("Parent", ObjectRef::new(self.pages_id, 0).into()),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::real(width),
                    Object::real(height),
                ]),
            ),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", content_ref.into()),
        ]);
        let page_ref = self.add_object(page);
        self.page_refs.push(page_ref);
        Ok(page_ref)
    }

    /// Number of pages added.
    pub fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    /// Build the complete PDF document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if self.page_refs.is_empty() {
            return Err(Error::Encode("document has no pages".to_string()));
        }

        let pages_obj = Object::dict(vec![
            ("Type", Object::name("Pages")),
            ("Kids", Object::Array(self.page_refs.iter().map(|r| (*r).into()).collect())),
            ("Count", Object::Integer(self.page_refs.len() as i64)),
        ]);
        let catalog_obj = Object::dict(vec![
            ("Type", Object::name("Catalog")),
            ("Pages", ObjectRef::new(self.pages_id, 0).into()),
        ]);
        self.objects.insert(self.catalog_id, catalog_obj);
        self.objects.insert(self.pages_id, pages_obj);

        let mut info_entries = Vec::new();
        if let Some(title) = &self.config.title {
            info_entries.push(("Title", Object::String(title.as_bytes().to_vec())));
        }
        if let Some(creator) = &self.config.creator {
            info_entries.push(("Creator", Object::String(creator.as_bytes().to_vec())));
            info_entries.push(("Producer", Object::String(creator.as_bytes().to_vec())));
        }
        info_entries.push(("CreationDate", Object::String(pdf_date_now().into_bytes())));
        let info_ref = self.add_object(Object::dict(info_entries));

        let serializer = ObjectSerializer::compact();
        let mut output = Vec::new();

        // PDF Header
        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut xref_offsets: Vec<usize> = Vec::with_capacity(self.objects.len());
        for (id, obj) in &self.objects {
            xref_offsets.push(output.len());
            serializer.write_indirect(&mut output, *id, 0, obj)?;
        }

        // Object numbers are dense: every reserved id must have been filled
        if xref_offsets.len() as u32 != self.next_obj_id - 1 {
            return Err(Error::Encode("reserved object was never written".to_string()));
        }

        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", self.next_obj_id)?;
        // Object 0 is always free
        writeln!(output, "0000000000 65535 f ")?;
        for offset in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = Object::dict(vec![
            ("Size", Object::Integer(self.next_obj_id as i64)),
            ("Root", ObjectRef::new(self.catalog_id, 0).into()),
            ("Info", info_ref.into()),
        ]);
        writeln!(output, "trailer")?;
        serializer.write_object(&mut output, &trailer)?;
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        Ok(output)
    }

    /// Save the PDF to a file.
    pub fn save(self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.finish()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}
