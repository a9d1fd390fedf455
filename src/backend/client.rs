//! Backend service client.
//!
//! The backend turns a PDF URL into a structural document and accepts edited
//! PDFs, answering with the URL of the stored copy.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::model::StructuralDocument;

/// Upload file name expected by the backend.
pub const UPLOAD_FILE_NAME: &str = "edited.pdf";

/// The backend the editor loads from and uploads to.
#[async_trait]
pub trait EditorBackend: Send + Sync {
    /// Fetch the structural document extracted from `pdf_url`.
    async fn fetch_document(&self, pdf_url: &str) -> Result<StructuralDocument>;

    /// Download the PDF bytes at `pdf_url`.
    async fn fetch_pdf(&self, pdf_url: &str) -> Result<Vec<u8>>;

    /// Upload an edited PDF; returns the URL of the stored document.
    async fn upload(&self, pdf: Vec<u8>) -> Result<String>;
}

/// Pull the `error` message out of a JSON error body.
fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Interpret a document endpoint response.
///
/// The document is read from a `document` field, or from the body itself
/// when the backend answers with the bare document.
pub fn parse_document_response(success: bool, body: &str) -> Result<StructuralDocument> {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    if !success {
        let message = error_message(&value).unwrap_or_else(|| "Failed to load PDF structure".to_string());
        return Err(Error::Load(message));
    }
    if let Some(message) = error_message(&value) {
        return Err(Error::Load(message));
    }

    let document = match value {
        Value::Object(mut map) => match map.remove("document") {
            Some(document) => document,
            None => Value::Object(map),
        },
        _ => return Err(Error::Load("Failed to load PDF structure".to_string())),
    };
    if document.is_null() {
        return Ok(StructuralDocument::default());
    }
    Ok(serde_json::from_value(document)?)
}

/// Interpret an upload endpoint response: `{pdfUrl}` on success, `{error}` otherwise.
pub fn parse_upload_response(success: bool, body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let url = value
        .get("pdfUrl")
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty());
    match url {
        Some(url) if success => Ok(url.to_string()),
        _ => Err(Error::Upload(
            error_message(&value).unwrap_or_else(|| "upload was not accepted".to_string()),
        )),
    }
}

/// [`EditorBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl HttpBackend {
    /// Create a client for `config`.
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Absolute URL for `url`; relative URLs are resolved against the base URL.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", self.config.base_url, url)
        }
    }
}

#[async_trait]
impl EditorBackend for HttpBackend {
    async fn fetch_document(&self, pdf_url: &str) -> Result<StructuralDocument> {
        let url = self.config.document_url();
        log::debug!("Fetching structural document for {}", pdf_url);

        let response = self
            .client
            .get(&url)
            .query(&[("pdfUrl", pdf_url)])
            .send()
            .await
            .map_err(|e| Error::Load(format!("Failed to load PDF structure: {}", e)))?;
        let success = response.status().is_success();
        let body = response.text().await?;
        parse_document_response(success, &body)
    }

    async fn fetch_pdf(&self, pdf_url: &str) -> Result<Vec<u8>> {
        let url = self.resolve_url(pdf_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Load(format!("Unable to download generated PDF: {}", e)))?;
        if !response.status().is_success() {
            return Err(Error::Load(format!(
                "Unable to download generated PDF ({})",
                response.status()
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn upload(&self, pdf: Vec<u8>) -> Result<String> {
        let size = pdf.len();
        let part = reqwest::multipart::Part::bytes(pdf)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Upload(e.to_string()))?;
        let success = response.status().is_success();
        let body = response.text().await?;
        let url = parse_upload_response(success, &body)?;
        log::info!("Uploaded edited PDF ({} bytes) to {}", size, url);
        Ok(url)
    }
}
