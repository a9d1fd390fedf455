//! Integration tests for PDF re-serialization.

use std::io::Cursor;

use base64::Engine;
use pdf_overlay::layout::build_editor_pages;
use pdf_overlay::model::{EditorPage, ImageBox, StructuralDocument, TextBox};
use pdf_overlay::writer::export_pages;
use pdf_overlay::{EditorConfig, Error, ExportConfig};

fn text_box(id: &str, text: &str, left: f32, top: f32) -> TextBox {
    TextBox {
        id: id.to_string(),
        text: text.to_string(),
        left,
        top,
        width: 200.0,
        height: 48.0,
        font_size: 20.0,
        font_weight: None,
        font_style: None,
        font_id: None,
        base_font: None,
        color: Some("rgb(255, 0, 0)".to_string()),
        group_id: None,
    }
}

fn image_box(id: &str, data_url: &str, left: f32, top: f32) -> ImageBox {
    ImageBox {
        id: id.to_string(),
        data_url: Some(data_url.to_string()),
        left,
        top,
        width: 100.0,
        height: 50.0,
    }
}

fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, base64::engine::general_purpose::STANDARD.encode(bytes))
}

fn png_with_alpha() -> String {
    let img = image::RgbaImage::from_fn(4, 4, |x, y| image::Rgba([0, 0, 255, if x == y { 0 } else { 255 }]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageOutputFormat::Png)
        .unwrap();
    data_url("image/png", &out.into_inner())
}

fn jpeg() -> String {
    let img = image::RgbImage::from_pixel(16, 8, image::Rgb([20, 120, 20]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageOutputFormat::Jpeg(85))
        .unwrap();
    data_url("image/jpeg", &out.into_inner())
}

fn export(pages: &[EditorPage], config: &ExportConfig) -> String {
    let bytes = export_pages(pages, &[], None, config).unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[test]
fn test_text_lines_at_baselines() {
    let mut page = EditorPage::new(612.0, 792.0);
    page.text_boxes.push(text_box("t", "Hello\nWorld", 50.0, 100.0));
    let pdf = export(&[page], &ExportConfig::default());

    assert!(pdf.starts_with("%PDF-1.7"));
    assert!(pdf.contains("1 0 0 rg"));
    assert!(pdf.contains("/F0 20 Tf"));
    assert!(pdf.contains("1 0 0 1 50 672 Tm\n(Hello) Tj"));
    assert!(pdf.contains("1 0 0 1 50 648 Tm\n(World) Tj"));
    assert!(pdf.contains("/Encoding /WinAnsiEncoding"));
    assert!(pdf.trim_end().ends_with("%%EOF"));
}

#[test]
fn test_one_output_page_per_editor_page() {
    let pages = vec![EditorPage::new(612.0, 792.0), EditorPage::new(595.0, 842.0)];
    let pdf = export(&pages, &ExportConfig::default());
    assert!(pdf.contains("/Count 2"));
    assert!(pdf.contains("/MediaBox [0 0 612 792]"));
    assert!(pdf.contains("/MediaBox [0 0 595 842]"));
    assert!(!pdf.contains("/Font"));
}

#[test]
fn test_images_embedded_once() {
    let png = png_with_alpha();
    let mut first = EditorPage::new(612.0, 792.0);
    first.image_boxes.push(image_box("a", &png, 10.0, 20.0));
    first.image_boxes.push(image_box("b", &png, 300.0, 20.0));
    let mut second = EditorPage::new(612.0, 792.0);
    second.image_boxes.push(image_box("c", &png, 10.0, 700.0));
    second.image_boxes.push(image_box("d", &jpeg(), 200.0, 700.0));

    let pdf = export(&[first, second], &ExportConfig::default());

    // PNG image plus its soft mask, then the JPEG
    assert_eq!(pdf.matches("/Subtype /Image").count(), 3);
    assert_eq!(pdf.matches("/SMask").count(), 1);
    assert!(pdf.contains("/Filter /DCTDecode"));
    assert!(pdf.contains("100 0 0 50 10 722 cm\n/Im1 Do"));
    assert!(pdf.contains("100 0 0 50 300 722 cm\n/Im1 Do"));
    assert!(pdf.contains("100 0 0 50 10 42 cm\n/Im1 Do"));
    assert!(pdf.contains("100 0 0 50 200 42 cm\n/Im2 Do"));
}

#[test]
fn test_images_painted_before_text() {
    let mut page = EditorPage::new(612.0, 792.0);
    page.text_boxes.push(text_box("t", "Caption", 10.0, 10.0));
    page.image_boxes.push(image_box("i", &jpeg(), 10.0, 100.0));
    let pdf = export(&[page], &ExportConfig::default());

    let white = pdf.find("1 1 1 rg").unwrap();
    let image = pdf.find("/Im1 Do").unwrap();
    let text = pdf.find("(Caption) Tj").unwrap();
    assert!(white < image && image < text);
}

#[test]
fn test_compressed_output() {
    let mut page = EditorPage::new(612.0, 792.0);
    page.text_boxes.push(text_box("t", "Hidden", 50.0, 100.0));
    let pdf = export(&[page], &ExportConfig::default().with_compress(true));
    assert!(pdf.contains("/Filter /FlateDecode"));
    assert!(!pdf.contains("(Hidden) Tj"));
}

#[test]
fn test_title_in_info() {
    let pdf = export(&[EditorPage::new(612.0, 792.0)], &ExportConfig::default().with_title("Quarterly"));
    assert!(pdf.contains("/Title (Quarterly)"));
    assert!(pdf.contains("/Producer"));
}

#[test]
fn test_empty_document_is_rejected() {
    let result = export_pages(&[], &[], None, &ExportConfig::default());
    assert!(matches!(result, Err(Error::EmptyDocument)));
}

#[test]
fn test_structural_document_to_file() {
    let document = StructuralDocument::from_json(
        r#"{"pages": [{"width": 612, "height": 792, "textElements": [
            {"text": "Total: 42", "x": 72, "y": 720, "fontSize": 14,
             "fillColor": {"colorSpace": "DeviceGray", "components": [0.5]}}
        ]}]}"#,
    )
    .unwrap();
    let pages = build_editor_pages(&document, &[], &EditorConfig::default());
    let bytes = export_pages(&pages, &document.fonts, None, &ExportConfig::default()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edited.pdf");
    std::fs::write(&path, &bytes).unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, bytes);
    let text = String::from_utf8_lossy(&written);
    assert!(text.contains("(Total: 42) Tj"));
    assert!(text.contains("0.50196 0.50196 0.50196 rg"));
}
