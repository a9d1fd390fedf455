//! Integration tests for building overlay pages from structural documents.

use pdf_overlay::layout::{build_editor_pages, PageBackground};
use pdf_overlay::model::StructuralDocument;
use pdf_overlay::{DedupConfig, EditorConfig};

fn document(json: &str) -> StructuralDocument {
    StructuralDocument::from_json(json).unwrap()
}

#[test]
fn test_full_document_round() {
    let doc = document(
        r#"{
            "pages": [{
                "pageNumber": 1,
                "width": 612,
                "height": 792,
                "textElements": [
                    {"id": "t0", "text": "Invoice", "x": 72, "y": 720, "fontSize": 24, "fontId": "F1",
                     "fillColor": {"colorSpace": "DeviceRGB", "components": [1, 0, 0]}},
                    {"text": "Total", "x": 72, "y": 100, "fontSize": 12}
                ],
                "imageElements": [
                    {"x": 400, "y": 600, "width": 100, "height": 50, "imageData": "data:image/png;base64,AAAA"},
                    {"x": 0, "y": 0, "width": 100, "height": 50, "imageData": null}
                ]
            }],
            "fonts": [{"id": "F1", "baseName": "ABCDEF+Helvetica-Bold"}]
        }"#,
    );

    let pages = build_editor_pages(&doc, &[], &EditorConfig::default());
    assert_eq!(pages.len(), 1);
    let page = &pages[0];
    assert_eq!((page.width, page.height), (612.0, 792.0));

    let invoice = page.text_box("t0").unwrap();
    assert_eq!(invoice.top, 72.0);
    assert_eq!(invoice.left, 72.0);
    assert_eq!(invoice.font_size, 24.0);
    assert_eq!(invoice.base_font.as_deref(), Some("ABCDEF+Helvetica-Bold"));
    assert!(invoice.is_bold());
    assert!(invoice.color.is_some());

    let total = page.text_box("text-1").unwrap();
    assert_eq!(total.text, "Total");

    assert_eq!(page.image_boxes.len(), 1);
    let image = &page.image_boxes[0];
    assert_eq!(image.id, "image-0");
    assert_eq!(image.top, 792.0 - 600.0 - 50.0);
    assert!(page.boxes_within_bounds());
}

#[test]
fn test_page_cover_image_is_dropped() {
    let doc = document(
        r#"{"pages": [{"width": 612, "height": 792, "imageElements": [
            {"x": 0, "y": 0, "width": 600, "height": 780, "imageData": "data:image/jpeg;base64,AAAA"},
            {"x": 10, "y": 10, "width": 100, "height": 100, "imageData": "data:image/jpeg;base64,AAAA"}
        ]}]}"#,
    );
    let pages = build_editor_pages(&doc, &[], &EditorConfig::default());
    assert_eq!(pages[0].image_boxes.len(), 1);
    assert_eq!(pages[0].image_boxes[0].width, 100.0);
}

#[test]
fn test_duplicate_fragments_collapse() {
    let doc = document(
        r#"{"pages": [{"width": 612, "height": 792, "textElements": [
            {"text": "100", "x": 300, "y": 500, "width": 40, "height": 12, "fontSize": 12},
            {"text": "$100", "x": 300.5, "y": 500.5, "width": 40, "height": 12, "fontSize": 12},
            {"text": "Other", "x": 50, "y": 500, "width": 40, "height": 12, "fontSize": 12}
        ]}]}"#,
    );
    let pages = build_editor_pages(&doc, &[], &EditorConfig::default());
    let texts: Vec<&str> = pages[0].text_boxes.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(texts.len(), 2);
    assert!(texts.contains(&"$100"));
    assert!(texts.contains(&"Other"));
}

#[test]
fn test_dedup_thresholds_are_configurable() {
    let doc = document(
        r#"{"pages": [{"width": 612, "height": 792, "textElements": [
            {"text": "100", "x": 300, "y": 500, "width": 40, "height": 12, "fontSize": 12},
            {"text": "$100", "x": 300.5, "y": 500.5, "width": 40, "height": 12, "fontSize": 12}
        ]}]}"#,
    );
    let strict = EditorConfig::default().with_dedup(
        DedupConfig::default()
            .with_position_epsilon(0.0)
            .with_iou_threshold(1.1),
    );
    let pages = build_editor_pages(&doc, &[], &strict);
    assert_eq!(pages[0].text_boxes.len(), 2);
}

#[test]
fn test_background_provides_size_and_preview() {
    let doc = document(r#"{"pages": [{"textElements": [{"text": "x", "x": 10, "y": 10}]}]}"#);
    let backgrounds = vec![PageBackground {
        data_url: Some("data:image/png;base64,AAAA".to_string()),
        width: Some(300.0),
        height: Some(400.0),
    }];
    let pages = build_editor_pages(&doc, &backgrounds, &EditorConfig::default());
    assert_eq!((pages[0].width, pages[0].height), (300.0, 400.0));
    assert_eq!(pages[0].background.as_deref(), Some("data:image/png;base64,AAAA"));
}

#[test]
fn test_default_page_size() {
    let doc = document(r#"{"pages": [{}]}"#);
    let pages = build_editor_pages(&doc, &[], &EditorConfig::default());
    assert_eq!((pages[0].width, pages[0].height), (612.0, 792.0));
    assert!(pages[0].text_boxes.is_empty());
}

#[test]
fn test_offpage_elements_are_clamped() {
    let doc = document(
        r#"{"pages": [{"width": 200, "height": 200, "textElements": [
            {"text": "far right", "x": 5000, "y": -40, "fontSize": 12},
            {"text": "a very long line of text that is wider than the page itself", "x": -30, "y": 500}
        ], "imageElements": [
            {"x": 190, "y": 190, "width": 64, "height": 64, "imageData": "data:image/png;base64,AAAA"}
        ]}]}"#,
    );
    let pages = build_editor_pages(&doc, &[], &EditorConfig::default());
    assert!(pages[0].boxes_within_bounds());
}

#[test]
fn test_oversized_font_stays_on_page() {
    let doc = document(
        r#"{"pages": [{"width": 612, "height": 792, "textElements": [
            {"text": "HUGE", "x": 10, "y": 700, "fontSize": 1000}
        ]}]}"#,
    );
    let pages = build_editor_pages(&doc, &[], &EditorConfig::default());
    let huge = &pages[0].text_boxes[0];
    assert!(huge.top >= 0.0);
    assert!(huge.top + huge.height <= 792.0);
    assert!(pages[0].boxes_within_bounds());
}
