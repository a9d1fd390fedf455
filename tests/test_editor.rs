//! Integration tests for the editing session.

use pdf_overlay::editor::{EditorSession, ResizeMode};
use pdf_overlay::geometry::{Point, Rect};
use pdf_overlay::model::{BoxKind, EditorPage, FontDescriptor, ImageBox, TextBox};
use pdf_overlay::EditorConfig;
use proptest::prelude::*;

fn text_box(id: &str, text: &str, left: f32, top: f32) -> TextBox {
    TextBox {
        id: id.to_string(),
        text: text.to_string(),
        left,
        top,
        width: 80.0,
        height: 20.0,
        font_size: 12.0,
        font_weight: None,
        font_style: None,
        font_id: None,
        base_font: None,
        color: None,
        group_id: None,
    }
}

fn session() -> EditorSession {
    let mut page = EditorPage::new(612.0, 792.0);
    page.text_boxes = vec![
        text_box("header", "Invoice ", 72.0, 72.0),
        text_box("amount", "$100", 72.0, 100.0),
        text_box("footer", "Thanks", 300.0, 700.0),
    ];
    page.image_boxes = vec![ImageBox {
        id: "logo".to_string(),
        data_url: Some("data:image/png;base64,AAAA".to_string()),
        left: 400.0,
        top: 40.0,
        width: 100.0,
        height: 50.0,
    }];
    EditorSession::with_pages(vec![page, EditorPage::new(612.0, 792.0)], Vec::new(), EditorConfig::default())
}

#[test]
fn test_history_is_capped() {
    let mut s = session();
    for i in 0..60 {
        s.set_text(0, "header", &format!("edit {}", i)).unwrap();
    }
    assert_eq!(s.history().undo_len(), 50);

    let mut undone = 0;
    while s.undo() {
        undone += 1;
    }
    assert_eq!(undone, 50);
    assert_eq!(s.page(0).unwrap().text_box("header").unwrap().text, "edit 9");
}

#[test]
fn test_history_limit_is_configurable() {
    let pages = vec![EditorPage::new(612.0, 792.0)];
    let mut s = EditorSession::with_pages(pages, Vec::new(), EditorConfig::default().with_history_limit(3));
    for _ in 0..5 {
        s.add_text_at(0, Point::new(10.0, 10.0)).unwrap();
    }
    assert_eq!(s.history().undo_len(), 3);
}

#[test]
fn test_config_survives_document_replacement() {
    let config = EditorConfig::default().with_history_limit(2);
    let mut s = EditorSession::new(config);
    s.replace_document(vec![EditorPage::new(595.0, 842.0)], Vec::new(), None);
    assert_eq!(s.config().history_limit, 2);
    assert_eq!(s.history().limit(), 2);
    for _ in 0..4 {
        s.add_text_at(0, Point::new(10.0, 10.0)).unwrap();
    }
    assert_eq!(s.history().undo_len(), 2);
}

#[test]
fn test_undo_redo_round() {
    let mut s = session();
    let id = s.add_text_at(0, Point::new(50.0, 50.0)).unwrap();
    s.set_text(0, &id, "Paid").unwrap();
    assert!(s.is_dirty());

    assert!(s.undo());
    assert_eq!(s.page(0).unwrap().text_box(&id).unwrap().text, "New text");
    assert!(s.undo());
    assert!(s.page(0).unwrap().text_box(&id).is_none());
    assert!(!s.undo());

    assert!(s.redo());
    assert!(s.redo());
    assert_eq!(s.page(0).unwrap().text_box(&id).unwrap().text, "Paid");
    assert!(!s.redo());
}

#[test]
fn test_new_edit_clears_redo() {
    let mut s = session();
    s.set_text(0, "header", "A").unwrap();
    assert!(s.undo());
    assert!(s.history().can_redo());
    s.set_text(0, "header", "B").unwrap();
    assert!(!s.history().can_redo());
}

#[test]
fn test_unknown_box_records_nothing() {
    let mut s = session();
    s.set_text(0, "missing", "x").unwrap();
    assert_eq!(s.history().undo_len(), 0);
    assert!(!s.is_dirty());
}

#[test]
fn test_page_out_of_range() {
    let mut s = session();
    assert!(s.set_text(7, "header", "x").is_err());
    assert!(s.add_text_at(2, Point::new(0.0, 0.0)).is_err());
}

#[test]
fn test_join_selected_boxes() {
    let mut s = session();
    let before = s.pages().to_vec();
    s.click_text(0, "amount", false).unwrap();
    s.click_text(0, "header", true).unwrap();
    let merged = s.join_selection().unwrap().unwrap();

    let page = s.page(0).unwrap();
    assert_eq!(merged, "header");
    assert_eq!(page.text_boxes.len(), 2);
    let joined = page.text_box("header").unwrap();
    assert_eq!(joined.text, "Invoice\n$100");
    assert_eq!(joined.rect(), Rect::new(72.0, 72.0, 80.0, 48.0));
    assert_eq!(s.history().undo_len(), 1);

    assert!(s.undo());
    assert_eq!(s.pages(), &before[..]);
}

#[test]
fn test_join_needs_two_boxes() {
    let mut s = session();
    s.click_text(0, "amount", false).unwrap();
    assert_eq!(s.join_selection().unwrap(), None);
    assert_eq!(s.history().undo_len(), 0);
}

#[test]
fn test_marquee_then_delete() {
    let mut s = session();
    s.marquee_select(0, Rect::new(60.0, 60.0, 50.0, 50.0)).unwrap();
    assert_eq!(s.selected_text_boxes().len(), 2);
    s.delete_selection().unwrap();
    let page = s.page(0).unwrap();
    assert_eq!(page.text_boxes.len(), 1);
    assert_eq!(page.text_boxes[0].id, "footer");
    assert!(s.selection().is_none());
}

#[test]
fn test_style_edits_apply_to_selection() {
    let mut s = session();
    s.click_text(0, "header", false).unwrap();
    s.click_text(0, "amount", true).unwrap();
    s.toggle_bold().unwrap();
    s.set_color("#ff0000").unwrap();
    s.adjust_font_size(500.0).unwrap();

    for b in s.selected_text_boxes() {
        assert!(b.is_bold());
        assert_eq!(b.color.as_deref(), Some("#ff0000"));
        assert_eq!(b.font_size, 200.0);
    }
    assert!(!s.page(0).unwrap().text_box("footer").unwrap().is_bold());
    assert_eq!(s.selected_color(), "#ff0000");
    assert_eq!(s.history().undo_len(), 3);
}

#[test]
fn test_italic_requires_italic_face() {
    let mut page = EditorPage::new(612.0, 792.0);
    let mut serif = text_box("serif", "x", 10.0, 10.0);
    serif.font_id = Some("F1".to_string());
    page.text_boxes = vec![serif];
    let fonts = vec![FontDescriptor {
        id: Some("F1".to_string()),
        base_name: Some("Courier".to_string()),
        ..Default::default()
    }];
    let mut s = EditorSession::with_pages(vec![page], fonts, EditorConfig::default());
    s.click_text(0, "serif", false).unwrap();
    assert!(!s.selected_supports_italic());
    s.toggle_italic().unwrap();
    assert!(!s.page(0).unwrap().text_box("serif").unwrap().is_italic());
    assert_eq!(s.history().undo_len(), 0);
}

#[test]
fn test_group_drag_moves_together() {
    let mut s = session();
    let ids = vec!["header".to_string(), "amount".to_string()];
    s.begin_group_drag(0, &ids, Point::new(0.0, 0.0)).unwrap();
    s.pointer_move(Point::new(10.0, 5.0));
    s.pointer_up();

    let page = s.page(0).unwrap();
    assert_eq!((page.text_box("header").unwrap().left, page.text_box("header").unwrap().top), (82.0, 77.0));
    assert_eq!((page.text_box("amount").unwrap().left, page.text_box("amount").unwrap().top), (82.0, 105.0));
    assert_eq!(s.history().undo_len(), 1);
}

#[test]
fn test_image_resize_keeps_minimum() {
    let mut s = session();
    s.begin_resize(0, BoxKind::Image, "logo", ResizeMode::Corner, Point::new(500.0, 90.0), false)
        .unwrap();
    s.pointer_move(Point::new(0.0, 0.0));
    s.pointer_up();
    let logo = s.page(0).unwrap().image_box("logo").unwrap();
    assert_eq!((logo.width, logo.height), (32.0, 32.0));
}

#[test]
fn test_pointer_move_without_interaction_is_noop() {
    let mut s = session();
    let before = s.pages().to_vec();
    s.pointer_move(Point::new(100.0, 100.0));
    assert_eq!(s.pages(), &before[..]);
}

proptest! {
    #[test]
    fn prop_drag_stays_on_page(dx in -2000.0f32..2000.0, dy in -2000.0f32..2000.0) {
        let mut s = session();
        s.begin_text_drag(0, "footer", Point::new(300.0, 700.0), false).unwrap();
        s.pointer_move(Point::new(300.0 + dx, 700.0 + dy));
        s.pointer_up();
        prop_assert!(s.page(0).unwrap().boxes_within_bounds());

        s.begin_image_drag(0, "logo", Point::new(0.0, 0.0)).unwrap();
        s.pointer_move(Point::new(dx, dy));
        s.pointer_up();
        prop_assert!(s.page(0).unwrap().boxes_within_bounds());
        prop_assert_eq!(s.history().undo_len(), 2);
    }

    #[test]
    fn prop_resize_stays_on_page(
        dx in -2000.0f32..2000.0,
        dy in -2000.0f32..2000.0,
        mode in prop_oneof![
            Just(ResizeMode::Corner),
            Just(ResizeMode::TextTop),
            Just(ResizeMode::TextBottom),
        ],
    ) {
        let mut s = session();
        s.begin_resize(0, BoxKind::Text, "amount", mode, Point::new(0.0, 0.0), false).unwrap();
        s.pointer_move(Point::new(dx, dy));
        s.pointer_up();
        let page = s.page(0).unwrap();
        prop_assert!(page.boxes_within_bounds());
        let amount = page.text_box("amount").unwrap();
        prop_assert!(amount.width > 0.0 && amount.height > 0.0);
    }

    #[test]
    fn prop_group_resize_stays_on_page(dx in -2000.0f32..2000.0, dy in -2000.0f32..2000.0) {
        let mut s = session();
        let ids = vec!["header".to_string(), "amount".to_string(), "footer".to_string()];
        s.begin_group_resize(0, &ids, Point::new(0.0, 0.0)).unwrap();
        s.pointer_move(Point::new(dx, dy));
        s.pointer_up();
        prop_assert!(s.page(0).unwrap().boxes_within_bounds());
    }
}
