//! Edit operations over editor pages.
//!
//! These are plain functions over [`EditorPage`] and [`TextBox`] values; the
//! session wraps them with history snapshots and selection updates.

use lazy_static::lazy_static;
use regex::Regex;

use crate::geometry::{clamp, Point, Rect};
use crate::model::{EditorPage, FontStyle, FontWeight, TextBox};

lazy_static! {
    static ref RE_EXTRA_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Width of a newly added text box.
pub const NEW_TEXT_WIDTH: f32 = 220.0;
/// Height of a newly added text box.
pub const NEW_TEXT_HEIGHT: f32 = 40.0;
/// Font size of a newly added text box.
pub const NEW_TEXT_FONT_SIZE: f32 = 18.0;
/// Font size bounds for style edits.
pub const FONT_SIZE_RANGE: (f32, f32) = (4.0, 200.0);

/// Insert a default text box at `at`, clamped on the page. Returns its id.
pub fn add_text_box(page: &mut EditorPage, at: Point) -> String {
    let id = format!("text-new-{}", uuid::Uuid::new_v4());
    let text_box = TextBox {
        id: id.clone(),
        text: "New text".to_string(),
        left: clamp(at.x, 0.0, page.width - NEW_TEXT_WIDTH),
        top: clamp(at.y, 0.0, page.height - NEW_TEXT_HEIGHT),
        width: NEW_TEXT_WIDTH,
        height: NEW_TEXT_HEIGHT,
        font_size: NEW_TEXT_FONT_SIZE,
        font_weight: Some(FontWeight::normal()),
        font_style: Some(FontStyle::Normal),
        font_id: None,
        base_font: None,
        color: Some("#000000".to_string()),
        group_id: None,
    };
    page.text_boxes.push(text_box);
    id
}

/// Merged text of boxes already in reading order.
///
/// Each text is right-trimmed, lines are joined with `\n`, and runs of three
/// or more newlines collapse to two.
///
/// # Examples
///
/// ```
/// use pdf_overlay::editor::merge_texts;
///
/// assert_eq!(merge_texts(["Total ", "", "", "$5"]), "Total\n\n$5");
/// ```
pub fn merge_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    let joined = texts.into_iter().map(str::trim_end).collect::<Vec<_>>().join("\n");
    RE_EXTRA_NEWLINES.replace_all(&joined, "\n\n").into_owned()
}

/// Join the text boxes `ids` into one box spanning their union.
///
/// Boxes are ordered top to bottom, then left to right. The merged box keeps
/// the first box's id and styling and is appended to the page. Returns the
/// merged id, or `None` when fewer than two boxes match.
pub fn join_text_boxes(page: &mut EditorPage, ids: &[String]) -> Option<String> {
    let mut selected: Vec<&TextBox> = page.text_boxes.iter().filter(|b| ids.contains(&b.id)).collect();
    if selected.len() < 2 {
        return None;
    }
    selected.sort_by(|a, b| {
        if a.top == b.top {
            a.left.total_cmp(&b.left)
        } else {
            a.top.total_cmp(&b.top)
        }
    });

    let text = merge_texts(selected.iter().map(|b| b.text.as_str()));
    let bounds = Rect::bounding(selected.iter().map(|b| b.rect()).collect::<Vec<_>>().iter())?;
    let mut merged = selected[0].clone();
    merged.text = text;
    merged.set_rect(bounds);

    let id = merged.id.clone();
    page.text_boxes.retain(|b| !ids.contains(&b.id));
    page.text_boxes.push(merged);
    Some(id)
}

/// Remove the text boxes `ids`. Returns how many were removed.
pub fn delete_text_boxes(page: &mut EditorPage, ids: &[String]) -> usize {
    let before = page.text_boxes.len();
    page.text_boxes.retain(|b| !ids.contains(&b.id));
    before - page.text_boxes.len()
}

/// Remove an image box. Returns whether it existed.
pub fn delete_image_box(page: &mut EditorPage, id: &str) -> bool {
    let before = page.image_boxes.len();
    page.image_boxes.retain(|b| b.id != id);
    before != page.image_boxes.len()
}

/// Bold becomes `normal`; anything else becomes 700.
pub fn toggle_bold(text_box: &mut TextBox) {
    text_box.font_weight = Some(if text_box.is_bold() {
        FontWeight::normal()
    } else {
        FontWeight::Numeric(700)
    });
}

/// Italic becomes normal; anything else becomes italic.
pub fn toggle_italic(text_box: &mut TextBox) {
    text_box.font_style = Some(if text_box.is_italic() {
        FontStyle::Normal
    } else {
        FontStyle::Italic
    });
}

/// Set the font size, clamped to [`FONT_SIZE_RANGE`].
pub fn set_font_size(text_box: &mut TextBox, size: f32) {
    let (min, max) = FONT_SIZE_RANGE;
    text_box.font_size = clamp(size, min, max);
}

/// Change the font size by `delta`; a zero size counts as 12.
pub fn adjust_font_size(text_box: &mut TextBox, delta: f32) {
    let current = if text_box.font_size > 0.0 { text_box.font_size } else { 12.0 };
    set_font_size(text_box, current + delta);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_box(id: &str, text: &str, left: f32, top: f32) -> TextBox {
        TextBox {
            id: id.to_string(),
            text: text.to_string(),
            left,
            top,
            width: 40.0,
            height: 14.0,
            font_size: 12.0,
            font_weight: Some(FontWeight::Numeric(700)),
            font_style: None,
            font_id: Some("F1".to_string()),
            base_font: None,
            color: Some("#ff0000".to_string()),
            group_id: None,
        }
    }

    #[test]
    fn test_add_text_defaults() {
        let mut page = EditorPage::new(612.0, 792.0);
        let id = add_text_box(&mut page, Point::new(500.0, 780.0));
        let b = page.text_box(&id).unwrap();
        assert!(id.starts_with("text-new-"));
        assert_eq!((b.left, b.top, b.width, b.height), (392.0, 752.0, 220.0, 40.0));
        assert_eq!(b.font_size, 18.0);
        assert_eq!(b.text, "New text");
        assert_eq!(b.color.as_deref(), Some("#000000"));
        assert_eq!(b.font_weight, Some(FontWeight::normal()));
    }

    #[test]
    fn test_join_orders_and_spans() {
        let mut page = EditorPage::new(612.0, 792.0);
        page.text_boxes = vec![
            text_box("second", "World  ", 10.0, 40.0),
            text_box("other", "keep", 300.0, 300.0),
            text_box("first", "Hello", 50.0, 20.0),
        ];
        let ids = vec!["second".to_string(), "first".to_string()];
        let merged = join_text_boxes(&mut page, &ids).unwrap();
        assert_eq!(merged, "first");
        assert_eq!(page.text_boxes.len(), 2);
        let b = page.text_boxes.last().unwrap();
        assert_eq!(b.text, "Hello\nWorld");
        assert_eq!((b.left, b.top, b.width, b.height), (10.0, 20.0, 80.0, 34.0));
        assert_eq!(b.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_join_needs_two_boxes() {
        let mut page = EditorPage::new(612.0, 792.0);
        page.text_boxes = vec![text_box("a", "x", 0.0, 0.0)];
        assert!(join_text_boxes(&mut page, &["a".to_string(), "missing".to_string()]).is_none());
        assert_eq!(page.text_boxes.len(), 1);
    }

    #[test]
    fn test_toggles() {
        let mut b = text_box("a", "x", 0.0, 0.0);
        toggle_bold(&mut b);
        assert_eq!(b.font_weight, Some(FontWeight::normal()));
        toggle_bold(&mut b);
        assert_eq!(b.font_weight, Some(FontWeight::Numeric(700)));
        toggle_italic(&mut b);
        assert!(b.is_italic());
        toggle_italic(&mut b);
        assert_eq!(b.font_style, Some(FontStyle::Normal));
    }

    #[test]
    fn test_font_size_bounds() {
        let mut b = text_box("a", "x", 0.0, 0.0);
        adjust_font_size(&mut b, -100.0);
        assert_eq!(b.font_size, 4.0);
        set_font_size(&mut b, 500.0);
        assert_eq!(b.font_size, 200.0);
        b.font_size = 0.0;
        adjust_font_size(&mut b, 2.0);
        assert_eq!(b.font_size, 14.0);
    }

    #[test]
    fn test_deletes() {
        let mut page = EditorPage::new(612.0, 792.0);
        page.text_boxes = vec![text_box("a", "x", 0.0, 0.0), text_box("b", "y", 0.0, 0.0)];
        assert_eq!(delete_text_boxes(&mut page, &["a".to_string()]), 1);
        assert!(!delete_image_box(&mut page, "image-0"));
    }
}
