//! Pointer interactions: drag, resize and group resize.
//!
//! An [`Interaction`] is captured at pointer-down with the initial geometry of
//! every affected box. Each pointer-move recomputes geometry from that
//! initial state and the total pointer delta, so repeated moves never
//! accumulate rounding error.

use indexmap::IndexMap;

use crate::geometry::{clamp, Point, Rect};
use crate::model::{BoxKind, EditorPage};

/// Minimum text box height for edge and corner resizes.
pub const MIN_TEXT_HEIGHT: f32 = 16.0;
/// Minimum text box width for corner resizes.
pub const MIN_TEXT_WIDTH: f32 = 32.0;
/// Minimum image box side for corner resizes.
pub const MIN_IMAGE_SIZE: f32 = 32.0;
/// Minimum group bounding box side during group resize.
pub const MIN_GROUP_SIZE: f32 = 16.0;
/// Minimum member size and edge margin during group resize.
pub const MIN_MEMBER_SIZE: f32 = 4.0;
/// Smallest group scale factor.
pub const MIN_GROUP_SCALE: f32 = 0.1;

/// Which handle a resize started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Bottom-right corner: width and height
    Corner,
    /// Top edge of a text box: top and height, bottom edge fixed
    TextTop,
    /// Bottom edge of a text box: height only
    TextBottom,
}

/// An in-progress pointer interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// Moving one or more text boxes together
    DragText {
        /// Page index
        page: usize,
        /// Pointer position at pointer-down
        start: Point,
        /// Initial rectangle of every dragged box
        initial: IndexMap<String, Rect>,
    },
    /// Moving an image box
    DragImage {
        /// Page index
        page: usize,
        /// Image id
        id: String,
        /// Pointer position at pointer-down
        start: Point,
        /// Initial rectangle
        initial: Rect,
    },
    /// Resizing a single box
    Resize {
        /// Page index
        page: usize,
        /// Text or image
        kind: BoxKind,
        /// Box id
        id: String,
        /// Handle
        mode: ResizeMode,
        /// Pointer position at pointer-down
        start: Point,
        /// Initial rectangle
        initial: Rect,
    },
    /// Scaling a multi-selection around its bounding box
    GroupResize {
        /// Page index
        page: usize,
        /// Pointer position at pointer-down
        start: Point,
        /// Initial bounding box of the group
        group: Rect,
        /// Initial rectangle of every member
        initial: IndexMap<String, Rect>,
    },
}

impl Interaction {
    /// Capture a text drag for `ids`; ids not on the page are ignored.
    pub fn drag_text(page: &EditorPage, page_index: usize, ids: &[String], start: Point) -> Option<Self> {
        let initial = capture_text(page, ids);
        if initial.is_empty() {
            return None;
        }
        Some(Interaction::DragText {
            page: page_index,
            start,
            initial,
        })
    }

    /// Capture an image drag.
    pub fn drag_image(page: &EditorPage, page_index: usize, id: &str, start: Point) -> Option<Self> {
        let initial = page.image_box(id)?.rect();
        Some(Interaction::DragImage {
            page: page_index,
            id: id.to_string(),
            start,
            initial,
        })
    }

    /// Capture a single-box resize. Images only support [`ResizeMode::Corner`].
    pub fn resize(
        page: &EditorPage,
        page_index: usize,
        kind: BoxKind,
        id: &str,
        mode: ResizeMode,
        start: Point,
    ) -> Option<Self> {
        let mode = if kind == BoxKind::Image { ResizeMode::Corner } else { mode };
        let initial = page.box_rect(kind, id)?;
        Some(Interaction::Resize {
            page: page_index,
            kind,
            id: id.to_string(),
            mode,
            start,
            initial,
        })
    }

    /// Capture a group resize over the text boxes `ids`.
    pub fn group_resize(page: &EditorPage, page_index: usize, ids: &[String], start: Point) -> Option<Self> {
        let initial = capture_text(page, ids);
        let group = Rect::bounding(initial.values())?;
        Some(Interaction::GroupResize {
            page: page_index,
            start,
            group,
            initial,
        })
    }

    /// Page the interaction acts on.
    pub fn page(&self) -> usize {
        match self {
            Interaction::DragText { page, .. }
            | Interaction::DragImage { page, .. }
            | Interaction::Resize { page, .. }
            | Interaction::GroupResize { page, .. } => *page,
        }
    }

    /// Apply the interaction for the current pointer position.
    pub fn apply(&self, page: &mut EditorPage, pointer: Point) {
        let (pw, ph) = (page.width, page.height);
        match self {
            Interaction::DragText { start, initial, .. } => {
                let (dx, dy) = (pointer.x - start.x, pointer.y - start.y);
                for b in page.text_boxes.iter_mut() {
                    if let Some(init) = initial.get(&b.id) {
                        b.left = clamp(init.x + dx, 0.0, pw - b.width);
                        b.top = clamp(init.y + dy, 0.0, ph - b.height);
                    }
                }
            },
            Interaction::DragImage { id, start, initial, .. } => {
                let (dx, dy) = (pointer.x - start.x, pointer.y - start.y);
                if let Some(b) = page.image_box_mut(id) {
                    b.left = clamp(initial.x + dx, 0.0, pw - b.width);
                    b.top = clamp(initial.y + dy, 0.0, ph - b.height);
                }
            },
            Interaction::Resize {
                kind,
                id,
                mode,
                start,
                initial,
                ..
            } => {
                let (dx, dy) = (pointer.x - start.x, pointer.y - start.y);
                let rect = resize_rect(*kind, *mode, *initial, dx, dy, pw, ph);
                match kind {
                    BoxKind::Text => {
                        if let Some(b) = page.text_box_mut(id) {
                            b.set_rect(rect);
                        }
                    },
                    BoxKind::Image => {
                        if let Some(b) = page.image_box_mut(id) {
                            b.set_rect(rect);
                        }
                    },
                }
            },
            Interaction::GroupResize {
                start, group, initial, ..
            } => {
                let (dx, dy) = (pointer.x - start.x, pointer.y - start.y);
                let new_width = clamp(group.width + dx, MIN_GROUP_SIZE, pw - group.x);
                let new_height = clamp(group.height + dy, MIN_GROUP_SIZE, ph - group.y);
                let base_w = if group.width != 0.0 { group.width } else { 1.0 };
                let base_h = if group.height != 0.0 { group.height } else { 1.0 };
                let scale_x = (new_width / base_w).max(MIN_GROUP_SCALE);
                let scale_y = (new_height / base_h).max(MIN_GROUP_SCALE);

                for b in page.text_boxes.iter_mut() {
                    let Some(init) = initial.get(&b.id) else {
                        continue;
                    };
                    let left = clamp(group.x + (init.x - group.x) * scale_x, 0.0, pw - MIN_MEMBER_SIZE);
                    let top = clamp(group.y + (init.y - group.y) * scale_y, 0.0, ph - MIN_MEMBER_SIZE);
                    let width = clamp(init.width * scale_x, MIN_MEMBER_SIZE, pw - left);
                    let height = clamp(init.height * scale_y, MIN_MEMBER_SIZE, ph - top);
                    b.set_rect(Rect::new(left, top, width, height));
                }
            },
        }
    }
}

fn capture_text(page: &EditorPage, ids: &[String]) -> IndexMap<String, Rect> {
    ids.iter()
        .filter_map(|id| page.text_box(id).map(|b| (id.clone(), b.rect())))
        .collect()
}

/// Geometry of a single-box resize from its initial rectangle and pointer delta.
pub fn resize_rect(kind: BoxKind, mode: ResizeMode, initial: Rect, dx: f32, dy: f32, page_width: f32, page_height: f32) -> Rect {
    match (kind, mode) {
        (BoxKind::Text, ResizeMode::TextBottom) => {
            let height = clamp(initial.height + dy, MIN_TEXT_HEIGHT, page_height - initial.y);
            Rect { height, ..initial }
        },
        (BoxKind::Text, ResizeMode::TextTop) => {
            let max_top = initial.y + initial.height - MIN_TEXT_HEIGHT;
            let top = clamp(initial.y + dy, 0.0, max_top);
            let height = clamp(initial.height + (initial.y - top), MIN_TEXT_HEIGHT, page_height - top);
            Rect {
                y: top,
                height,
                ..initial
            }
        },
        (BoxKind::Text, ResizeMode::Corner) => Rect {
            width: clamp(initial.width + dx, MIN_TEXT_WIDTH, page_width - initial.x),
            height: clamp(initial.height + dy, MIN_TEXT_HEIGHT, page_height - initial.y),
            ..initial
        },
        (BoxKind::Image, _) => Rect {
            width: clamp(initial.width + dx, MIN_IMAGE_SIZE, page_width - initial.x),
            height: clamp(initial.height + dy, MIN_IMAGE_SIZE, page_height - initial.y),
            ..initial
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageBox, TextBox};

    fn text_box(id: &str, rect: Rect) -> TextBox {
        TextBox {
            id: id.to_string(),
            text: "x".to_string(),
            left: rect.x,
            top: rect.y,
            width: rect.width,
            height: rect.height,
            font_size: 12.0,
            font_weight: None,
            font_style: None,
            font_id: None,
            base_font: None,
            color: None,
            group_id: None,
        }
    }

    fn page() -> EditorPage {
        let mut page = EditorPage::new(612.0, 792.0);
        page.text_boxes = vec![
            text_box("a", Rect::new(100.0, 100.0, 50.0, 20.0)),
            text_box("b", Rect::new(200.0, 150.0, 50.0, 20.0)),
        ];
        page.image_boxes = vec![ImageBox {
            id: "image-0".to_string(),
            data_url: None,
            left: 10.0,
            top: 10.0,
            width: 100.0,
            height: 100.0,
        }];
        page
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_drag_from_initial_geometry() {
        let mut page = page();
        let drag = Interaction::drag_text(&page, 0, &ids(&["a", "b"]), Point::new(0.0, 0.0)).unwrap();
        drag.apply(&mut page, Point::new(5.0, 5.0));
        drag.apply(&mut page, Point::new(10.0, -10.0));
        let a = page.text_box("a").unwrap();
        assert_eq!((a.left, a.top), (110.0, 90.0));
        let b = page.text_box("b").unwrap();
        assert_eq!((b.left, b.top), (210.0, 140.0));
    }

    #[test]
    fn test_drag_clamped_per_box() {
        let mut page = page();
        let drag = Interaction::drag_text(&page, 0, &ids(&["a", "b"]), Point::new(0.0, 0.0)).unwrap();
        drag.apply(&mut page, Point::new(1000.0, -1000.0));
        let a = page.text_box("a").unwrap();
        assert_eq!((a.left, a.top), (562.0, 0.0));
        assert!(page.boxes_within_bounds());
    }

    #[test]
    fn test_text_top_keeps_bottom_edge() {
        let r = resize_rect(BoxKind::Text, ResizeMode::TextTop, Rect::new(0.0, 100.0, 50.0, 40.0), 0.0, -30.0, 612.0, 792.0);
        assert_eq!((r.y, r.height), (70.0, 70.0));
        let r = resize_rect(BoxKind::Text, ResizeMode::TextTop, Rect::new(0.0, 100.0, 50.0, 40.0), 0.0, 100.0, 612.0, 792.0);
        assert_eq!((r.y, r.height), (124.0, 16.0));
    }

    #[test]
    fn test_text_bottom_and_corner() {
        let init = Rect::new(580.0, 760.0, 30.0, 20.0);
        let r = resize_rect(BoxKind::Text, ResizeMode::TextBottom, init, 0.0, 100.0, 612.0, 792.0);
        assert_eq!(r.height, 32.0);
        let r = resize_rect(BoxKind::Text, ResizeMode::Corner, Rect::new(0.0, 0.0, 100.0, 50.0), -90.0, -45.0, 612.0, 792.0);
        assert_eq!((r.width, r.height), (32.0, 16.0));
    }

    #[test]
    fn test_image_resize_is_corner_only() {
        let mut page = page();
        let resize = Interaction::resize(&page, 0, BoxKind::Image, "image-0", ResizeMode::TextTop, Point::new(0.0, 0.0)).unwrap();
        resize.apply(&mut page, Point::new(-200.0, 50.0));
        let img = page.image_box("image-0").unwrap();
        assert_eq!((img.left, img.top, img.width, img.height), (10.0, 10.0, 32.0, 150.0));
    }

    #[test]
    fn test_group_resize_scales_offsets() {
        let mut page = page();
        let resize = Interaction::group_resize(&page, 0, &ids(&["a", "b"]), Point::new(0.0, 0.0)).unwrap();
        // Group is 100,100 150x70; doubling the width
        resize.apply(&mut page, Point::new(150.0, 0.0));
        let b = page.text_box("b").unwrap();
        assert_eq!((b.left, b.width), (300.0, 100.0));
        assert_eq!((b.top, b.height), (150.0, 20.0));
        let a = page.text_box("a").unwrap();
        assert_eq!(a.left, 100.0);
    }

    #[test]
    fn test_missing_ids_capture_nothing() {
        let page = page();
        assert!(Interaction::drag_text(&page, 0, &ids(&["zz"]), Point::new(0.0, 0.0)).is_none());
        assert!(Interaction::group_resize(&page, 0, &[], Point::new(0.0, 0.0)).is_none());
    }
}
