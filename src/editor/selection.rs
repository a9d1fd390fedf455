//! Selection state and the rules for click and marquee selection.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::model::{BoxKind, EditorPage};

/// What is currently selected. At most one page is involved at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Selection {
    /// One or more text boxes on a page
    Text {
        /// Page index
        page: usize,
        /// Selected box ids, in selection order
        ids: Vec<String>,
        /// Set when the selection is exactly one whole group
        group_id: Option<String>,
    },
    /// A single image box
    Image {
        /// Page index
        page: usize,
        /// Image box id
        id: String,
    },
}

impl Selection {
    /// Select a single text box.
    pub fn text(page: usize, id: impl Into<String>) -> Self {
        Selection::Text {
            page,
            ids: vec![id.into()],
            group_id: None,
        }
    }

    /// Page the selection lives on.
    pub fn page(&self) -> usize {
        match self {
            Selection::Text { page, .. } | Selection::Image { page, .. } => *page,
        }
    }

    /// Kind of the selected boxes.
    pub fn kind(&self) -> BoxKind {
        match self {
            Selection::Text { .. } => BoxKind::Text,
            Selection::Image { .. } => BoxKind::Image,
        }
    }

    /// Selected text ids on `page`, empty for images or other pages.
    pub fn text_ids_on(&self, page_index: usize) -> &[String] {
        match self {
            Selection::Text { page, ids, .. } if *page == page_index => ids,
            _ => &[],
        }
    }

    /// Whether the box with `id` is selected.
    pub fn contains(&self, page_index: usize, kind: BoxKind, id: &str) -> bool {
        match self {
            Selection::Text { page, ids, .. } => {
                kind == BoxKind::Text && *page == page_index && ids.iter().any(|i| i == id)
            },
            Selection::Image { page, id: selected } => {
                kind == BoxKind::Image && *page == page_index && selected == id
            },
        }
    }
}

fn group_members(page: &EditorPage, group_id: &str) -> Vec<String> {
    page.text_boxes
        .iter()
        .filter(|b| b.group_id.as_deref() == Some(group_id))
        .map(|b| b.id.clone())
        .collect()
}

/// Selection after clicking a text box.
///
/// Additive clicks toggle the clicked id within a text selection on the same
/// page. A plain click on a grouped box selects the whole group, or just the
/// box when the group is already selected.
pub fn click_text(
    current: Option<&Selection>,
    page: &EditorPage,
    page_index: usize,
    id: &str,
    additive: bool,
) -> Option<Selection> {
    if additive {
        if let Some(Selection::Text { page: p, ids, .. }) = current {
            if *p == page_index {
                let mut ids = ids.clone();
                match ids.iter().position(|i| i == id) {
                    Some(pos) => {
                        ids.remove(pos);
                    },
                    None => ids.push(id.to_string()),
                }
                if ids.is_empty() {
                    return None;
                }
                return Some(Selection::Text {
                    page: page_index,
                    ids,
                    group_id: None,
                });
            }
        }
        return Some(Selection::text(page_index, id));
    }

    let group_id = page.text_box(id).and_then(|b| b.group_id.clone());
    if let Some(group_id) = group_id {
        let members = group_members(page, &group_id);
        let already_selected = matches!(
            current,
            Some(Selection::Text { page: p, ids, group_id: Some(g) })
                if *p == page_index && *g == group_id && ids.len() == members.len()
        );
        if !already_selected && members.len() > 1 {
            return Some(Selection::Text {
                page: page_index,
                ids: members,
                group_id: Some(group_id),
            });
        }
    }
    Some(Selection::text(page_index, id))
}

/// Selection at the start of a drag on a text box.
///
/// Dragging an already selected box keeps the selection; an additive press
/// adds the box; otherwise the box's group (or the box alone) is selected.
pub fn press_text(
    current: Option<&Selection>,
    page: &EditorPage,
    page_index: usize,
    id: &str,
    additive: bool,
) -> Selection {
    if let Some(Selection::Text { page: p, ids, group_id }) = current {
        if *p == page_index {
            if ids.iter().any(|i| i == id) {
                return Selection::Text {
                    page: page_index,
                    ids: ids.clone(),
                    group_id: group_id.clone(),
                };
            }
            if additive {
                let mut ids = ids.clone();
                ids.push(id.to_string());
                return Selection::Text {
                    page: page_index,
                    ids,
                    group_id: None,
                };
            }
        }
    }

    let group_id = page.text_box(id).and_then(|b| b.group_id.clone()).filter(|_| !additive);
    if let Some(group_id) = group_id {
        let members = group_members(page, &group_id);
        if members.len() > 1 {
            return Selection::Text {
                page: page_index,
                ids: members,
                group_id: Some(group_id),
            };
        }
    }
    Selection::text(page_index, id)
}

/// Text boxes touched by a marquee rectangle; `None` when nothing is hit.
///
/// Overlap is inclusive: a box whose edge lies on the marquee edge counts.
pub fn marquee_select(page: &EditorPage, page_index: usize, marquee: Rect) -> Option<Selection> {
    let ids: Vec<String> = page
        .text_boxes
        .iter()
        .filter(|b| b.rect().touches(&marquee))
        .map(|b| b.id.clone())
        .collect();
    if ids.is_empty() {
        return None;
    }
    Some(Selection::Text {
        page: page_index,
        ids,
        group_id: None,
    })
}
