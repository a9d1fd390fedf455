//! Overlay editing: operations, selection, pointer interactions and history.
//!
//! ## Architecture
//!
//! ```text
//! EditorPage[] (current state)
//!     ↓ clone
//! [operations] mutate the draft        [Interaction] mutates in place
//!     ↓ commit                              ↑ captured at pointer-down
//! [History] keeps the pre-edit clone   (one snapshot per interaction)
//! ```
//!
//! [`EditorSession`] ties these together for one loaded document.
//!
//! ## Example
//!
//! ```
//! use pdf_overlay::editor::EditorSession;
//! use pdf_overlay::geometry::Point;
//! use pdf_overlay::model::EditorPage;
//! use pdf_overlay::EditorConfig;
//!
//! let pages = vec![EditorPage::new(612.0, 792.0)];
//! let mut session = EditorSession::with_pages(pages, Vec::new(), EditorConfig::default());
//!
//! let id = session.add_text_at(0, Point::new(50.0, 50.0))?;
//! session.set_text(0, &id, "Hello")?;
//! assert_eq!(session.history().undo_len(), 2);
//!
//! session.undo();
//! assert_eq!(session.page(0)?.text_box(&id).map(|b| b.text.as_str()), Some("New text"));
//! # Ok::<(), pdf_overlay::Error>(())
//! ```

pub mod history;
pub mod interaction;
pub mod operations;
pub mod selection;
pub mod session;

pub use history::{History, Snapshot};
pub use interaction::{resize_rect, Interaction, ResizeMode};
pub use operations::{
    add_text_box, adjust_font_size, delete_image_box, delete_text_boxes, join_text_boxes, merge_texts,
    set_font_size, toggle_bold, toggle_italic,
};
pub use selection::{click_text, marquee_select, press_text, Selection};
pub use session::EditorSession;
