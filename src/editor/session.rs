//! The editing session: overlay pages plus everything that mutates them.

use crate::backend::{EditorBackend, FallbackFontCache};
use crate::color::css_to_hex;
use crate::config::{EditorConfig, ExportConfig};
use crate::error::{Error, Result};
use crate::fonts::{find_font_meta, font_supports_italic, guess_font_stack, FontRegistrySession};
use crate::geometry::{Point, Rect};
use crate::model::{BoxKind, EditorPage, FontDescriptor, TextBox};
use crate::writer::export_pages;

use super::history::History;
use super::interaction::{Interaction, ResizeMode};
use super::operations;
use super::selection::{click_text, marquee_select, press_text, Selection};

/// Owns the editable pages of one document and applies every edit to them.
///
/// Discrete edits clone the pages, record the pre-edit clone in the history
/// and commit the edited copy. Pointer interactions record one snapshot at
/// pointer-down and then mutate the pages in place until pointer-up.
#[derive(Debug)]
pub struct EditorSession {
    pages: Vec<EditorPage>,
    fonts: Vec<FontDescriptor>,
    history: History,
    selection: Option<Selection>,
    interaction: Option<Interaction>,
    registry: Option<FontRegistrySession>,
    config: EditorConfig,
    dirty: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// Create a session with no document.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            pages: Vec::new(),
            fonts: Vec::new(),
            history: History::new(config.history_limit),
            selection: None,
            interaction: None,
            registry: None,
            config,
            dirty: false,
        }
    }

    /// Create a session over already built pages.
    pub fn with_pages(pages: Vec<EditorPage>, fonts: Vec<FontDescriptor>, config: EditorConfig) -> Self {
        let mut session = Self::new(config);
        session.pages = pages;
        session.fonts = fonts;
        session
    }

    /// Replace the document wholesale.
    ///
    /// The previous display font session is disposed; history, selection and
    /// any pointer interaction are reset.
    pub fn replace_document(
        &mut self,
        pages: Vec<EditorPage>,
        fonts: Vec<FontDescriptor>,
        registry: Option<FontRegistrySession>,
    ) {
        if let Some(mut previous) = self.registry.take() {
            previous.dispose();
        }
        self.pages = pages;
        self.fonts = fonts;
        self.registry = registry;
        self.history.clear();
        self.selection = None;
        self.interaction = None;
        self.dirty = false;
        log::info!("Editor session loaded {} pages", self.pages.len());
    }

    /// Configuration the session was created with.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current pages.
    pub fn pages(&self) -> &[EditorPage] {
        &self.pages
    }

    /// Page by index.
    pub fn page(&self, index: usize) -> Result<&EditorPage> {
        self.pages.get(index).ok_or(Error::PageOutOfRange(index))
    }

    /// Fonts of the loaded document.
    pub fn fonts(&self) -> &[FontDescriptor] {
        &self.fonts
    }

    /// Display font session of the loaded document.
    pub fn registry(&self) -> Option<&FontRegistrySession> {
        self.registry.as_ref()
    }

    /// Undo/redo stacks.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Current selection.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Current pointer interaction.
    pub fn interaction(&self) -> Option<&Interaction> {
        self.interaction.as_ref()
    }

    /// Whether the pages changed since load or the last successful upload.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn check_page(&self, index: usize) -> Result<()> {
        if index < self.pages.len() {
            Ok(())
        } else {
            Err(Error::PageOutOfRange(index))
        }
    }

    /// Copy-on-write edit of one page. The pre-edit pages are recorded only
    /// when `edit` returns `Some`.
    fn apply_change<T>(&mut self, index: usize, edit: impl FnOnce(&mut EditorPage) -> Option<T>) -> Result<Option<T>> {
        self.check_page(index)?;
        let mut draft = self.pages.clone();
        let Some(result) = edit(&mut draft[index]) else {
            return Ok(None);
        };
        let before = std::mem::replace(&mut self.pages, draft);
        self.history.record(before);
        self.dirty = true;
        Ok(Some(result))
    }

    fn record_snapshot(&mut self) {
        self.history.record(self.pages.clone());
        self.dirty = true;
    }

    /// Restore the previous state. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.pages) {
            Some(previous) => {
                self.pages = previous;
                self.interaction = None;
                self.dirty = true;
                true
            },
            None => false,
        }
    }

    /// Re-apply an undone state. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.pages) {
            Some(next) => {
                self.pages = next;
                self.interaction = None;
                self.dirty = true;
                true
            },
            None => false,
        }
    }

    // Selection

    /// Click a text box without dragging it.
    pub fn click_text(&mut self, page: usize, id: &str, additive: bool) -> Result<()> {
        let selection = click_text(self.selection.as_ref(), self.page(page)?, page, id, additive);
        self.selection = selection;
        Ok(())
    }

    /// Select every text box the marquee touches, or clear the selection.
    pub fn marquee_select(&mut self, page: usize, marquee: Rect) -> Result<()> {
        let selection = marquee_select(self.page(page)?, page, marquee);
        self.selection = selection;
        Ok(())
    }

    /// Select an image box.
    pub fn select_image(&mut self, page: usize, id: &str) -> Result<()> {
        self.check_page(page)?;
        self.selection = Some(Selection::Image {
            page,
            id: id.to_string(),
        });
        Ok(())
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selection = None;
    }

    // Pointer interactions

    /// Press on a text box: update the selection and start dragging it.
    pub fn begin_text_drag(&mut self, page: usize, id: &str, pointer: Point, additive: bool) -> Result<()> {
        let selection = press_text(self.selection.as_ref(), self.page(page)?, page, id, additive);
        let ids = selection.text_ids_on(page).to_vec();
        self.record_snapshot();
        self.selection = Some(selection);
        self.interaction = Interaction::drag_text(&self.pages[page], page, &ids, pointer);
        Ok(())
    }

    /// Press inside a multi-selection's bounds: drag all of `ids`.
    pub fn begin_group_drag(&mut self, page: usize, ids: &[String], pointer: Point) -> Result<()> {
        self.check_page(page)?;
        if ids.is_empty() {
            return Ok(());
        }
        self.record_snapshot();
        self.interaction = Interaction::drag_text(&self.pages[page], page, ids, pointer);
        Ok(())
    }

    /// Press on an image box: select it and start dragging it.
    pub fn begin_image_drag(&mut self, page: usize, id: &str, pointer: Point) -> Result<()> {
        self.check_page(page)?;
        self.record_snapshot();
        self.selection = Some(Selection::Image {
            page,
            id: id.to_string(),
        });
        self.interaction = Interaction::drag_image(&self.pages[page], page, id, pointer);
        Ok(())
    }

    /// Press on a resize handle.
    pub fn begin_resize(
        &mut self,
        page: usize,
        kind: BoxKind,
        id: &str,
        mode: ResizeMode,
        pointer: Point,
        additive: bool,
    ) -> Result<()> {
        self.check_page(page)?;
        self.record_snapshot();
        self.selection = match kind {
            BoxKind::Text => {
                let mut ids = match (&self.selection, additive) {
                    (Some(Selection::Text { page: p, ids, .. }), true) if *p == page => ids.clone(),
                    _ => Vec::new(),
                };
                if !ids.iter().any(|i| i == id) {
                    ids.push(id.to_string());
                }
                Some(Selection::Text {
                    page,
                    ids,
                    group_id: None,
                })
            },
            BoxKind::Image => Some(Selection::Image {
                page,
                id: id.to_string(),
            }),
        };
        self.interaction = Interaction::resize(&self.pages[page], page, kind, id, mode, pointer);
        Ok(())
    }

    /// Press on the group resize handle of a multi-selection.
    pub fn begin_group_resize(&mut self, page: usize, ids: &[String], pointer: Point) -> Result<()> {
        self.check_page(page)?;
        if ids.is_empty() {
            return Ok(());
        }
        self.record_snapshot();
        self.interaction = Interaction::group_resize(&self.pages[page], page, ids, pointer);
        Ok(())
    }

    /// Pointer moved: apply the active interaction, if any.
    pub fn pointer_move(&mut self, pointer: Point) {
        if let Some(interaction) = &self.interaction {
            if let Some(page) = self.pages.get_mut(interaction.page()) {
                interaction.apply(page, pointer);
            }
        }
    }

    /// Pointer released: end the interaction.
    pub fn pointer_up(&mut self) {
        self.interaction = None;
    }

    // Edits

    /// Add a default text box at `at` and select it.
    pub fn add_text_at(&mut self, page: usize, at: Point) -> Result<String> {
        let id = self
            .apply_change(page, |p| Some(operations::add_text_box(p, at)))?
            .ok_or(Error::PageOutOfRange(page))?;
        self.selection = Some(Selection::text(page, id.clone()));
        Ok(id)
    }

    /// Join the selected text boxes. Returns the merged box id.
    pub fn join_selection(&mut self) -> Result<Option<String>> {
        let Some(Selection::Text { page, ids, .. }) = self.selection.clone() else {
            return Ok(None);
        };
        if ids.len() < 2 {
            return Ok(None);
        }
        let merged = self.apply_change(page, |p| operations::join_text_boxes(p, &ids))?;
        if let Some(id) = &merged {
            self.selection = Some(Selection::text(page, id.clone()));
        }
        Ok(merged)
    }

    /// Delete the selected boxes.
    pub fn delete_selection(&mut self) -> Result<()> {
        match self.selection.take() {
            Some(Selection::Text { page, ids, .. }) => {
                self.apply_change(page, |p| Some(operations::delete_text_boxes(p, &ids)))?;
            },
            Some(Selection::Image { page, id }) => {
                self.apply_change(page, |p| Some(operations::delete_image_box(p, &id)))?;
            },
            None => {},
        }
        Ok(())
    }

    /// Delete one text box and clear the selection.
    pub fn delete_text_box(&mut self, page: usize, id: &str) -> Result<()> {
        self.apply_change(page, |p| Some(operations::delete_text_boxes(p, &[id.to_string()])))?;
        self.selection = None;
        Ok(())
    }

    /// Delete one image box and clear the selection.
    pub fn delete_image_box(&mut self, page: usize, id: &str) -> Result<()> {
        self.apply_change(page, |p| Some(operations::delete_image_box(p, id)))?;
        self.selection = None;
        Ok(())
    }

    /// Replace the text of a box.
    pub fn set_text(&mut self, page: usize, id: &str, text: &str) -> Result<()> {
        self.apply_change(page, |p| {
            let b = p.text_box_mut(id)?;
            b.text = text.to_string();
            Some(())
        })?;
        Ok(())
    }

    fn update_selected_text(&mut self, update: impl Fn(&mut TextBox)) -> Result<()> {
        let Some(Selection::Text { page, ids, .. }) = self.selection.clone() else {
            return Ok(());
        };
        self.apply_change(page, |p| {
            p.text_boxes.iter_mut().filter(|b| ids.contains(&b.id)).for_each(&update);
            Some(())
        })?;
        Ok(())
    }

    /// Toggle bold on every selected text box.
    pub fn toggle_bold(&mut self) -> Result<()> {
        self.update_selected_text(operations::toggle_bold)
    }

    /// Toggle italic on every selected text box, if the first one's font has an italic face.
    pub fn toggle_italic(&mut self) -> Result<()> {
        if !self.selected_supports_italic() {
            return Ok(());
        }
        self.update_selected_text(operations::toggle_italic)
    }

    /// Change the font size of the selected text boxes by `delta`.
    pub fn adjust_font_size(&mut self, delta: f32) -> Result<()> {
        self.update_selected_text(|b| operations::adjust_font_size(b, delta))
    }

    /// Set the font size of the selected text boxes.
    pub fn set_font_size(&mut self, size: f32) -> Result<()> {
        self.update_selected_text(|b| operations::set_font_size(b, size))
    }

    /// Set the color of the selected text boxes.
    pub fn set_color(&mut self, color: &str) -> Result<()> {
        self.update_selected_text(|b| b.color = Some(color.to_string()))
    }

    // Derived selection state

    /// Selected text boxes, in page order.
    pub fn selected_text_boxes(&self) -> Vec<&TextBox> {
        match &self.selection {
            Some(Selection::Text { page, ids, .. }) => self
                .pages
                .get(*page)
                .map(|p| p.text_boxes.iter().filter(|b| ids.contains(&b.id)).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Font descriptor of the first selected text box.
    pub fn selected_font_meta(&self) -> Option<&FontDescriptor> {
        let first = *self.selected_text_boxes().first()?;
        find_font_meta(&self.fonts, first.font_id.as_deref(), first.base_font.as_deref())
    }

    /// Whether the first selected box's font has an italic face.
    pub fn selected_supports_italic(&self) -> bool {
        font_supports_italic(self.selected_font_meta())
    }

    /// Font size of the first selected box, 12 when nothing is selected.
    pub fn selected_font_size(&self) -> f32 {
        self.selected_text_boxes().first().map(|b| b.font_size).unwrap_or(12.0)
    }

    /// Color of the first selected box as `#rrggbb`.
    pub fn selected_color(&self) -> String {
        let first = self.selected_text_boxes().first().copied();
        css_to_hex(first.and_then(|b| b.color.as_deref()))
    }

    /// CSS font-family for a box, using the registered display fonts.
    pub fn resolve_font_family(&self, font_id: Option<&str>, base_font: Option<&str>) -> String {
        match &self.registry {
            Some(registry) => registry.resolve_font_family(font_id, base_font),
            None => guess_font_stack(base_font).to_string(),
        }
    }

    /// Export the pages to PDF.
    pub async fn export(&self, fallback: &FallbackFontCache, config: &ExportConfig) -> Result<Vec<u8>> {
        let fallback_font = fallback.get().await;
        export_pages(&self.pages, &self.fonts, fallback_font, config)
    }

    /// Export and upload the edited document. Returns the new document URL.
    ///
    /// Pages are never modified here; on failure the session keeps every edit.
    pub async fn apply_edits(
        &mut self,
        backend: &dyn EditorBackend,
        fallback: &FallbackFontCache,
        config: &ExportConfig,
    ) -> Result<String> {
        let bytes = self.export(fallback, config).await?;
        let url = backend.upload(bytes).await?;
        self.dirty = false;
        log::info!("Edits applied, new document at {}", url);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FontWeight;

    fn text_box(id: &str, left: f32, top: f32) -> TextBox {
        TextBox {
            id: id.to_string(),
            text: id.to_string(),
            left,
            top,
            width: 50.0,
            height: 20.0,
            font_size: 12.0,
            font_weight: None,
            font_style: None,
            font_id: Some("F1".to_string()),
            base_font: None,
            color: Some("rgb(255, 0, 0)".to_string()),
            group_id: None,
        }
    }

    fn session() -> EditorSession {
        let mut page = EditorPage::new(612.0, 792.0);
        page.text_boxes = vec![text_box("a", 10.0, 10.0), text_box("b", 10.0, 40.0)];
        let fonts = vec![FontDescriptor {
            id: Some("F1".to_string()),
            base_name: Some("ABCDEF+Times-Italic".to_string()),
            ..Default::default()
        }];
        EditorSession::with_pages(vec![page], fonts, EditorConfig::default())
    }

    #[test]
    fn test_drag_records_one_snapshot() {
        let mut s = session();
        s.begin_text_drag(0, "a", Point::new(0.0, 0.0), false).unwrap();
        s.pointer_move(Point::new(5.0, 0.0));
        s.pointer_move(Point::new(20.0, 0.0));
        s.pointer_up();
        assert_eq!(s.history().undo_len(), 1);
        assert_eq!(s.page(0).unwrap().text_box("a").unwrap().left, 30.0);
        assert!(s.undo());
        assert_eq!(s.page(0).unwrap().text_box("a").unwrap().left, 10.0);
    }

    #[test]
    fn test_join_then_undo_restores() {
        let mut s = session();
        let before = s.pages().to_vec();
        s.click_text(0, "a", false).unwrap();
        s.click_text(0, "b", true).unwrap();
        assert_eq!(s.join_selection().unwrap().as_deref(), Some("a"));
        assert_eq!(s.page(0).unwrap().text_boxes.len(), 1);
        assert!(s.undo());
        assert_eq!(s.pages(), &before[..]);
    }

    #[test]
    fn test_style_edits_on_selection() {
        let mut s = session();
        s.click_text(0, "a", false).unwrap();
        s.toggle_bold().unwrap();
        s.set_font_size(300.0).unwrap();
        assert!(s.selected_supports_italic());
        s.toggle_italic().unwrap();
        let a = s.page(0).unwrap().text_box("a").unwrap();
        assert_eq!(a.font_weight, Some(FontWeight::Numeric(700)));
        assert_eq!(a.font_size, 200.0);
        assert!(a.is_italic());
        assert_eq!(s.selected_color(), "#ff0000");
        assert_eq!(s.history().undo_len(), 3);
    }

    #[test]
    fn test_add_text_selects_new_box() {
        let mut s = session();
        let id = s.add_text_at(0, Point::new(5.0, 5.0)).unwrap();
        assert_eq!(s.selection(), Some(&Selection::text(0, id)));
        assert!(s.is_dirty());
    }

    #[test]
    fn test_page_out_of_range() {
        let mut s = session();
        assert!(matches!(s.add_text_at(3, Point::new(0.0, 0.0)), Err(Error::PageOutOfRange(3))));
        assert!(s.begin_text_drag(1, "a", Point::new(0.0, 0.0), false).is_err());
        assert_eq!(s.history().undo_len(), 0);
    }

    #[test]
    fn test_delete_selection_clears() {
        let mut s = session();
        s.marquee_select(0, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        s.delete_selection().unwrap();
        assert!(s.page(0).unwrap().text_boxes.is_empty());
        assert!(s.selection().is_none());
        assert!(!s.redo());
    }

    #[test]
    fn test_replace_document_resets() {
        let mut s = session();
        s.toggle_bold().unwrap();
        s.click_text(0, "a", false).unwrap();
        s.toggle_bold().unwrap();
        s.replace_document(Vec::new(), Vec::new(), None);
        assert!(s.pages().is_empty());
        assert!(!s.history().can_undo());
        assert!(s.selection().is_none());
    }
}
