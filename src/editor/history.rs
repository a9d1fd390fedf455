//! Bounded undo/redo history of page snapshots.

use std::collections::VecDeque;

use crate::model::EditorPage;

/// A full copy of every editor page.
pub type Snapshot = Vec<EditorPage>;

/// Undo and redo stacks, each holding at most `limit` snapshots.
///
/// The most recent snapshot sits at the front; pushing past the limit drops
/// the oldest one from the back.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: VecDeque<Snapshot>,
    limit: usize,
}

impl History {
    /// Create an empty history with the given capacity.
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            limit,
        }
    }

    fn push_bounded(stack: &mut VecDeque<Snapshot>, snapshot: Snapshot, limit: usize) {
        stack.push_front(snapshot);
        stack.truncate(limit);
    }

    /// Record the state before a mutation. Clears the redo stack.
    pub fn record(&mut self, before: Snapshot) {
        Self::push_bounded(&mut self.undo, before, self.limit);
        self.redo.clear();
    }

    /// Step back: returns the previous state and stores `current` for redo.
    ///
    /// Returns `None` (and drops nothing) when there is nothing to undo.
    pub fn undo(&mut self, current: &[EditorPage]) -> Option<Snapshot> {
        let previous = self.undo.pop_front()?;
        Self::push_bounded(&mut self.redo, current.to_vec(), self.limit);
        Some(previous)
    }

    /// Step forward: returns the next state and stores `current` for undo.
    pub fn redo(&mut self, current: &[EditorPage]) -> Option<Snapshot> {
        let next = self.redo.pop_front()?;
        Self::push_bounded(&mut self.undo, current.to_vec(), self.limit);
        Some(next)
    }

    /// Number of undoable steps.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redoable steps.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Whether [`History::undo`] would do anything.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether [`History::redo`] would do anything.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Capacity of each stack.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(width: f32) -> Snapshot {
        vec![EditorPage::new(width, 792.0)]
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut history = History::new(50);
        history.record(state(1.0));
        let current = state(2.0);

        let previous = history.undo(&current).unwrap();
        assert_eq!(previous[0].width, 1.0);
        assert!(history.can_redo());

        let next = history.redo(&previous).unwrap();
        assert_eq!(next[0].width, 2.0);
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = History::new(50);
        assert!(history.undo(&state(1.0)).is_none());
        assert!(history.redo(&state(1.0)).is_none());
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_bound_drops_oldest() {
        let mut history = History::new(50);
        for i in 0..60 {
            history.record(state(i as f32));
        }
        assert_eq!(history.undo_len(), 50);

        let mut current = state(60.0);
        let mut oldest = None;
        while let Some(prev) = history.undo(&current) {
            oldest = Some(prev[0].width);
            current = prev;
        }
        assert_eq!(oldest, Some(10.0));
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new(5);
        history.record(state(1.0));
        history.undo(&state(2.0));
        assert!(history.can_redo());
        history.record(state(3.0));
        assert!(!history.can_redo());
    }
}
