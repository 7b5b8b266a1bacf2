use core_text::Buffer;
use std::collections::VecDeque;
use tracing::trace;

/// Maximum number of snapshots retained in undo history.
pub const UNDO_CAPACITY: usize = 100;

/// Whole-buffer snapshot history.
///
/// Every push clears the redo stack, even when the edit that follows turns out to be a no-op.
/// Only line content is captured; cursor position is neither stored nor restored.
#[derive(Debug, Default)]
pub struct UndoEngine {
    undo_stack: VecDeque<Vec<String>>,
    redo_stack: Vec<Vec<String>>,
}

impl UndoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Capture the current lines before a mutation.
    pub fn push_snapshot(&mut self, buffer: &Buffer) {
        self.push_undo(buffer.snapshot());
        self.redo_stack.clear();
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), lines = buffer.line_count(), "push_snapshot");
    }

    pub fn undo(&mut self, buffer: &mut Buffer) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(buffer.snapshot());
        buffer.replace_lines(previous);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        true
    }

    pub fn redo(&mut self, buffer: &mut Buffer) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.push_undo(buffer.snapshot());
        buffer.replace_lines(next);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo_pop");
        true
    }

    /// Drop all history (new file opened).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        trace!(target: "state.undo", "history_cleared");
    }

    fn push_undo(&mut self, lines: Vec<String>) {
        self.undo_stack.push_back(lines);
        if self.undo_stack.len() > UNDO_CAPACITY {
            self.undo_stack.pop_front();
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
    }
}
