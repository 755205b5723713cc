//! Undo/Redo history for keypoint edits.
//!
//! There is exactly one kind of reversible edit: one keypoint moving from a
//! `before` state to an `after` state. History is unbounded for the lifetime
//! of one image and cleared wholesale when another image is loaded.

use crate::model::{KeypointState, PoseRecord};

// ============================================================================
// Edit Record
// ============================================================================

/// An immutable record of one keypoint change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeypointEdit {
    keypoint_index: usize,
    before: KeypointState,
    after: KeypointState,
}

impl KeypointEdit {
    pub fn new(keypoint_index: usize, before: KeypointState, after: KeypointState) -> Self {
        Self {
            keypoint_index,
            before,
            after,
        }
    }

    pub fn keypoint_index(&self) -> usize {
        self.keypoint_index
    }

    pub fn before(&self) -> KeypointState {
        self.before
    }

    pub fn after(&self) -> KeypointState {
        self.after
    }

    /// Whether applying this edit changes nothing.
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }

    /// Get a human-readable description of this edit
    pub fn description(&self) -> String {
        if self.before.visibility != self.after.visibility
            && self.before.x == self.after.x
            && self.before.y == self.after.y
        {
            format!("Change visibility of keypoint {}", self.keypoint_index)
        } else {
            format!("Move keypoint {}", self.keypoint_index)
        }
    }
}

// ============================================================================
// Undo Stack
// ============================================================================

/// The undo/redo history stack.
///
/// Maintains two stacks:
/// - `undo_stack`: Edits that can be undone (most recent at the end)
/// - `redo_stack`: Edits that can be redone (most recent at the end)
///
/// Pushing a new edit clears the redo stack. Undo moves an edit from
/// `undo_stack` to `redo_stack`; redo moves it back.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    undo_stack: Vec<KeypointEdit>,
    redo_stack: Vec<KeypointEdit>,
}

impl UndoStack {
    /// Create a new empty undo stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit that has already been applied.
    ///
    /// Zero-delta edits are dropped and leave the redo stack intact.
    /// Returns whether the edit was recorded.
    pub fn push(&mut self, edit: KeypointEdit) -> bool {
        if edit.is_noop() {
            log::trace!("Undo: ignored no-op edit on keypoint {}", edit.keypoint_index);
            return false;
        }
        log::debug!("📝 Undo: pushed '{}'", edit.description());
        self.undo_stack.push(edit);
        self.redo_stack.clear();
        true
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pop the newest edit for undoing; it moves to the redo stack.
    pub fn pop_undo(&mut self) -> Option<KeypointEdit> {
        let edit = self.undo_stack.pop()?;
        log::debug!("⏪ Undo: '{}'", edit.description());
        self.redo_stack.push(edit);
        Some(edit)
    }

    /// Pop the newest undone edit for redoing; it moves back to the undo stack.
    pub fn pop_redo(&mut self) -> Option<KeypointEdit> {
        let edit = self.redo_stack.pop()?;
        log::debug!("⏩ Redo: '{}'", edit.description());
        self.undo_stack.push(edit);
        Some(edit)
    }

    /// Get the description of the edit that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(KeypointEdit::description)
    }

    /// Get the description of the edit that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(KeypointEdit::description)
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("🗑️ Undo history cleared");
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

// ============================================================================
// Undo/Redo Execution
// ============================================================================

/// Undo the newest edit by restoring its `before` state on the pose.
/// Returns false if there was nothing to undo.
pub fn undo_command(stack: &mut UndoStack, pose: &mut PoseRecord) -> bool {
    let Some(edit) = stack.pop_undo() else {
        return false;
    };
    pose.set_keypoint_state(edit.keypoint_index, edit.before);
    true
}

/// Redo the newest undone edit by re-applying its `after` state.
/// Returns false if there was nothing to redo.
pub fn redo_command(stack: &mut UndoStack, pose: &mut PoseRecord) -> bool {
    let Some(edit) = stack.pop_redo() else {
        return false;
    };
    pose.set_keypoint_state(edit.keypoint_index, edit.after);
    true
}

// ============================================================================
// Tests
// ============================================================================
