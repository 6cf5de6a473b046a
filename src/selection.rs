//! Batch selection of chats for bulk folder moves.
//!
//! Two states: Idle (default) and Selecting. The transition is a manual
//! user toggle, never a data event. Leaving the lobby forcibly resets to
//! Idle so stale selections cannot leak into the next session.

use std::collections::HashSet;

use thiserror::Error;

use crate::organizer::{ChatKey, OrganizerStore};

/// Whether multi-select is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// No selection UI; toggles are ignored
    #[default]
    Idle,
    /// Chats accumulate selected flags until a move or a reset
    Selecting,
}

/// Why a batch move was refused. Both are user-reportable; the operation
/// aborts and the selection stays as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchMoveError {
    /// No target folder picked
    #[error("select a folder to move chats into")]
    EmptyTarget,
    /// Nothing selected
    #[error("select at least one chat to move")]
    NothingSelected,
}

/// Selection state for the chat list.
#[derive(Debug, Default)]
pub struct BatchSelection {
    mode: SelectionMode,
    selected: HashSet<ChatKey>,
}

impl BatchSelection {
    /// Fresh Idle state with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Flip between Idle and Selecting. Every entry starts unselected when
    /// entering, and nothing stays selected after leaving.
    pub fn toggle_mode(&mut self) -> SelectionMode {
        self.selected.clear();
        self.mode = match self.mode {
            SelectionMode::Idle => SelectionMode::Selecting,
            SelectionMode::Selecting => SelectionMode::Idle,
        };
        self.mode
    }

    /// Flip one entry's selected flag. Returns the new flag, or false when
    /// not in Selecting mode (the toggle is ignored).
    pub fn toggle(&mut self, key: ChatKey) -> bool {
        if self.mode != SelectionMode::Selecting {
            return false;
        }
        if self.selected.remove(&key) {
            false
        } else {
            self.selected.insert(key);
            true
        }
    }

    /// Whether one entry is selected.
    pub fn is_selected(&self, key: &ChatKey) -> bool {
        self.selected.contains(key)
    }

    /// Running count of selected entries.
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// Force back to Idle with nothing selected. Called on lobby close.
    pub fn reset(&mut self) {
        self.mode = SelectionMode::Idle;
        self.selected.clear();
    }

    /// Move every selected chat to the target folder in one store write,
    /// then return to Idle with a cleared selection. Refuses an empty
    /// target or an empty selection without touching anything.
    pub fn execute_move(
        &mut self,
        store: &mut OrganizerStore,
        target_folder_id: &str,
    ) -> Result<usize, BatchMoveError> {
        if target_folder_id.is_empty() {
            return Err(BatchMoveError::EmptyTarget);
        }
        if self.selected.is_empty() {
            return Err(BatchMoveError::NothingSelected);
        }

        let keys: Vec<ChatKey> = self.selected.drain().collect();
        let moved = store.move_chats_batch(&keys, target_folder_id);
        self.reset();
        Ok(moved)
    }
}
