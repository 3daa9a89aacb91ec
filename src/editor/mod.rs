//! Cell editing state.
//!
//! `Editor` tracks the one cell being edited and its in-progress input, and
//! remembers committed values until the host's next sheet snapshot reflects them:
//! - Commit sends the value to the cell store before the edit state is cleared
//! - Cancel drops the edit without touching the store
//! - Pending values shadow the snapshot for display

use std::collections::HashMap;

use crate::collab::CellStore;
use crate::error::{Result, SheetGridError};
use crate::types::{CellUpdate, CellValue};

/// The cell currently being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub cell_id: String,
    /// Current contents of the input box.
    pub input: String,
}

/// Editor state (separate from selection state).
#[derive(Debug, Default)]
pub struct Editor {
    editing: Option<EditState>,
    /// Committed values not yet present in the sheet snapshot, keyed by cell id.
    pending: HashMap<String, CellValue>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn state(&self) -> Option<&EditState> {
        self.editing.as_ref()
    }

    pub fn editing_cell(&self) -> Option<&str> {
        self.editing.as_ref().map(|e| e.cell_id.as_str())
    }

    pub fn input(&self) -> Option<&str> {
        self.editing.as_ref().map(|e| e.input.as_str())
    }

    /// Start editing `cell_id` with `initial` in the input box.
    ///
    /// Replaces any edit in progress without committing it; callers commit first.
    pub fn begin(&mut self, cell_id: &str, initial: impl Into<String>) {
        self.editing = Some(EditState {
            cell_id: cell_id.to_string(),
            input: initial.into(),
        });
    }

    /// Mirror the input box contents.
    pub fn set_input(&mut self, text: &str) {
        if let Some(edit) = self.editing.as_mut() {
            text.clone_into(&mut edit.input);
        }
    }

    /// Send the in-progress value to `store`, then clear the edit state.
    ///
    /// The edit state is cleared whether or not the store accepts the value;
    /// a store failure is returned to the caller. Returns `Ok(None)` when no
    /// edit is active.
    pub fn commit(&mut self, store: &dyn CellStore) -> Result<Option<CellUpdate>> {
        let Some(edit) = self.editing.as_ref() else {
            return Ok(None);
        };
        let value = CellValue::from_input(&edit.input);
        let outcome = store.update_cell(&edit.cell_id, &value);

        let Some(edit) = self.editing.take() else {
            return Ok(None);
        };
        match outcome {
            Ok(()) => {
                log::debug!("committed edit to {}", edit.cell_id);
                self.pending.insert(edit.cell_id.clone(), value.clone());
                Ok(Some(CellUpdate {
                    cell_id: edit.cell_id,
                    value,
                }))
            }
            Err(e) => {
                log::warn!("cell store rejected edit to {}: {e}", edit.cell_id);
                Err(match e {
                    SheetGridError::Collaborator(_) => e,
                    other => SheetGridError::Collaborator(other.to_string()),
                })
            }
        }
    }

    /// Drop the edit without committing. Returns whether an edit was active.
    pub fn cancel(&mut self) -> bool {
        self.editing.take().is_some()
    }

    /// Value committed locally but not yet in the snapshot.
    pub fn pending_value(&self, cell_id: &str) -> Option<&CellValue> {
        self.pending.get(cell_id)
    }

    /// Every locally committed value, in no particular order.
    pub fn pending(&self) -> impl Iterator<Item = (&str, &CellValue)> + '_ {
        self.pending.iter().map(|(id, value)| (id.as_str(), value))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// A fresh snapshot arrived; it supersedes pending values.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::collab::LocalBoxFuture;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(String, CellValue)>>,
        fail: bool,
    }

    impl CellStore for Recorder {
        fn update_cell(&self, cell_id: &str, value: &CellValue) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((cell_id.to_string(), value.clone()));
            if self.fail {
                Err("offline".into())
            } else {
                Ok(())
            }
        }

        fn bulk_update_cells(&self, _updates: Vec<CellUpdate>) -> LocalBoxFuture<'_, Result<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    #[test]
    fn commit_sends_numeric_input_as_number() {
        let store = Recorder::default();
        let mut editor = Editor::new();
        editor.begin("B2", "");
        editor.set_input("12.5");
        let update = editor.commit(&store).unwrap().unwrap();
        assert_eq!(update.value, CellValue::Number(12.5));
        assert_eq!(store.calls.borrow().len(), 1);
        assert!(!editor.is_editing());
        assert_eq!(editor.pending_value("B2"), Some(&CellValue::Number(12.5)));
    }

    #[test]
    fn failed_commit_still_clears_edit() {
        let store = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut editor = Editor::new();
        editor.begin("A1", "x");
        assert!(matches!(
            editor.commit(&store),
            Err(SheetGridError::Collaborator(_))
        ));
        assert!(!editor.is_editing());
        assert_eq!(editor.pending_count(), 0);
    }

    #[test]
    fn cancel_never_reaches_store() {
        let store = Recorder::default();
        let mut editor = Editor::new();
        editor.begin("A1", "draft");
        assert!(editor.cancel());
        assert!(editor.commit(&store).unwrap().is_none());
        assert!(store.calls.borrow().is_empty());
    }
}
