//! Common test utilities: recording collaborators and sheet builders.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::cell::RefCell;
use std::rc::Rc;

use sheetgrid::collab::{CellStore, LocalBoxFuture, RowGrowth, SelectionObserver};
use sheetgrid::config::GridConfig;
use sheetgrid::error::{Result, SheetGridError};
use sheetgrid::grid::GridView;
use sheetgrid::types::{CellUpdate, CellValue, Sheet};

/// Ordered record of every collaborator call.
pub type Journal = Rc<RefCell<Vec<String>>>;

/// Cell store that records calls and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    pub journal: Journal,
    pub fail_updates: bool,
    pub fail_bulk: bool,
}

impl RecordingStore {
    pub fn with_journal(journal: &Journal) -> Self {
        Self {
            journal: Rc::clone(journal),
            ..Self::default()
        }
    }
}

impl CellStore for RecordingStore {
    fn update_cell(&self, cell_id: &str, value: &CellValue) -> Result<()> {
        self.journal
            .borrow_mut()
            .push(format!("update {cell_id}={}", value.display_text()));
        if self.fail_updates {
            return Err(SheetGridError::Collaborator("store offline".into()));
        }
        Ok(())
    }

    fn bulk_update_cells(&self, updates: Vec<CellUpdate>) -> LocalBoxFuture<'_, Result<()>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            self.journal
                .borrow_mut()
                .push(format!("bulk {}", updates.len()));
            if self.fail_bulk {
                Err(SheetGridError::Collaborator("bulk rejected".into()))
            } else {
                Ok(())
            }
        })
    }
}

/// Observer that records the selection it is shown.
pub struct RecordingObserver(pub Journal);

impl SelectionObserver for RecordingObserver {
    fn on_selection_change(&self, selected: &[String]) {
        self.0
            .borrow_mut()
            .push(format!("selection {}", selected.join(",")));
    }
}

pub struct RecordingGrowth(pub Journal);

impl RowGrowth for RecordingGrowth {
    fn on_add_more_rows(&self) {
        self.0.borrow_mut().push("grow".to_string());
    }
}

/// Sheet with the given `(id, value)` cells.
pub fn sheet_with(rows: u32, cols: u32, cells: &[(&str, CellValue)]) -> Sheet {
    let mut sheet = Sheet::new("sheet-1", "Sheet 1", rows, cols);
    for (id, value) in cells {
        sheet.set_value(*id, value.clone());
    }
    sheet
}

/// A grid over `sheet` wired to a recording store, observer and growth hook.
pub fn recorded_grid(sheet: Sheet, store: RecordingStore) -> (GridView, Journal) {
    let journal = Rc::clone(&store.journal);
    let grid = GridView::new(sheet, GridConfig::default(), Rc::new(store))
        .unwrap()
        .with_observer(Rc::new(RecordingObserver(Rc::clone(&journal))))
        .with_row_growth(Rc::new(RecordingGrowth(Rc::clone(&journal))));
    (grid, journal)
}

pub fn grid(rows: u32, cols: u32) -> (GridView, Journal) {
    recorded_grid(Sheet::new("sheet-1", "Sheet 1", rows, cols), RecordingStore::default())
}

pub fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}
