//! `GridView`: the grid core that owns viewport, selection and edit state.
//!
//! This module provides the target-independent grid that handles:
//! - Holding the current sheet snapshot and its layout
//! - Row virtualization and scroll state
//! - Routing pointer and keyboard input to the selection engine and editor
//! - Talking to the host's cell store, selection observer and growth hook
//!
//! Input handlers live in `events.rs`; the wasm bindings in `crate::viewer`
//! wrap a `GridView` behind `Rc<RefCell<_>>`.

mod events;

use std::borrow::Cow;
use std::rc::Rc;

use crate::analysis::{self, SchemaColumn, SelectionStats, SheetReport};
use crate::cell_ref;
use crate::collab::{self, BusyFlag, CellStore, LocalBoxFuture, RowGrowth, SelectionObserver};
use crate::config::GridConfig;
use crate::editor::Editor;
use crate::error::{Result, SheetGridError};
use crate::layout::{GridLayout, RowWindow, Viewport};
use crate::render::{self, RenderFrame, RenderParams};
use crate::selection::SelectionEngine;
use crate::sort::{self, SortDirection};
use crate::types::{CellUpdate, CellValue, Selection, Sheet};

/// The grid core.
pub struct GridView {
    sheet: Sheet,
    layout: GridLayout,
    viewport: Viewport,
    selection: SelectionEngine,
    editor: Editor,
    store: Rc<dyn CellStore>,
    observer: Option<Rc<dyn SelectionObserver>>,
    growth: Option<Rc<dyn RowGrowth>>,
    busy: BusyFlag,
    loading: bool,
    last_window: Option<RowWindow>,
    needs_render: bool,
}

impl GridView {
    /// Create a grid over `sheet`, writing edits to `store`.
    pub fn new(sheet: Sheet, config: GridConfig, store: Rc<dyn CellStore>) -> Result<Self> {
        config.validate()?;
        let layout = GridLayout::new(config, sheet.row_count, sheet.col_count);
        let selection = SelectionEngine::new(sheet.row_count, sheet.col_count);
        let mut grid = Self {
            sheet,
            layout,
            viewport: Viewport::new(),
            selection,
            editor: Editor::new(),
            store,
            observer: None,
            growth: None,
            busy: BusyFlag::default(),
            loading: false,
            last_window: None,
            needs_render: true,
        };
        grid.last_window = grid.row_window();
        Ok(grid)
    }

    pub fn with_observer(mut self, observer: Rc<dyn SelectionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_row_growth(mut self, growth: Rc<dyn RowGrowth>) -> Self {
        self.growth = Some(growth);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn config(&self) -> &GridConfig {
        &self.layout.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    pub fn selected_cells(&self) -> &[String] {
        self.selection.cells()
    }

    pub fn anchor(&self) -> Option<&str> {
        self.selection.anchor()
    }

    pub fn is_dragging(&self) -> bool {
        self.selection.is_dragging()
    }

    pub fn editing_cell(&self) -> Option<&str> {
        self.editor.editing_cell()
    }

    pub fn edit_input(&self) -> Option<&str> {
        self.editor.input()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether state changed since the last [`GridView::take_needs_render`].
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Mark the grid for re-render.
    pub fn invalidate(&mut self) {
        self.needs_render = true;
    }

    pub fn take_needs_render(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }

    /// Display value of a cell, including locally committed edits.
    pub fn cell_value(&self, id: &str) -> &CellValue {
        self.editor
            .pending_value(id)
            .unwrap_or_else(|| self.sheet.value(id))
    }

    /// The snapshot with locally committed edits applied.
    ///
    /// Borrows the snapshot when nothing is pending.
    pub fn live_sheet(&self) -> Cow<'_, Sheet> {
        if self.editor.pending_count() == 0 {
            return Cow::Borrowed(&self.sheet);
        }
        let mut sheet = self.sheet.clone();
        for (id, value) in self.editor.pending() {
            sheet.set_value(id, value.clone());
        }
        Cow::Owned(sheet)
    }

    // ------------------------------------------------------------------
    // Snapshot and loading state
    // ------------------------------------------------------------------

    /// Replace the sheet snapshot after the host applied edits or loaded data.
    pub fn set_sheet(&mut self, sheet: Sheet) {
        self.layout.row_count = sheet.row_count;
        self.layout.col_count = sheet.col_count;
        self.sheet = sheet;
        self.editor.clear_pending();
        if let Some(editing) = self.editor.editing_cell() {
            if !self.sheet.contains(editing) {
                self.editor.cancel();
            }
        }
        self.viewport
            .clamp_scroll(&self.layout.config, self.layout.row_count, self.layout.col_count);
        if self
            .selection
            .set_bounds(self.layout.row_count, self.layout.col_count)
        {
            self.notify_selection();
        }
        self.refresh_window();
        self.needs_render = true;
    }

    /// While loading, frames are skeleton placeholders.
    pub fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.needs_render = true;
        }
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
        self.viewport
            .clamp_scroll(&self.layout.config, self.layout.row_count, self.layout.col_count);
        self.refresh_window();
        self.needs_render = true;
    }

    /// Current buffered row window.
    pub fn row_window(&self) -> Option<RowWindow> {
        self.viewport
            .row_window(&self.layout.config, self.layout.row_count)
    }

    /// Recompute the row window; returns whether it moved.
    fn refresh_window(&mut self) -> bool {
        let window = self.row_window();
        if window == self.last_window {
            return false;
        }
        log::debug!("row window -> {window:?}");
        self.last_window = window;
        self.needs_render = true;
        true
    }

    /// Whether the add-rows control should be visible.
    pub fn show_add_rows(&self) -> bool {
        self.layout.row_count < self.layout.config.max_rows
            && self
                .viewport
                .near_bottom(&self.layout.config, self.layout.row_count)
    }

    /// Ask the host for more rows and grow the local bounds by one batch.
    ///
    /// Returns the number of rows added; zero at the ceiling.
    pub fn add_more_rows(&mut self) -> u32 {
        let config = &self.layout.config;
        let added = self.sheet.grow_rows(config.add_rows_batch, config.max_rows);
        if added == 0 {
            log::debug!("row ceiling of {} reached", config.max_rows);
            return 0;
        }
        if let Some(growth) = &self.growth {
            growth.on_add_more_rows();
        }
        self.layout.row_count = self.sheet.row_count;
        self.selection
            .set_bounds(self.layout.row_count, self.layout.col_count);
        log::info!("added {added} rows, now {}", self.sheet.row_count);
        self.refresh_window();
        self.needs_render = true;
        added
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Render data for the current state.
    pub fn frame(&self) -> RenderFrame {
        render::build_frame(&RenderParams {
            sheet: &self.sheet,
            layout: &self.layout,
            viewport: &self.viewport,
            selection: self.selection.selection(),
            editor: &self.editor,
            loading: self.loading,
        })
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Start editing `id` with `initial` in the input box.
    ///
    /// Commits any other edit first. Clears the selection anchor.
    pub fn begin_edit(&mut self, id: &str, initial: Option<&str>) -> Result<()> {
        self.ensure_idle()?;
        if !self.sheet.contains(id) {
            return Err(SheetGridError::CellRef(id.to_string()));
        }
        if self.editor.editing_cell().is_some_and(|e| e != id) {
            self.commit_edit()?;
        }
        let initial = initial.map_or_else(|| self.cell_value(id).display_text(), str::to_string);
        self.selection.clear_anchor();
        if self.selection.primary() != Some(id) && self.selection.click(id, false) {
            self.notify_selection();
        }
        self.editor.begin(id, initial);
        self.needs_render = true;
        Ok(())
    }

    /// Mirror the input box contents into the edit state.
    pub fn set_edit_input(&mut self, text: &str) {
        self.editor.set_input(text);
        self.needs_render = true;
    }

    /// Commit the active edit through the cell store, then clear it.
    ///
    /// Returns the committed update, `None` when nothing was being edited.
    pub fn commit_edit(&mut self) -> Result<Option<CellUpdate>> {
        if !self.editor.is_editing() {
            return Ok(None);
        }
        self.ensure_idle()?;
        let result = self.editor.commit(self.store.as_ref());
        self.needs_render = true;
        result
    }

    /// Drop the active edit without committing.
    pub fn cancel_edit(&mut self) -> bool {
        let cancelled = self.editor.cancel();
        if cancelled {
            self.needs_render = true;
        }
        cancelled
    }

    // ------------------------------------------------------------------
    // Bulk operations
    // ------------------------------------------------------------------

    fn ensure_idle(&self) -> Result<()> {
        if self.busy.is_busy() {
            Err(SheetGridError::Busy)
        } else {
            Ok(())
        }
    }

    /// Send many updates to the store as one unit.
    ///
    /// The grid is busy from this call until the returned future completes or is
    /// dropped, whatever the outcome; input is ignored meanwhile.
    pub fn bulk_update(
        &self,
        updates: Vec<CellUpdate>,
    ) -> Result<LocalBoxFuture<'static, Result<()>>> {
        let guard = self.busy.acquire()?;
        let store = Rc::clone(&self.store);
        Ok(Box::pin(collab::run_bulk_update(store, guard, updates)))
    }

    /// Sort the used rows by column `col` through a bulk update.
    ///
    /// Row 1 stays in place when it holds the column's header.
    pub fn sort_column(
        &mut self,
        col: u32,
        direction: SortDirection,
    ) -> Result<LocalBoxFuture<'static, Result<()>>> {
        self.ensure_idle()?;
        if self.editor.is_editing() {
            self.commit_edit()?;
        }
        let updates = {
            let sheet = self.live_sheet();
            let has_header = analysis::schema::has_header(&sheet, col);
            sort::sort_rows_by_column(&sheet, col, direction, has_header)
        };
        self.bulk_update(updates)
    }

    // ------------------------------------------------------------------
    // Analysis
    // ------------------------------------------------------------------

    /// Statistics over the current selection.
    pub fn selection_stats(&self) -> SelectionStats {
        SelectionStats::from_values(self.selection.cells().iter().map(|id| self.cell_value(id)))
    }

    /// Schema for one column over its data rows.
    pub fn column_schema(&self, letter: &str) -> Option<SchemaColumn> {
        let col = cell_ref::letters_to_col(letter)?;
        if col >= self.layout.col_count {
            return None;
        }
        let sheet = self.live_sheet();
        let first = u32::from(analysis::schema::has_header(&sheet, col));
        Some(analysis::analyze_column(&sheet, col, first..self.layout.row_count))
    }

    /// Whole-sheet analysis, pending edits included.
    pub fn report(&self) -> SheetReport {
        analysis::analyze_sheet(&self.live_sheet())
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    fn notify_selection(&mut self) {
        self.needs_render = true;
        if let Some(observer) = &self.observer {
            observer.on_selection_change(self.selection.cells());
        }
    }
}
