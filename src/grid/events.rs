//! Pointer, keyboard and scroll handlers for `GridView`.
//!
//! Handlers return `true` when the event was consumed (the wasm layer then calls
//! `preventDefault`). Any edit in progress is committed before a handler changes
//! the selection, so the cell store sees the edit first.

use super::GridView;
use crate::cell_ref::{self, CellCoord};
use crate::layout::HitTarget;
use crate::selection::{Direction, Region};

impl GridView {
    /// Native scroll container moved to `(left, top)`. Returns whether the row window moved.
    pub fn on_scroll(&mut self, left: f32, top: f32) -> bool {
        self.viewport.set_scroll(
            left,
            top,
            &self.layout.config,
            self.layout.row_count,
            self.layout.col_count,
        );
        self.refresh_window()
    }

    /// Wheel over the grid. Consumed while the grid can still scroll in that
    /// direction; at an edge the event is left for the enclosing canvas.
    pub fn on_wheel(&mut self, delta_x: f32, delta_y: f32) -> bool {
        let (dx, dy) = self.viewport.scroll_by(
            delta_x,
            delta_y,
            &self.layout.config,
            self.layout.row_count,
            self.layout.col_count,
        );
        let moved = dx.abs() > f32::EPSILON || dy.abs() > f32::EPSILON;
        if moved {
            self.refresh_window();
            self.needs_render = true;
        }
        moved
    }

    /// Commit an edit on another cell before the selection moves to `target`.
    fn commit_before_navigation(&mut self, target: Option<&str>) {
        let Some(editing) = self.editor.editing_cell() else {
            return;
        };
        if target == Some(editing) {
            return;
        }
        if let Err(e) = self.commit_edit() {
            log::warn!("edit commit before navigation failed: {e}");
        }
    }

    /// Click a cell by id (no drag). Shift extends from the primary cell.
    pub fn click_cell(&mut self, id: &str, shift: bool) -> bool {
        if self.busy.is_busy() {
            return false;
        }
        if self.editor.editing_cell() == Some(id) {
            return false;
        }
        self.commit_before_navigation(Some(id));
        let changed = self.selection.click(id, shift);
        if changed {
            self.notify_selection();
        }
        changed
    }

    /// Pointer pressed at `(x, y)` relative to the grid container.
    pub fn on_mouse_down(&mut self, x: f32, y: f32, shift: bool) -> bool {
        if self.busy.is_busy() {
            return false;
        }
        match self.layout.hit_test(x, y, &self.viewport) {
            HitTarget::Cell(coord) => {
                let id = coord.to_id();
                if self.editor.editing_cell() == Some(id.as_str()) {
                    return false;
                }
                self.commit_before_navigation(Some(&id));
                let changed = if shift && !self.selection.selection().is_empty() {
                    self.selection.click(&id, true)
                } else {
                    self.selection.drag_start(&id)
                };
                if changed {
                    self.notify_selection();
                }
                true
            }
            HitTarget::RowHeader(row) => {
                let last_col = self.layout.col_count.saturating_sub(1);
                self.select_coords(CellCoord::new(row, 0), CellCoord::new(row, last_col))
            }
            HitTarget::ColumnHeader(col) => {
                let last_row = self.layout.row_count.saturating_sub(1);
                self.select_coords(CellCoord::new(0, col), CellCoord::new(last_row, col))
            }
            HitTarget::CornerHeader | HitTarget::None => false,
        }
    }

    /// Pointer moved. Extends the selection while dragging.
    pub fn on_mouse_move(&mut self, x: f32, y: f32) -> bool {
        if self.busy.is_busy() || !self.selection.is_dragging() {
            return false;
        }
        let Some(coord) = self.layout.cell_at_point(x, y, &self.viewport) else {
            return false;
        };
        let changed = self.selection.drag_move(&coord.to_id());
        if changed {
            self.notify_selection();
        }
        changed
    }

    /// Pointer released: dragging ends, selection stays.
    pub fn on_mouse_up(&mut self) {
        self.selection.drag_end();
    }

    /// Double-click starts editing the cell under the pointer.
    pub fn on_double_click(&mut self, x: f32, y: f32) -> bool {
        let Some(coord) = self.layout.cell_at_point(x, y, &self.viewport) else {
            return false;
        };
        self.selection.drag_end();
        self.begin_edit(&coord.to_id(), None).is_ok()
    }

    /// Pointer-down outside the grid body.
    pub fn on_click_outside(&mut self, region: Region) -> bool {
        if self.busy.is_busy() {
            return false;
        }
        let changed = self.selection.click_outside(region);
        if changed {
            self.notify_selection();
        }
        changed
    }

    /// The edit input lost focus: commit in place.
    pub fn on_blur(&mut self) {
        if let Err(e) = self.commit_edit() {
            log::warn!("edit commit on blur failed: {e}");
        }
    }

    /// Select the rectangle between two ids.
    pub fn select_range(&mut self, a: &str, b: &str) -> bool {
        if self.busy.is_busy() {
            return false;
        }
        self.commit_before_navigation(None);
        let changed = self.selection.select_range(a, b);
        if changed {
            self.notify_selection();
        }
        changed
    }

    /// Select a range reference such as `"B2:C5"` or a single `"D4"`.
    pub fn select_ref(&mut self, range: &str) -> bool {
        match cell_ref::parse_cell_range(range) {
            Some((a, b)) => self.select_coords(a, b),
            None => {
                log::warn!("ignoring malformed range reference {range:?}");
                false
            }
        }
    }

    fn select_coords(&mut self, a: CellCoord, b: CellCoord) -> bool {
        self.select_range(&a.to_id(), &b.to_id())
    }

    /// Key pressed. `key` is the DOM `KeyboardEvent.key` value.
    pub fn on_key_down(&mut self, key: &str, shift: bool, ctrl: bool) -> bool {
        if self.busy.is_busy() {
            return false;
        }
        if self.editor.is_editing() {
            return self.on_edit_key(key);
        }

        if let Some(direction) = Direction::from_key(key) {
            if self.selection.arrow(direction, shift) {
                self.notify_selection();
            }
            return !self.selection.selection().is_empty();
        }

        let Some(primary) = self.selection.primary().map(str::to_string) else {
            return false;
        };
        match key {
            "Escape" => {
                if self.selection.escape() {
                    self.notify_selection();
                }
                true
            }
            "Enter" | "F2" => self.begin_edit(&primary, None).is_ok(),
            _ if !ctrl && key.chars().count() == 1 => self.begin_edit(&primary, Some(key)).is_ok(),
            _ => false,
        }
    }

    fn on_edit_key(&mut self, key: &str) -> bool {
        let direction = match key {
            "Escape" => return self.cancel_edit(),
            "Enter" => Direction::Down,
            "Tab" => Direction::Right,
            _ => return false,
        };
        let Some(editing) = self.editor.editing_cell().map(str::to_string) else {
            return false;
        };
        if let Err(e) = self.commit_edit() {
            log::warn!("edit commit failed: {e}");
        }
        let Some(from) = cell_ref::decode(&editing) else {
            return true;
        };
        let next = direction
            .step(from, self.layout.row_count, self.layout.col_count)
            .to_id();
        if self.selection.click(&next, false) {
            self.notify_selection();
        }
        true
    }
}
