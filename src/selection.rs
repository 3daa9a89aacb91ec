//! Range selection engine.
//!
//! Pure state machine over cell ids: clicks, drags, arrow keys, escape and
//! outside clicks produce a new [`Selection`]. Every transition reports whether
//! the selected cells changed so the caller knows when to notify observers.

use serde::{Deserialize, Serialize};

use crate::cell_ref::{self, CellCoord};
use crate::types::Selection;

/// All ids in the rectangle spanned by `a` and `b`, row-major.
///
/// Malformed ids produce an empty list.
pub fn range_between(a: &str, b: &str) -> Vec<String> {
    match (cell_ref::decode(a), cell_ref::decode(b)) {
        (Some(a), Some(b)) => range_between_coords(a, b),
        _ => {
            log::warn!("ignoring range with malformed endpoint: {a:?}..{b:?}");
            Vec::new()
        }
    }
}

/// All ids in the rectangle spanned by two coordinates, row-major.
pub fn range_between_coords(a: CellCoord, b: CellCoord) -> Vec<String> {
    let (min_row, max_row) = (a.row.min(b.row), a.row.max(b.row));
    let (min_col, max_col) = (a.col.min(b.col), a.col.max(b.col));
    let mut ids = Vec::with_capacity(
        ((max_row - min_row) as usize + 1).saturating_mul((max_col - min_col) as usize + 1),
    );
    for row in min_row..=max_row {
        for col in min_col..=max_col {
            ids.push(cell_ref::encode(row, col));
        }
    }
    ids
}

/// Like [`range_between`], with both endpoints clamped into a `rows x cols` sheet.
pub fn range_between_clamped(a: &str, b: &str, rows: u32, cols: u32) -> Vec<String> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let clamp = |c: CellCoord| CellCoord::new(c.row.min(rows - 1), c.col.min(cols - 1));
    match (cell_ref::decode(a), cell_ref::decode(b)) {
        (Some(a), Some(b)) => range_between_coords(clamp(a), clamp(b)),
        _ => Vec::new(),
    }
}

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }

    /// The adjacent coordinate, clamped to `[0, rows) x [0, cols)`.
    pub fn step(self, from: CellCoord, rows: u32, cols: u32) -> CellCoord {
        let max_row = rows.saturating_sub(1);
        let max_col = cols.saturating_sub(1);
        let (row, col) = match self {
            Self::Up => (from.row.saturating_sub(1), from.col),
            Self::Down => (from.row.saturating_add(1), from.col),
            Self::Left => (from.row, from.col.saturating_sub(1)),
            Self::Right => (from.row, from.col.saturating_add(1)),
        };
        CellCoord::new(row.min(max_row), col.min(max_col))
    }
}

/// Where a pointer-down outside the grid body landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Region {
    Toolbar,
    ColorPalette,
    AiChat,
    Elsewhere,
}

impl Region {
    /// Clicks in these regions act on the selection and must not clear it.
    pub fn is_exempt(self) -> bool {
        matches!(self, Self::Toolbar | Self::ColorPalette | Self::AiChat)
    }
}

/// Mouse drag state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { origin: String },
}

/// Selection state machine for one sheet.
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    selection: Selection,
    drag: DragState,
    /// Moving end of a keyboard-extended range; the anchor is the fixed end.
    focus: Option<String>,
    row_count: u32,
    col_count: u32,
}

impl SelectionEngine {
    pub fn new(row_count: u32, col_count: u32) -> Self {
        Self {
            row_count,
            col_count,
            ..Self::default()
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn cells(&self) -> &[String] {
        &self.selection.cells
    }

    pub fn anchor(&self) -> Option<&str> {
        self.selection.anchor.as_deref()
    }

    pub fn primary(&self) -> Option<&str> {
        self.selection.primary()
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Update sheet bounds, dropping any selected id that fell outside.
    pub fn set_bounds(&mut self, row_count: u32, col_count: u32) -> bool {
        self.row_count = row_count;
        self.col_count = col_count;
        let before = self.selection.cells.len();
        self.selection
            .cells
            .retain(|id| cell_ref::decode(id).is_some_and(|c| c.within(row_count, col_count)));
        if let Some(anchor) = &self.selection.anchor {
            if !self.in_bounds(anchor) {
                self.selection.anchor = None;
            }
        }
        if self.focus.as_deref().is_some_and(|f| !self.in_bounds(f)) {
            self.focus = None;
        }
        before != self.selection.cells.len()
    }

    fn in_bounds(&self, id: &str) -> bool {
        cell_ref::decode(id).is_some_and(|c| c.within(self.row_count, self.col_count))
    }

    fn replace(&mut self, cells: Vec<String>) -> bool {
        let changed = self.selection.cells != cells;
        self.selection.cells = cells;
        changed
    }

    /// Plain click selects one cell; shift+click extends from the primary cell.
    pub fn click(&mut self, id: &str, shift: bool) -> bool {
        if !self.in_bounds(id) {
            log::warn!("click on cell outside the sheet: {id:?}");
            return false;
        }
        if shift {
            if let Some(primary) = self.selection.primary().map(str::to_string) {
                log::debug!("shift-extend selection {primary}..{id}");
                self.focus = Some(id.to_string());
                let range = range_between(&primary, id);
                return self.replace(range);
            }
        }
        self.selection.anchor = None;
        self.focus = None;
        self.replace(vec![id.to_string()])
    }

    /// Mouse-down without shift: select the cell and start dragging from it.
    pub fn drag_start(&mut self, id: &str) -> bool {
        if !self.in_bounds(id) {
            return false;
        }
        self.drag = DragState::Dragging {
            origin: id.to_string(),
        };
        self.selection.anchor = None;
        self.focus = None;
        self.replace(vec![id.to_string()])
    }

    /// Pointer moved over `id` while dragging: select the origin..id rectangle.
    pub fn drag_move(&mut self, id: &str) -> bool {
        let DragState::Dragging { origin } = &self.drag else {
            return false;
        };
        let range = range_between_clamped(origin, id, self.row_count, self.col_count);
        if range.is_empty() {
            return false;
        }
        self.replace(range)
    }

    /// Mouse released: stop dragging, keep the selection.
    pub fn drag_end(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Arrow navigation. Without shift moves the single selected cell; with shift
    /// pins the anchor to the previous primary and extends toward the key.
    pub fn arrow(&mut self, direction: Direction, shift: bool) -> bool {
        let Some(primary) = self.selection.primary().map(str::to_string) else {
            return false;
        };

        if !shift {
            let Some(from) = cell_ref::decode(&primary) else {
                return false;
            };
            let next = direction.step(from, self.row_count, self.col_count).to_id();
            self.selection.anchor = None;
            self.focus = None;
            return self.replace(vec![next]);
        }

        let anchor = self
            .selection
            .anchor
            .get_or_insert_with(|| primary.clone())
            .clone();
        let moving = self.focus.clone().unwrap_or(primary);
        let Some(from) = cell_ref::decode(&moving) else {
            return false;
        };
        let next = direction.step(from, self.row_count, self.col_count).to_id();
        log::debug!("keyboard-extend selection {anchor}..{next}");
        let range = range_between(&anchor, &next);
        self.focus = Some(next);
        self.replace(range)
    }

    /// Escape outside of editing: drop selection and anchor.
    pub fn escape(&mut self) -> bool {
        self.clear()
    }

    /// Pointer-down outside the grid body.
    pub fn click_outside(&mut self, region: Region) -> bool {
        if region.is_exempt() {
            return false;
        }
        self.clear()
    }

    /// Select an explicit rectangle, e.g. from the host's name box.
    pub fn select_range(&mut self, a: &str, b: &str) -> bool {
        let range = range_between_clamped(a, b, self.row_count, self.col_count);
        if range.is_empty() {
            return false;
        }
        self.selection.anchor = None;
        self.focus = None;
        self.replace(range)
    }

    /// Forget the anchor (editing started).
    pub fn clear_anchor(&mut self) {
        self.selection.anchor = None;
        self.focus = None;
    }

    pub fn clear(&mut self) -> bool {
        self.drag = DragState::Idle;
        self.selection.anchor = None;
        self.focus = None;
        self.replace(Vec::new())
    }
}
