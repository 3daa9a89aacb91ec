//! Render data for the virtualized grid.
//!
//! This module turns the current sheet, viewport, selection and edit state into
//! a [`RenderFrame`]: only the rows inside the buffered window are materialized,
//! every column of those rows is. Drawing the frame is the host's job.

pub mod selection;

use std::collections::HashSet;

use serde::Serialize;

use crate::cell_ref;
use crate::editor::Editor;
use crate::layout::{CellRect, GridLayout, RowWindow, Viewport};
use crate::types::{CellStyle, Selection, Sheet};
pub use selection::{selection_overlay, SelectionRect};

/// One materialized cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRenderData {
    pub id: String,
    pub row: u32,
    pub col: u32,
    pub rect: CellRect,
    /// Display text; the live input while the cell is being edited.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
    pub selected: bool,
    pub primary: bool,
    pub editing: bool,
}

/// Materialized rows of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridFrame {
    pub window: RowWindow,
    pub total_width: f32,
    pub total_height: f32,
    pub col_labels: Vec<String>,
    pub cells: Vec<CellRenderData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<SelectionRect>,
    /// Show the "add more rows" control.
    pub show_add_rows: bool,
}

/// What the host should draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RenderFrame {
    /// Sheet data is still loading: draw placeholder rows instead of cells.
    Skeleton { rows: u32, cols: u32 },
    /// Sheet has no rows.
    Empty,
    Grid(GridFrame),
}

impl RenderFrame {
    pub fn as_grid(&self) -> Option<&GridFrame> {
        match self {
            Self::Grid(frame) => Some(frame),
            _ => None,
        }
    }
}

/// Inputs for [`build_frame`].
pub struct RenderParams<'a> {
    pub sheet: &'a Sheet,
    pub layout: &'a GridLayout,
    pub viewport: &'a Viewport,
    pub selection: &'a Selection,
    pub editor: &'a Editor,
    pub loading: bool,
}

/// Build the frame for the current state.
pub fn build_frame(params: &RenderParams<'_>) -> RenderFrame {
    let RenderParams {
        sheet,
        layout,
        viewport,
        selection,
        editor,
        loading,
    } = *params;

    if loading {
        let config = &layout.config;
        let rows = viewport
            .row_window(config, u32::MAX)
            .map_or(0, |w| w.len().min(layout.row_count.max(1)));
        return RenderFrame::Skeleton {
            rows,
            cols: layout.col_count,
        };
    }

    let Some(window) = viewport.row_window(&layout.config, layout.row_count) else {
        return RenderFrame::Empty;
    };

    let primary = selection.primary();
    let selected: HashSet<&str> = selection.cells.iter().map(String::as_str).collect();
    let editing = editor.state();
    let capacity = (window.len() as usize).saturating_mul(layout.col_count as usize);
    let mut cells = Vec::with_capacity(capacity);

    for row in window.rows() {
        for col in 0..layout.col_count {
            let id = cell_ref::encode(row, col);
            let stored = sheet.cell(&id);
            let value = editor
                .pending_value(&id)
                .or_else(|| stored.map(|c| &c.value));

            let is_editing = editing.is_some_and(|e| e.cell_id == id);
            let text = match editing {
                Some(edit) if is_editing => edit.input.clone(),
                _ => value.map(|v| v.display_text()).unwrap_or_default(),
            };

            cells.push(CellRenderData {
                rect: layout.cell_rect(row, col),
                text,
                numeric_value: value.and_then(|v| v.as_number()),
                style: stored.and_then(|c| c.style.clone()),
                selected: selected.contains(id.as_str()),
                primary: primary == Some(id.as_str()),
                editing: is_editing,
                row,
                col,
                id,
            });
        }
    }

    log::trace!(
        "materialized rows {}..={} ({} cells)",
        window.start_row,
        window.end_row,
        cells.len()
    );

    RenderFrame::Grid(GridFrame {
        window,
        total_width: layout.total_width(),
        total_height: layout.total_height(),
        col_labels: (0..layout.col_count).map(cell_ref::col_to_letters).collect(),
        cells,
        overlay: selection_overlay(selection, layout),
        show_add_rows: viewport.near_bottom(&layout.config, layout.row_count)
            && layout.row_count < layout.config.max_rows,
    })
}
