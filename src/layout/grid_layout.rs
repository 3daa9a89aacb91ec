//! Fixed-size grid geometry.
//!
//! Every row shares one height and every column one width, so positions are
//! plain multiplication and hit testing is a division.

use serde::Serialize;

use super::Viewport;
use crate::cell_ref::CellCoord;
use crate::config::GridConfig;

/// Rectangle representing a cell's bounds, in content coordinates
/// (origin at the top-left of the scrollable area, headers included).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellRect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    /// Width of the cell
    pub width: f32,
    /// Height of the cell
    pub height: f32,
}

/// Target of a hit test (what was pressed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A regular cell
    Cell(CellCoord),
    /// A row number in the left gutter
    RowHeader(u32),
    /// A column letter in the header strip
    ColumnHeader(u32),
    /// The corner above the row gutter
    CornerHeader,
    /// Past the last row or column
    None,
}

/// Geometry for a `row_count x col_count` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub config: GridConfig,
    pub row_count: u32,
    pub col_count: u32,
}

impl GridLayout {
    pub fn new(config: GridConfig, row_count: u32, col_count: u32) -> Self {
        Self {
            config,
            row_count,
            col_count,
        }
    }

    pub fn total_width(&self) -> f32 {
        self.config.row_header_width + self.config.content_width(self.col_count)
    }

    pub fn total_height(&self) -> f32 {
        self.config.header_height + self.config.content_height(self.row_count)
    }

    /// Bounds of the cell at `(row, col)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_rect(&self, row: u32, col: u32) -> CellRect {
        CellRect {
            x: self.config.row_header_width + col as f32 * self.config.cell_width,
            y: self.config.header_height + row as f32 * self.config.row_height,
            width: self.config.cell_width,
            height: self.config.row_height,
        }
    }

    /// Row under content-space `y` (headers excluded), `None` past the last row.
    pub fn row_at_y(&self, y: f32) -> Option<u32> {
        let row = index_of(y, self.config.row_height)?;
        (row < self.row_count).then_some(row)
    }

    /// Column under content-space `x` (gutter excluded), `None` past the last column.
    pub fn col_at_x(&self, x: f32) -> Option<u32> {
        let col = index_of(x, self.config.cell_width)?;
        (col < self.col_count).then_some(col)
    }

    /// Hit test a point given relative to the grid container's top-left corner.
    ///
    /// Headers are sticky: they stay in place while the body scrolls under them.
    pub fn hit_test(&self, x: f32, y: f32, viewport: &Viewport) -> HitTarget {
        let header_w = self.config.row_header_width;
        let header_h = self.config.header_height;

        let in_gutter = x < header_w;
        let in_header = y < header_h;
        let body_x = x - header_w + viewport.scroll_left;
        let body_y = y - header_h + viewport.scroll_top;

        match (in_gutter, in_header) {
            (true, true) => HitTarget::CornerHeader,
            (false, true) => self
                .col_at_x(body_x)
                .map_or(HitTarget::None, HitTarget::ColumnHeader),
            (true, false) => self
                .row_at_y(body_y)
                .map_or(HitTarget::None, HitTarget::RowHeader),
            (false, false) => match (self.row_at_y(body_y), self.col_at_x(body_x)) {
                (Some(row), Some(col)) => HitTarget::Cell(CellCoord::new(row, col)),
                _ => HitTarget::None,
            },
        }
    }

    /// The cell under a point, if any.
    pub fn cell_at_point(&self, x: f32, y: f32, viewport: &Viewport) -> Option<CellCoord> {
        match self.hit_test(x, y, viewport) {
            HitTarget::Cell(coord) => Some(coord),
            _ => None,
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn index_of(offset: f32, step: f32) -> Option<u32> {
    if !offset.is_finite() || offset < 0.0 || step <= 0.0 {
        return None;
    }
    let q = (offset / step).floor();
    (q < u32::MAX as f32).then(|| q as u32)
}
