//! Viewport state management for scrolling and row virtualization.

use serde::Serialize;

use crate::config::GridConfig;

/// Inclusive range of materialized rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowWindow {
    pub start_row: u32,
    pub end_row: u32,
}

impl RowWindow {
    pub fn contains(&self, row: u32) -> bool {
        (self.start_row..=self.end_row).contains(&row)
    }

    pub fn len(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    /// A window always holds at least one row.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn rows(&self) -> std::ops::RangeInclusive<u32> {
        self.start_row..=self.end_row
    }
}

/// Viewport state - the visible area of the grid's scroll container.
///
/// Horizontal and vertical scroll are tracked independently; neither moves the
/// enclosing canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Vertical scroll offset in pixels
    pub scroll_top: f32,
    /// Horizontal scroll offset in pixels
    pub scroll_left: f32,
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// `floor(value / step)` as a row/column index; negative or non-finite input maps to 0.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn index_at(value: f32, step: f32) -> u32 {
    let q = (value / step).floor();
    if q.is_finite() && q > 0.0 {
        q.min(u32::MAX as f32) as u32
    } else {
        0
    }
}

/// `ceil(value / step)`, same clamping as [`index_at`].
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn count_in(value: f32, step: f32) -> u32 {
    let q = (value / step).ceil();
    if q.is_finite() && q > 0.0 {
        q.min(u32::MAX as f32) as u32
    } else {
        0
    }
}

impl Viewport {
    /// Create a new viewport with default values
    pub fn new() -> Self {
        Self {
            scroll_top: 0.0,
            scroll_left: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }

    /// Rows to materialize for the current scroll position, `None` for an empty sheet.
    ///
    /// `start = max(0, floor(scroll_top / row_height) - buffer)`,
    /// `end = min(row_count - 1, start + ceil(height / row_height) + 2 * buffer)`.
    pub fn row_window(&self, config: &GridConfig, row_count: u32) -> Option<RowWindow> {
        let last_row = row_count.checked_sub(1)?;
        let first_visible = index_at(self.scroll_top, config.row_height);
        let start_row = first_visible
            .saturating_sub(config.buffer_rows)
            .min(last_row);
        let visible_count = count_in(self.height, config.row_height)
            .saturating_add(config.buffer_rows.saturating_mul(2));
        let end_row = start_row.saturating_add(visible_count).min(last_row);
        Some(RowWindow { start_row, end_row })
    }

    /// Rows intersecting the viewport without the buffer.
    pub fn visible_rows(&self, config: &GridConfig, row_count: u32) -> Option<(u32, u32)> {
        let last_row = row_count.checked_sub(1)?;
        let start = index_at(self.scroll_top, config.row_height).min(last_row);
        let end = index_at(self.scroll_top + self.height, config.row_height).min(last_row);
        Some((start, end))
    }

    /// Maximum scroll offsets for a sheet of the given size.
    pub fn max_scroll(&self, config: &GridConfig, row_count: u32, col_count: u32) -> (f32, f32) {
        let total_w = config.row_header_width + config.content_width(col_count);
        let total_h = config.header_height + config.content_height(row_count);
        (
            (total_w - self.width).max(0.0),
            (total_h - self.height).max(0.0),
        )
    }

    /// Clamp scroll position to valid range.
    pub fn clamp_scroll(&mut self, config: &GridConfig, row_count: u32, col_count: u32) {
        let (max_x, max_y) = self.max_scroll(config, row_count, col_count);
        self.scroll_left = sanitize(self.scroll_left).clamp(0.0, max_x);
        self.scroll_top = sanitize(self.scroll_top).clamp(0.0, max_y);
    }

    /// Scroll by delta amounts, returning the deltas actually applied.
    pub fn scroll_by(
        &mut self,
        delta_x: f32,
        delta_y: f32,
        config: &GridConfig,
        row_count: u32,
        col_count: u32,
    ) -> (f32, f32) {
        let (old_x, old_y) = (self.scroll_left, self.scroll_top);
        self.scroll_left += sanitize(delta_x);
        self.scroll_top += sanitize(delta_y);
        self.clamp_scroll(config, row_count, col_count);
        (self.scroll_left - old_x, self.scroll_top - old_y)
    }

    /// Set absolute scroll position
    pub fn set_scroll(
        &mut self,
        left: f32,
        top: f32,
        config: &GridConfig,
        row_count: u32,
        col_count: u32,
    ) {
        self.scroll_left = left;
        self.scroll_top = top;
        self.clamp_scroll(config, row_count, col_count);
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = sanitize(width);
        self.height = sanitize(height);
    }

    /// Whether the bottom edge of the viewport is within the add-rows threshold
    /// of the end of the scrollable content.
    pub fn near_bottom(&self, config: &GridConfig, row_count: u32) -> bool {
        let total_h = config.header_height + config.content_height(row_count);
        self.scroll_top + self.height >= total_h - config.add_rows_threshold
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn window_at_top_includes_buffer_below() {
        let config = GridConfig::default();
        let viewport = Viewport {
            height: 240.0,
            ..Viewport::new()
        };
        let w = viewport.row_window(&config, 1000).unwrap();
        assert_eq!(w.start_row, 0);
        // ceil(240 / 24) + 2 * 10
        assert_eq!(w.end_row, 30);
    }

    #[test]
    fn window_past_content_is_clamped() {
        let config = GridConfig::default();
        let viewport = Viewport {
            scroll_top: 1.0e7,
            height: 240.0,
            ..Viewport::new()
        };
        let w = viewport.row_window(&config, 50).unwrap();
        assert_eq!(w, RowWindow { start_row: 49, end_row: 49 });
    }

    #[test]
    fn empty_sheet_has_no_window() {
        assert!(Viewport::new().row_window(&GridConfig::default(), 0).is_none());
    }
}
