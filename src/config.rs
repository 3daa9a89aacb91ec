//! Grid geometry and growth constants.
//!
//! Defaults match the host application's stylesheet; hosts may override any
//! field by passing a partial JSON object.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetGridError};

/// Fixed geometry of the grid plus virtualization and growth tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Height of every data row in pixels.
    pub row_height: f32,
    /// Height of the column header strip in pixels.
    pub header_height: f32,
    /// Width of every data column in pixels.
    pub cell_width: f32,
    /// Width of the row number gutter in pixels.
    pub row_header_width: f32,
    /// Extra rows materialized above and below the viewport.
    pub buffer_rows: u32,
    /// Rows added per "add more rows" request.
    pub add_rows_batch: u32,
    /// Hard ceiling on the total row count.
    pub max_rows: u32,
    /// Distance from the bottom (pixels) at which the add-rows control appears.
    pub add_rows_threshold: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: 24.0,
            header_height: 32.0,
            cell_width: 100.0,
            row_header_width: 50.0,
            buffer_rows: 10,
            add_rows_batch: 1000,
            max_rows: 100_000,
            add_rows_threshold: 200.0,
        }
    }
}

impl GridConfig {
    /// Parse a (possibly partial) JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(SheetGridError::Config(format!(
                "row height must be positive, got {}",
                self.row_height
            )));
        }
        if !(self.cell_width.is_finite() && self.cell_width > 0.0) {
            return Err(SheetGridError::Config(format!(
                "cell width must be positive, got {}",
                self.cell_width
            )));
        }
        if self.header_height < 0.0 || self.row_header_width < 0.0 {
            return Err(SheetGridError::Config("header sizes must not be negative".into()));
        }
        if self.max_rows < self.add_rows_batch {
            return Err(SheetGridError::Config(format!(
                "max rows ({}) below growth batch ({})",
                self.max_rows, self.add_rows_batch
            )));
        }
        Ok(())
    }

    /// Total content height for `row_count` rows, excluding the header strip.
    pub fn content_height(&self, row_count: u32) -> f32 {
        // Row counts are bounded by `max_rows`, well inside f32's exact integer range.
        #[allow(clippy::cast_precision_loss)]
        let rows = row_count as f32;
        rows * self.row_height
    }

    /// Total content width for `col_count` columns, excluding the row gutter.
    pub fn content_width(&self, col_count: u32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let cols = col_count as f32;
        cols * self.cell_width
    }
}
