use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Cell, CellValue};
use crate::cell_ref::{self, CellCoord};
use crate::error::Result;

/// A sheet snapshot: bounds plus a sparse map from cell id to cell.
///
/// The grid core only reads sheets. Writes go through the host's cell store, which
/// hands back a fresh snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub row_count: u32,
    pub col_count: u32,
    #[serde(default)]
    pub cells: HashMap<String, Cell>,
}

impl Sheet {
    pub fn new(id: impl Into<String>, name: impl Into<String>, row_count: u32, col_count: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            row_count,
            col_count,
            cells: HashMap::new(),
        }
    }

    /// Parse a sheet snapshot sent by the host.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether `id` decodes to a coordinate inside the sheet bounds.
    pub fn contains(&self, id: &str) -> bool {
        cell_ref::decode(id).is_some_and(|c| c.within(self.row_count, self.col_count))
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// The value stored at `id`, `Empty` when absent.
    pub fn value(&self, id: &str) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.cells.get(id).map_or(EMPTY, |c| &c.value)
    }

    /// Write a value, creating the cell on first write.
    ///
    /// Used by hosts and tests building snapshots; grid components never call it.
    pub fn set_value(&mut self, id: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.entry(id.into()).or_default().value = value.into();
    }

    /// Grow the row count by `batch`, capped at `ceiling`. Never shrinks.
    ///
    /// Returns the number of rows actually added.
    pub fn grow_rows(&mut self, batch: u32, ceiling: u32) -> u32 {
        let target = self.row_count.saturating_add(batch).min(ceiling);
        let added = target.saturating_sub(self.row_count);
        self.row_count = self.row_count.max(target);
        added
    }

    /// Coordinates of every populated cell inside the bounds.
    pub fn used_coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells
            .iter()
            .filter(|(_, cell)| !cell.value.is_empty())
            .filter_map(|(id, _)| cell_ref::decode(id))
            .filter(|c| c.within(self.row_count, self.col_count))
    }
}
