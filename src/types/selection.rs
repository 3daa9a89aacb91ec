use serde::{Deserialize, Serialize};

use crate::cell_ref::{self, CellCoord};

/// Selected cell ids in selection order, plus the anchor used for shift-extension.
///
/// The first id is the "primary" cell. Ids are unique and lie inside the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub cells: Vec<String>,
    pub anchor: Option<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// First selected cell.
    pub fn primary(&self) -> Option<&str> {
        self.cells.first().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cells.iter().any(|c| c == id)
    }

    /// Get normalized bounds `(min_row, min_col, max_row, max_col)` of the selected cells.
    pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut coords = self.cells.iter().filter_map(|id| cell_ref::decode(id));
        let first = coords.next()?;
        Some(coords.fold(
            (first.row, first.col, first.row, first.col),
            |(r0, c0, r1, c1), CellCoord { row, col }| {
                (r0.min(row), c0.min(col), r1.max(row), c1.max(col))
            },
        ))
    }
}
