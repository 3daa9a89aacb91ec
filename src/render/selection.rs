//! Selection overlay helpers.
//!
//! These helpers keep selection math testable without depending on DOM APIs.

use serde::Serialize;

use crate::layout::GridLayout;
use crate::types::Selection;

/// Bounding box drawn over a multi-cell selection, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Overlay rectangle for `selection`, or `None` when fewer than two cells are selected.
///
/// Purely derived from the selection's min/max row and column.
pub fn selection_overlay(selection: &Selection, layout: &GridLayout) -> Option<SelectionRect> {
    if selection.len() < 2 {
        return None;
    }
    let (min_row, min_col, max_row, max_col) = selection.bounds()?;
    let top_left = layout.cell_rect(min_row, min_col);
    let bottom_right = layout.cell_rect(max_row, max_col);
    Some(SelectionRect {
        x: top_left.x,
        y: top_left.y,
        w: bottom_right.x + bottom_right.width - top_left.x,
        h: bottom_right.y + bottom_right.height - top_left.y,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::selection::range_between;

    #[test]
    fn overlay_covers_bounding_box() {
        let layout = GridLayout::new(GridConfig::default(), 100, 26);
        let selection = Selection {
            cells: range_between("B2", "C4"),
            anchor: None,
        };
        let rect = selection_overlay(&selection, &layout).unwrap();
        assert_eq!(rect.x, 50.0 + 100.0);
        assert_eq!(rect.y, 32.0 + 24.0);
        assert_eq!(rect.w, 200.0);
        assert_eq!(rect.h, 72.0);
    }

    #[test]
    fn single_cell_has_no_overlay() {
        let layout = GridLayout::new(GridConfig::default(), 100, 26);
        let selection = Selection {
            cells: vec!["A1".into()],
            anchor: None,
        };
        assert!(selection_overlay(&selection, &layout).is_none());
    }
}
