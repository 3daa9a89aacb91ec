//! Row sorting by one column, expressed as a bulk cell update.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cell_ref;
use crate::types::{CellUpdate, CellValue, Sheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Ordering used for sort keys: numbers before text, text case-insensitive.
fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .display_text()
            .to_lowercase()
            .cmp(&b.display_text().to_lowercase()),
    }
}

/// Updates that reorder the used rows of `sheet` by column `col`.
///
/// Whole rows move together. Empty keys sink to the bottom in both directions
/// and the sort is stable. With `has_header` the first row stays in place.
/// Only cells whose value changes are included.
pub fn sort_rows_by_column(
    sheet: &Sheet,
    col: u32,
    direction: SortDirection,
    has_header: bool,
) -> Vec<CellUpdate> {
    let Some((max_row, max_col)) = sheet.used_coords().fold(None, |acc: Option<(u32, u32)>, c| {
        Some(acc.map_or((c.row, c.col), |(r, k)| (r.max(c.row), k.max(c.col))))
    }) else {
        return Vec::new();
    };
    if col > max_col {
        return Vec::new();
    }

    let first_row = u32::from(has_header);
    let rows: Vec<Vec<CellValue>> = (first_row..=max_row)
        .map(|row| {
            (0..=max_col)
                .map(|c| sheet.value(&cell_ref::encode(row, c)).clone())
                .collect()
        })
        .collect();

    let key_index = col as usize;
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| {
        let ka = rows.get(a).and_then(|r| r.get(key_index));
        let kb = rows.get(b).and_then(|r| r.get(key_index));
        match (ka, kb) {
            (Some(ka), Some(kb)) => match (ka.is_empty(), kb.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    let ord = compare_values(ka, kb);
                    match direction {
                        SortDirection::Ascending => ord,
                        SortDirection::Descending => ord.reverse(),
                    }
                }
            },
            _ => Ordering::Equal,
        }
    });

    let mut updates = Vec::new();
    for (target, source) in (first_row..).zip(order.iter()) {
        let (Some(old_row), Some(new_row)) = (
            rows.get((target - first_row) as usize),
            rows.get(*source),
        ) else {
            continue;
        };
        for ((c, old), new) in (0..).zip(old_row).zip(new_row) {
            if old != new {
                updates.push(CellUpdate::new(cell_ref::encode(target, c), new.clone()));
            }
        }
    }
    log::debug!(
        "sorting column {} {direction:?}: {} cell updates",
        cell_ref::col_to_letters(col),
        updates.len()
    );
    updates
}
