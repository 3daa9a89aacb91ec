//! Descriptive statistics over a selection.

use serde::Serialize;

use crate::types::{CellValue, Sheet};

/// Aggregates over a set of cells.
///
/// `sum`/`avg`/`min`/`max` cover only the numeric values and are zero when there
/// are none; they are meaningful for display only when `all_numeric` holds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionStats {
    /// Non-empty values.
    pub count: usize,
    /// Values that parse as numbers.
    pub count_numbers: usize,
    pub sum: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    /// Every non-empty value is numeric (and there is at least one).
    pub all_numeric: bool,
}

impl SelectionStats {
    /// Aggregate an iterator of cell values.
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut stats = Self::default();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in values {
            if value.is_empty() {
                continue;
            }
            stats.count += 1;
            if let Some(n) = value.as_number() {
                stats.count_numbers += 1;
                stats.sum += n;
                min = min.min(n);
                max = max.max(n);
            }
        }

        if stats.count_numbers > 0 {
            // Selection sizes stay far below 2^52.
            #[allow(clippy::cast_precision_loss)]
            let n = stats.count_numbers as f64;
            stats.avg = stats.sum / n;
            stats.min = min;
            stats.max = max;
        }
        stats.all_numeric = stats.count > 0 && stats.count == stats.count_numbers;
        stats
    }

    /// Lines for the status bar: full aggregates for all-numeric selections,
    /// the count alone otherwise.
    pub fn display_lines(&self) -> Vec<String> {
        if self.all_numeric {
            vec![
                format!("Sum: {:.2}", self.sum),
                format!("Avg: {:.2}", self.avg),
                format!("Min: {:.2}", self.min),
                format!("Max: {:.2}", self.max),
                format!("Count: {}", self.count),
            ]
        } else {
            vec![format!("Count: {}", self.count)]
        }
    }
}

/// Statistics for the given cell ids of `sheet`. Unknown ids count as empty.
pub fn selection_stats<S: AsRef<str>>(sheet: &Sheet, ids: &[S]) -> SelectionStats {
    SelectionStats::from_values(ids.iter().map(|id| sheet.value(id.as_ref())))
}
