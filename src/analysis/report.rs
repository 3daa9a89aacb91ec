//! Whole-sheet analysis report handed to the host (AI panel, data summary).

use serde::Serialize;

use super::schema::{analyze_column, has_header, ColumnType, SchemaColumn};
use super::stats::SelectionStats;
use crate::cell_ref;
use crate::error::Result;
use crate::types::Sheet;

/// One analyzed column plus numeric aggregates when the column is numeric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnReport {
    #[serde(flatten)]
    pub schema: SchemaColumn,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SelectionStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetReport {
    pub sheet_id: String,
    pub sheet_name: String,
    /// Rows up to and including the last populated one.
    pub used_rows: u32,
    /// Columns up to and including the last populated one.
    pub used_cols: u32,
    pub columns: Vec<ColumnReport>,
    pub numeric_columns: Vec<String>,
    pub date_columns: Vec<String>,
    pub text_columns: Vec<String>,
}

impl SheetReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn column(&self, name_or_letter: &str) -> Option<&ColumnReport> {
        self.columns
            .iter()
            .find(|c| c.schema.name == name_or_letter || c.schema.letter == name_or_letter)
    }
}

/// Analyze every column of the used range.
///
/// A column whose first row holds a header has its data start on the second row.
pub fn analyze_sheet(sheet: &Sheet) -> SheetReport {
    let mut report = SheetReport {
        sheet_id: sheet.id.clone(),
        sheet_name: sheet.name.clone(),
        ..SheetReport::default()
    };

    let Some((max_row, max_col)) = sheet
        .used_coords()
        .fold(None, |acc: Option<(u32, u32)>, c| {
            Some(acc.map_or((c.row, c.col), |(r, col)| (r.max(c.row), col.max(c.col))))
        })
    else {
        return report;
    };
    report.used_rows = max_row + 1;
    report.used_cols = max_col + 1;

    for col in 0..=max_col {
        let first_data_row = u32::from(has_header(sheet, col));
        let rows = first_data_row..max_row + 1;
        let schema = analyze_column(sheet, col, rows.clone());

        let stats = (schema.data_type == ColumnType::Number).then(|| {
            let ids: Vec<String> = rows.map(|row| cell_ref::encode(row, col)).collect();
            SelectionStats::from_values(ids.iter().map(|id| sheet.value(id)))
        });

        match schema.data_type {
            ColumnType::Number => report.numeric_columns.push(schema.name.clone()),
            ColumnType::Date => report.date_columns.push(schema.name.clone()),
            ColumnType::String | ColumnType::Mixed | ColumnType::Boolean => {
                report.text_columns.push(schema.name.clone());
            }
            ColumnType::Empty => {}
        }
        report.columns.push(ColumnReport { schema, stats });
    }

    log::debug!(
        "analyzed sheet {:?}: {} rows x {} cols",
        report.sheet_name,
        report.used_rows,
        report.used_cols
    );
    report
}
