//! Column type inference and schema description.

use std::collections::HashSet;
use std::ops::Range;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::cell_ref;
use crate::types::{parse_number, Sheet};

/// Number of sample values kept per column.
pub const SAMPLE_SIZE: usize = 5;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%b %d, %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];
const BOOLEAN_TOKENS: &[&str] = &["true", "false", "yes", "no", "1", "0"];

const HIGH_KEYWORDS: &[&str] = &[
    "revenue", "sales", "profit", "price", "cost", "amount", "total", "customer", "date", "id",
    "name",
];
const MEDIUM_KEYWORDS: &[&str] = &[
    "quantity", "qty", "category", "region", "status", "type", "product", "score", "rating",
];
const LOW_KEYWORDS: &[&str] = &["note", "comment", "description", "misc", "remark", "tag"];

/// Inferred type of a column's non-empty values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    Date,
    Boolean,
    String,
    /// Numbers and dates together, with no free text.
    Mixed,
    Empty,
}

/// Heuristic importance of a column, from its header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessRelevance {
    High,
    Medium,
    Low,
    Unknown,
}

/// Read-only description of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaColumn {
    pub letter: String,
    pub index: u32,
    pub name: String,
    pub data_type: ColumnType,
    pub sample_values: Vec<String>,
    pub null_count: usize,
    pub unique_count: usize,
    pub business_relevance: BusinessRelevance,
}

/// Whether `value` parses as a calendar date or timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

pub fn is_boolean_token(value: &str) -> bool {
    let lowered = value.trim().to_ascii_lowercase();
    BOOLEAN_TOKENS.contains(&lowered.as_str())
}

/// Classify a column from all of its non-empty values.
///
/// Checks run in a fixed order: all numbers, then all dates, then all boolean
/// tokens. Past that, any free text makes the column `String`; numbers mixed
/// with dates are `Mixed`; no values at all is `Empty`.
pub fn infer_column_type<S: AsRef<str>>(values: &[S]) -> ColumnType {
    let values: Vec<&str> = values
        .iter()
        .map(|v| v.as_ref().trim())
        .filter(|v| !v.is_empty())
        .collect();
    if values.is_empty() {
        return ColumnType::Empty;
    }

    let numeric = values.iter().filter(|v| parse_number(v).is_some()).count();
    if numeric == values.len() {
        return ColumnType::Number;
    }

    let dates = values
        .iter()
        .filter(|v| parse_number(v).is_none() && parse_date(v).is_some())
        .count();
    if dates == values.len() {
        return ColumnType::Date;
    }

    if values.iter().all(|v| is_boolean_token(v)) {
        return ColumnType::Boolean;
    }

    if numeric + dates < values.len() {
        ColumnType::String
    } else {
        ColumnType::Mixed
    }
}

/// Header text for column `col`: row 1's value unless it is empty or a formula.
pub fn column_name(sheet: &Sheet, col: u32) -> String {
    let letter = cell_ref::col_to_letters(col);
    let header = sheet.value(&cell_ref::encode(0, col)).display_text();
    let header = header.trim();
    if header.is_empty() || header.starts_with('=') {
        letter
    } else {
        header.to_string()
    }
}

/// Whether row 1 of `col` supplies the column name.
pub fn has_header(sheet: &Sheet, col: u32) -> bool {
    column_name(sheet, col) != cell_ref::col_to_letters(col)
}

/// Keyword-tier classification of a column header.
///
/// Columns A and B are always `High`. Unmatched headers fall back to `Medium`
/// for numeric and date columns and `Unknown` otherwise.
pub fn business_relevance(letter: &str, name: &str, data_type: ColumnType) -> BusinessRelevance {
    if letter == "A" || letter == "B" {
        return BusinessRelevance::High;
    }
    let lowered = name.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));
    if matches(HIGH_KEYWORDS) {
        BusinessRelevance::High
    } else if matches(MEDIUM_KEYWORDS) {
        BusinessRelevance::Medium
    } else if matches(LOW_KEYWORDS) {
        BusinessRelevance::Low
    } else if matches!(data_type, ColumnType::Number | ColumnType::Date) {
        BusinessRelevance::Medium
    } else {
        BusinessRelevance::Unknown
    }
}

/// Non-empty display values of column `col` over `rows`, top to bottom.
pub fn column_values(sheet: &Sheet, col: u32, rows: Range<u32>) -> Vec<String> {
    rows.filter_map(|row| {
        let value = sheet.value(&cell_ref::encode(row, col));
        (!value.is_empty()).then(|| value.display_text())
    })
    .collect()
}

/// Describe column `col` over the data rows `rows`.
pub fn analyze_column(sheet: &Sheet, col: u32, rows: Range<u32>) -> SchemaColumn {
    let letter = cell_ref::col_to_letters(col);
    let name = column_name(sheet, col);
    let row_span = rows.len();
    let values = column_values(sheet, col, rows);
    let data_type = infer_column_type(&values);

    let unique_count = values.iter().map(String::as_str).collect::<HashSet<_>>().len();
    let sample_values = values.iter().take(SAMPLE_SIZE).cloned().collect();
    let business_relevance = business_relevance(&letter, &name, data_type);

    SchemaColumn {
        index: col,
        null_count: row_span.saturating_sub(values.len()),
        letter,
        name,
        data_type,
        sample_values,
        unique_count,
        business_relevance,
    }
}
