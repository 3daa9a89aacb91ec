//! Column schema analysis.
//!
//! Infers column types from cell values, names and ranks columns, and computes
//! selection statistics. Everything here is a read path over a sheet snapshot.

pub mod report;
pub mod schema;
pub mod stats;

pub use report::{analyze_sheet, ColumnReport, SheetReport};
pub use schema::{
    analyze_column, business_relevance, column_name, column_values, infer_column_type,
    parse_date, BusinessRelevance, ColumnType, SchemaColumn,
};
pub use stats::{selection_stats, SelectionStats};
